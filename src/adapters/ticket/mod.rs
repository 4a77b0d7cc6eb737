//! Ticket sink adapters.

mod file_sink;
mod in_memory;

pub use file_sink::FileTicketSink;
pub use in_memory::InMemoryTicketSink;
