//! HTTP adapters - REST API implementations.

pub mod order;

pub use order::order_router;
pub use order::OrderAppState;
