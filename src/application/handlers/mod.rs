//! Use-case handlers, grouped by bounded context.

pub mod order;
