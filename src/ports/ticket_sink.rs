//! Ticket Sink Port - append-only store for confirmed orders.

use async_trait::async_trait;

use crate::domain::ticket::Ticket;

/// Errors that can occur while submitting a ticket.
#[derive(Debug, thiserror::Error)]
pub enum TicketSinkError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for handing confirmed orders to kitchen/fulfillment.
///
/// The sink owns the sequential ticket-number sequence and returns the
/// number assigned to the submitted ticket.
#[async_trait]
pub trait TicketSink: Send + Sync {
    async fn submit(&self, ticket: Ticket) -> Result<u64, TicketSinkError>;
}
