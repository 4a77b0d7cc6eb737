//! In-Memory Ticket Sink Adapter
//!
//! Keeps submitted tickets in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::ticket::Ticket;
use crate::ports::{TicketSink, TicketSinkError};

/// In-memory append-only ticket store with a sequential counter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketSink {
    tickets: Arc<RwLock<Vec<(u64, Ticket)>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryTicketSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All submitted tickets in submission order.
    pub async fn submitted(&self) -> Vec<(u64, Ticket)> {
        self.tickets.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketSink for InMemoryTicketSink {
    async fn submit(&self, ticket: Ticket) -> Result<u64, TicketSinkError> {
        let number = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.tickets.write().await.push((number, ticket));
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::order::{ItemKind, LineItem, OrderSession, OrderType};
    use crate::domain::pricing::OrderTotals;

    fn ticket() -> Ticket {
        let mut s = OrderSession::new(SessionId::new());
        s.merge_line(LineItem::new(ItemKind::Beverage, "Coke", 1));
        s.order_type = Some(OrderType::Pickup);
        s.mark_completed();
        Ticket::from_session(&s, OrderTotals::zero()).unwrap()
    }

    #[tokio::test]
    async fn numbers_are_sequential_from_one() {
        let sink = InMemoryTicketSink::new();
        assert_eq!(sink.submit(ticket()).await.unwrap(), 1);
        assert_eq!(sink.submit(ticket()).await.unwrap(), 2);
        assert_eq!(sink.submit(ticket()).await.unwrap(), 3);
        assert_eq!(sink.len().await, 3);
    }

    #[tokio::test]
    async fn submitted_preserves_order() {
        let sink = InMemoryTicketSink::new();
        sink.submit(ticket()).await.unwrap();
        sink.submit(ticket()).await.unwrap();
        let all = sink.submitted().await;
        assert_eq!(all[0].0, 1);
        assert_eq!(all[1].0, 2);
    }
}
