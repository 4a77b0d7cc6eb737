//! File Ticket Sink Adapter
//!
//! Appends rendered kitchen tickets to a single text file, one block per
//! ticket. The sequence counter is recovered from the file on startup by
//! counting existing ticket headers, so numbering survives restarts.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::ticket::{format_ticket, Ticket};
use crate::ports::{TicketSink, TicketSinkError};

/// Append-only ticket file with sequential numbering.
pub struct FileTicketSink {
    path: PathBuf,
    sequence: AtomicU64,
    // One writer at a time so ticket blocks never interleave.
    write_lock: Arc<Mutex<()>>,
}

impl FileTicketSink {
    /// Opens (or prepares to create) the ticket file, recovering the
    /// sequence counter from any existing content.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TicketSinkError> {
        let path = path.into();
        let existing = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content.lines().filter(|l| l.starts_with("=== ORDER #")).count() as u64,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(TicketSinkError::Io(e.to_string())),
        };
        Ok(Self {
            path,
            sequence: AtomicU64::new(existing),
            write_lock: Arc::new(Mutex::new(())),
        })
    }
}

#[async_trait]
impl TicketSink for FileTicketSink {
    async fn submit(&self, ticket: Ticket) -> Result<u64, TicketSinkError> {
        let number = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let block = format!("{}\n", format_ticket(number, &ticket));

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| TicketSinkError::Io(e.to_string()))?;
        file.write_all(block.as_bytes())
            .await
            .map_err(|e| TicketSinkError::Io(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| TicketSinkError::Io(e.to_string()))?;

        info!(number, session = %ticket.session_id, "ticket written");
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
        s.merge_line(LineItem::new(ItemKind::Beverage, "Coke", 2));
        s.order_type = Some(OrderType::Pickup);
        s.mark_completed();
        Ticket::from_session(&s, OrderTotals::zero()).unwrap()
    }

    #[tokio::test]
    async fn writes_numbered_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.txt");
        let sink = FileTicketSink::open(&path).await.unwrap();

        assert_eq!(sink.submit(ticket()).await.unwrap(), 1);
        assert_eq!(sink.submit(ticket()).await.unwrap(), 2);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("=== ORDER #000001 ==="));
        assert!(content.contains("=== ORDER #000002 ==="));
        assert!(content.contains("- 2x Coke"));
    }

    #[tokio::test]
    async fn sequence_recovers_from_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.txt");

        let sink = FileTicketSink::open(&path).await.unwrap();
        sink.submit(ticket()).await.unwrap();
        sink.submit(ticket()).await.unwrap();
        drop(sink);

        let reopened = FileTicketSink::open(&path).await.unwrap();
        assert_eq!(reopened.submit(ticket()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_file_starts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileTicketSink::open(dir.path().join("fresh.txt")).await.unwrap();
        assert_eq!(sink.submit(ticket()).await.unwrap(), 1);
    }
}
