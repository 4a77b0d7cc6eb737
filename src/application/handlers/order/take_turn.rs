//! TakeTurnHandler - Apply one customer utterance to a session.
//!
//! Serializes turns per session: the state machine is not designed for
//! interleaved mutation, so concurrent requests for one session id queue on
//! a per-session lock. On final confirmation the handler prices the order
//! and submits the kitchen ticket.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::catalog::PriceTable;
use crate::domain::dialogue::DialogueEngine;
use crate::domain::foundation::SessionId;
use crate::domain::pricing::{price_order, OrderTotals};
use crate::domain::ticket::Ticket;
use crate::ports::{SessionStore, SessionStoreError, TicketSink, UtteranceInterpreter};

/// Command to apply one utterance.
#[derive(Debug, Clone)]
pub struct TakeTurnCommand {
    pub session_id: SessionId,
    pub text: String,
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct TakeTurnResult {
    /// The single system reply for this turn.
    pub reply: String,
    pub completed: bool,
    /// Set once the order is completed and the ticket was accepted.
    pub ticket_number: Option<u64>,
    pub totals: Option<OrderTotals>,
}

/// Error type for taking a turn.
#[derive(Debug)]
pub enum TakeTurnError {
    /// Session not found
    NotFound(SessionId),
    /// Storage error
    Storage(String),
    /// Ticket submission failed after completion
    Ticket(String),
}

impl std::fmt::Display for TakeTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TakeTurnError::NotFound(id) => write!(f, "Session not found: {}", id),
            TakeTurnError::Storage(err) => write!(f, "Storage error: {}", err),
            TakeTurnError::Ticket(err) => write!(f, "Ticket error: {}", err),
        }
    }
}

impl std::error::Error for TakeTurnError {}

impl From<SessionStoreError> for TakeTurnError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => TakeTurnError::NotFound(id),
            other => TakeTurnError::Storage(other.to_string()),
        }
    }
}

/// Handler applying customer utterances to order sessions.
pub struct TakeTurnHandler {
    sessions: Arc<dyn SessionStore>,
    interpreter: Arc<dyn UtteranceInterpreter>,
    engine: Arc<DialogueEngine>,
    prices: Arc<PriceTable>,
    tickets: Arc<dyn TicketSink>,
    turn_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl TakeTurnHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        interpreter: Arc<dyn UtteranceInterpreter>,
        engine: Arc<DialogueEngine>,
        prices: Arc<PriceTable>,
        tickets: Arc<dyn TicketSink>,
    ) -> Self {
        Self {
            sessions,
            interpreter,
            engine,
            prices,
            tickets,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn handle(&self, cmd: TakeTurnCommand) -> Result<TakeTurnResult, TakeTurnError> {
        // 1. Serialize turns for this session.
        let lock = self.lock_for(cmd.session_id).await;
        let _guard = lock.lock().await;

        // 2. Load session state.
        let mut session = self.sessions.get(cmd.session_id).await?;

        // 3. Interpret the utterance (the port degrades to the empty
        //    interpretation on failure, never an error).
        let interpretation = self.interpreter.interpret(&cmd.text).await;

        // 4. Advance the state machine.
        let reply = self.engine.apply(&mut session, &interpretation, &cmd.text);
        let completed = session.completed;

        // 5. Persist the mutated session before any side effects.
        self.sessions.put(cmd.session_id, session.clone()).await?;

        // 6. On completion: price, build the ticket, hand it to the sink.
        let mut ticket_number = None;
        let mut totals = None;
        if completed {
            let order_totals = price_order(
                &self.prices,
                self.engine.settings().tax_rate,
                &session,
            );
            match Ticket::from_session(&session, order_totals) {
                Ok(ticket) => {
                    let number = self
                        .tickets
                        .submit(ticket)
                        .await
                        .map_err(|e| TakeTurnError::Ticket(e.to_string()))?;
                    ticket_number = Some(number);
                    totals = Some(order_totals);
                }
                Err(e) => {
                    // State machine invariants make this unreachable; if it
                    // ever fires the order must not be lost silently.
                    warn!(session = %cmd.session_id, error = %e, "completed session rejected by ticket builder");
                    return Err(TakeTurnError::Ticket(e.to_string()));
                }
            }
            self.drop_lock(cmd.session_id).await;
        }

        Ok(TakeTurnResult {
            reply,
            completed,
            ticket_number,
            totals,
        })
    }

    async fn lock_for(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        locks.entry(id).or_default().clone()
    }

    async fn drop_lock(&self, id: SessionId) {
        self.turn_locks.lock().await.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::KeywordInterpreter;
    use crate::adapters::session::InMemorySessionStore;
    use crate::adapters::ticket::InMemoryTicketSink;
    use crate::domain::catalog::{CatalogIndex, StoreFile};
    use crate::domain::order::OrderSession;

    fn store_file() -> StoreFile {
        serde_yaml::from_str(
            r#"
catalog:
  pizzas:
    classic:
      - name: Pepperoni Pizza
        aliases: [pepperoni]
        requires_spice: true
  beverages:
    - name: Coke
      aliases: [cola]
settings:
  tax_rate: 0.08
prices:
  pepperoni pizza:
    small: 9.99
    medium: 12.99
    large: 15.99
  coke: 2.49
"#,
        )
        .unwrap()
    }

    struct Fixture {
        handler: TakeTurnHandler,
        sessions: Arc<InMemorySessionStore>,
        tickets: Arc<InMemoryTicketSink>,
    }

    fn fixture() -> Fixture {
        let store = store_file();
        let index = Arc::new(CatalogIndex::build(&store.catalog));
        let settings = Arc::new(store.settings);
        let sessions = Arc::new(InMemorySessionStore::new());
        let tickets = Arc::new(InMemoryTicketSink::new());
        let handler = TakeTurnHandler::new(
            sessions.clone(),
            Arc::new(KeywordInterpreter::new(index.clone(), settings.clone())),
            Arc::new(DialogueEngine::new((*index).clone(), (*settings).clone())),
            Arc::new(store.prices),
            tickets.clone(),
        );
        Fixture {
            handler,
            sessions,
            tickets,
        }
    }

    async fn new_session(f: &Fixture) -> SessionId {
        let session = OrderSession::new(SessionId::new());
        let id = session.id;
        f.sessions.put(id, session).await.unwrap();
        id
    }

    async fn turn(f: &Fixture, id: SessionId, text: &str) -> TakeTurnResult {
        f.handler
            .handle(TakeTurnCommand {
                session_id: id,
                text: text.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = fixture();
        let result = f
            .handler
            .handle(TakeTurnCommand {
                session_id: SessionId::new(),
                text: "hi".to_string(),
            })
            .await;
        assert!(matches!(result, Err(TakeTurnError::NotFound(_))));
    }

    #[tokio::test]
    async fn session_mutations_are_persisted_between_turns() {
        let f = fixture();
        let id = new_session(&f).await;

        turn(&f, id, "2 large pepperoni, mild").await;
        let stored = f.sessions.get(id).await.unwrap();
        assert_eq!(stored.line_items.len(), 1);
        assert_eq!(stored.line_items[0].qty, 2);
    }

    #[tokio::test]
    async fn full_order_produces_a_priced_ticket() {
        let f = fixture();
        let id = new_session(&f).await;

        turn(&f, id, "2 large pepperoni, mild, and a coke").await;
        turn(&f, id, "pickup").await;
        let last = turn(&f, id, "yes").await;

        assert!(last.completed);
        assert_eq!(last.ticket_number, Some(1));
        // The utterance-level quantity applies to both items it names:
        // 2 * 15.99 + 2 * 2.49 = 36.96; 8% tax = 2.96 (half-up).
        let totals = last.totals.unwrap();
        assert_eq!(totals.subtotal_cents, 3696);
        assert_eq!(totals.tax_cents, 296);
        assert_eq!(totals.total_cents, 3992);
        assert_eq!(f.tickets.len().await, 1);
    }

    #[tokio::test]
    async fn incomplete_turn_produces_no_ticket() {
        let f = fixture();
        let id = new_session(&f).await;
        let result = turn(&f, id, "a pepperoni").await;
        assert!(!result.completed);
        assert!(result.ticket_number.is_none());
        assert!(f.tickets.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_turns_for_one_session_serialize() {
        let f = Arc::new(fixture());
        let id = new_session(&f).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let f = Arc::clone(&f);
            handles.push(tokio::spawn(async move {
                f.handler
                    .handle(TakeTurnCommand {
                        session_id: id,
                        text: "a cola".to_string(),
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Four serialized merges of the same line, not lost updates.
        let stored = f.sessions.get(id).await.unwrap();
        assert_eq!(stored.line_items.len(), 1);
        assert_eq!(stored.line_items[0].qty, 4);
    }
}
