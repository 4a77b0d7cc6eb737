//! StartConversationHandler - Create an empty session and greet.

use std::sync::Arc;

use crate::domain::catalog::StoreSettings;
use crate::domain::foundation::SessionId;
use crate::domain::order::OrderSession;
use crate::ports::{SessionStore, SessionStoreError};

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub session_id: SessionId,
    pub greeting: String,
}

/// Error type for starting a conversation.
#[derive(Debug)]
pub enum StartConversationError {
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for StartConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartConversationError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for StartConversationError {}

impl From<SessionStoreError> for StartConversationError {
    fn from(err: SessionStoreError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

/// Handler for opening a new order-taking conversation.
pub struct StartConversationHandler {
    sessions: Arc<dyn SessionStore>,
    settings: Arc<StoreSettings>,
}

impl StartConversationHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, settings: Arc<StoreSettings>) -> Self {
        Self { sessions, settings }
    }

    pub async fn handle(&self) -> Result<StartConversationResult, StartConversationError> {
        let session = OrderSession::new(SessionId::new());
        let session_id = session.id;
        self.sessions.put(session_id, session).await?;

        Ok(StartConversationResult {
            session_id,
            greeting: self.settings.greeting.clone(),
        })
    }
}
