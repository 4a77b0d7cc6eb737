//! Session Store Port - keyed storage for in-progress order sessions.
//!
//! The transport owns creation, lookup-by-id, and expiry; the dialogue core
//! receives a session by value each turn and hands it back mutated. This
//! port replaces the global mutable session map the original design grew.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::order::OrderSession;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for keeping order sessions between turns.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists.
    async fn get(&self, id: SessionId) -> Result<OrderSession, SessionStoreError>;

    /// Saves a session under its id, replacing any previous state.
    async fn put(&self, id: SessionId, session: OrderSession) -> Result<(), SessionStoreError>;

    /// Removes a session. Removing a missing session is not an error.
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;
}
