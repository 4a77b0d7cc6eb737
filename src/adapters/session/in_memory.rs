//! In-Memory Session Store Adapter
//!
//! Holds order sessions in process memory for the process's lifetime.
//! Idle sessions are evicted by a TTL sweep so memory stays bounded.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::order::OrderSession;
use crate::ports::{SessionStore, SessionStoreError};

/// Default idle lifetime before a session is evicted.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// In-memory storage for order sessions.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, OrderSession>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    /// Creates a store with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Creates a store with a custom idle TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of live sessions (useful for tests).
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Removes sessions idle longer than the TTL. Returns how many were
    /// evicted. Call periodically from a background task.
    pub async fn sweep_expired(&self) -> usize {
        let cutoff = Timestamp::now().minus_seconds(self.ttl.as_secs() as i64);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.updated_at.is_before(&cutoff));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "swept expired sessions");
        }
        evicted
    }

    /// Spawns a background task sweeping on a fixed interval. The clone
    /// shares the underlying map, so evictions are visible to all handles.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tick.tick().await;
                store.sweep_expired().await;
            }
        })
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: SessionId) -> Result<OrderSession, SessionStoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(id))
    }

    async fn put(&self, id: SessionId, session: OrderSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session);
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> OrderSession {
        OrderSession::new(SessionId::new())
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemorySessionStore::new();
        let s = session();
        let id = s.id;
        store.put(id, s.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        let result = store.get(SessionId::new()).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        let s = session();
        let id = s.id;
        store.put(id, s).await.unwrap();
        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn sweep_evicts_only_idle_sessions() {
        let store = InMemorySessionStore::with_ttl(Duration::from_secs(60));

        let fresh = session();
        store.put(fresh.id, fresh).await.unwrap();

        let mut stale = session();
        stale.updated_at = Timestamp::now().minus_seconds(3600);
        store.put(stale.id, stale).await.unwrap();

        let evicted = store.sweep_expired().await;
        assert_eq!(evicted, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sweep_with_nothing_stale_evicts_nothing() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.put(s.id, s).await.unwrap();
        assert_eq!(store.sweep_expired().await, 0);
    }
}
