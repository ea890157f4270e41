//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use chrono::{DateTime, Duration, Utc};
use email_assistant_core::{
    attachments::AttachmentSet,
    composer::EmailComposer,
    ports::CompletionService,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<dyn CompletionService>,
    pub composer: Arc<EmailComposer>,
    pub sessions: Arc<SessionStore>,
}

//=========================================================================================
// ComposeSession (Specific to One User's Compose Flow)
//=========================================================================================

/// The state one user accumulates while composing: currently just attachments.
#[derive(Debug, Clone)]
pub struct ComposeSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub attachments: AttachmentSet,
}

impl ComposeSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            attachments: AttachmentSet::new(),
        }
    }
}

impl Default for ComposeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store of compose sessions, keyed by session id.
///
/// Sessions expire `ttl` after creation. Creating a session sweeps expired ones
/// and, at `max_sessions`, evicts the oldest.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, ComposeSession>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn is_live(&self, session: &ComposeSession, now: DateTime<Utc>) -> bool {
        now - session.created_at < self.ttl
    }

    pub async fn create(&self) -> ComposeSession {
        let session = ComposeSession::new();
        let mut sessions = self.sessions.write().await;

        let now = Utc::now();
        sessions.retain(|_, s| self.is_live(s, now));
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!(session_id = %oldest, "Evicted oldest compose session");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<ComposeSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| self.is_live(s, Utc::now()))
            .cloned()
    }

    /// Runs `f` against the session with the given id, if it exists and has not expired.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ComposeSession) -> T,
    ) -> Option<T> {
        let now = Utc::now();
        self.sessions
            .write()
            .await
            .get_mut(&id)
            .filter(|s| self.is_live(s, now))
            .map(f)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn backdate(store: &SessionStore, id: Uuid, by: Duration) {
        let mut sessions = store.sessions.write().await;
        let session = sessions.get_mut(&id).unwrap();
        session.created_at = session.created_at - by;
    }

    #[tokio::test]
    async fn expired_sessions_are_not_returned() {
        let store = SessionStore::new(Duration::minutes(30), 10);
        let session = store.create().await;
        assert!(store.get(session.id).await.is_some());

        backdate(&store, session.id, Duration::minutes(31)).await;
        assert!(store.get(session.id).await.is_none());
        assert!(store.with_session(session.id, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn creating_a_session_sweeps_expired_ones() {
        let store = SessionStore::new(Duration::minutes(30), 10);
        let stale = store.create().await;
        let fresh = store.create().await;
        backdate(&store, stale.id, Duration::hours(2)).await;

        store.create().await;
        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 2);
        assert!(!sessions.contains_key(&stale.id));
        assert!(sessions.contains_key(&fresh.id));
    }

    #[tokio::test]
    async fn oldest_session_is_evicted_at_capacity() {
        let store = SessionStore::new(Duration::minutes(30), 2);
        let first = store.create().await;
        let second = store.create().await;
        backdate(&store, first.id, Duration::seconds(5)).await;

        let third = store.create().await;
        assert!(store.get(first.id).await.is_none());
        assert!(store.get(second.id).await.is_some());
        assert!(store.get(third.id).await.is_some());
        assert_eq!(store.sessions.read().await.len(), 2);
    }
}
