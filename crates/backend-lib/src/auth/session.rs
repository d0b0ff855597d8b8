// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! In-memory session storage and the resolver seam shared by every layer.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::sync::Arc;
use uuid::Uuid;

use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED};

/// Create, look up and destroy sessions.
///
/// Implemented by [`SessionStore`], [`ExpiringSessions`](super::ExpiringSessions)
/// and [`PersistentSessions`](super::PersistentSessions); each wraps the one
/// before it. Invalid input and unknown or expired sessions all come back as
/// `None`/`false`.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Issue a session for `user_id`
    async fn create(&self, user_id: Option<&str>) -> Option<String>;

    /// User bound to `session_id`, if it still resolves
    async fn lookup(&self, session_id: Option<&str>) -> Option<String>;

    /// Revoke `session_id`; `false` if there was nothing to revoke
    async fn destroy(&self, session_id: &str) -> bool;
}

/// What the store keeps per session id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub user_id: String,
    /// Set by layers that care about time; the base store leaves it empty
    pub created_at: Option<DateTime<Utc>>,
}

/// Session store keyed by session id.
///
/// Backed by a sharded map: lookups of different sessions never wait on each
/// other and writes are serialized per key. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fresh UUID v4 session id to `user_id`
    pub fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let session_id = Uuid::new_v4().to_string();
        self.sessions.insert(
            session_id.clone(),
            SessionEntry {
                user_id: user_id.to_owned(),
                created_at: None,
            },
        );

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        Some(session_id)
    }

    pub fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.sessions
            .get(session_id?)
            .map(|entry| entry.value().user_id.clone())
    }

    /// Full entry for `session_id`
    pub fn entry(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Overwrite the entry for an existing or new session id
    pub fn insert_entry(&self, session_id: &str, entry: SessionEntry) {
        self.sessions.insert(session_id.to_owned(), entry);
    }

    /// Drop a session; returns the removed entry
    pub fn remove(&self, session_id: &str) -> Option<SessionEntry> {
        let removed = self.sessions.remove(session_id).map(|(_, entry)| entry);
        if removed.is_some() {
            gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionResolver for SessionStore {
    async fn create(&self, user_id: Option<&str>) -> Option<String> {
        self.create_session(user_id)
    }

    async fn lookup(&self, session_id: Option<&str>) -> Option<String> {
        self.user_id_for_session_id(session_id)
    }

    async fn destroy(&self, session_id: &str) -> bool {
        self.remove(session_id).is_some()
    }
}
