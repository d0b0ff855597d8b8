// ============================
// crates/backend-lib/src/auth/persistent_session.rs
// ============================
//! Persistent session storage.
//!
//! Extends [`ExpiringSessions`] with durable `UserSession` records so sessions
//! survive server restarts. Every create and destroy flushes the complete
//! record set.
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::expiring::ExpiringSessions;
use super::session::SessionResolver;
use crate::metrics::{SESSION_DESTROYED, SESSION_EXPIRED, SESSION_PERSIST_FAILED};
use crate::models::UserSession;
use crate::storage::{ObjectStore, StoreError};

/// Durable session backend
pub struct PersistentSessions {
    /// Inner expiring sessions; also owns the expiry rule
    inner: ExpiringSessions,
    /// Durable records
    records: Arc<dyn ObjectStore<UserSession>>,
    /// Held across each load → mutate → flush cycle. Without it a reload in
    /// one request can drop a record another request saved but has not
    /// flushed yet, or bring back one that was just removed.
    flush_lock: Mutex<()>,
}

impl PersistentSessions {
    pub fn new(inner: ExpiringSessions, records: Arc<dyn ObjectStore<UserSession>>) -> Self {
        Self {
            inner,
            records,
            flush_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &ExpiringSessions {
        &self.inner
    }

    /// Create a session and persist its durable record
    pub async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let _guard = self.flush_lock.lock().await;

        let session_id = self.inner.create_session(Some(user_id))?;
        let record = UserSession::new(user_id, &session_id, self.inner.now());
        self.records.save(record.clone());

        if let Err(err) = self.records.save_all().await {
            // the session must not resolve in memory when it was never persisted
            warn!(target: "security", error = %err, "failed to persist new session");
            counter!(SESSION_PERSIST_FAILED).increment(1);
            let _ = self.records.remove(&record);
            self.inner.remove(&session_id);
            return None;
        }

        info!(target: "security", user_id, "session created");
        Some(session_id)
    }

    /// Resolve a session from stable storage
    pub async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        let session_id = session_id?;
        let _guard = self.flush_lock.lock().await;
        self.resolve(session_id).await.map(|record| record.user_id)
    }

    /// Revoke a session and flush the record set
    pub async fn destroy_session(&self, session_id: &str) -> bool {
        let _guard = self.flush_lock.lock().await;

        let Some(record) = self.resolve(session_id).await else {
            return false;
        };

        match self.remove_and_flush(&record).await {
            Ok(()) => {
                self.inner.remove(session_id);
                counter!(SESSION_DESTROYED).increment(1);
                info!(target: "security", user_id = %record.user_id, "session destroyed");
                true
            },
            Err(err) => {
                warn!(target: "security", error = %err, "failed to destroy session");
                counter!(SESSION_PERSIST_FAILED).increment(1);
                // realign the in-process view with what is on disk
                if let Err(err) = self.records.load_all().await {
                    warn!(target: "security", error = %err, "failed to reload sessions");
                }
                false
            },
        }
    }

    /// Reload and search; caller holds `flush_lock`. Expired records are
    /// removed and the set flushed.
    async fn resolve(&self, session_id: &str) -> Option<UserSession> {
        if let Err(err) = self.records.load_all().await {
            warn!(target: "security", error = %err, "failed to load sessions");
            return None;
        }

        let record = self
            .records
            .search(&|r: &UserSession| r.session_id == session_id)
            .into_iter()
            .next()?;

        if self.inner.is_expired(record.created_at) {
            debug!(target: "security", "session expired");
            counter!(SESSION_EXPIRED).increment(1);
            self.inner.remove(session_id);
            if let Err(err) = self.remove_and_flush(&record).await {
                warn!(target: "security", error = %err, "failed to evict expired session");
            }
            return None;
        }
        Some(record)
    }

    async fn remove_and_flush(&self, record: &UserSession) -> Result<(), StoreError> {
        self.records.remove(record)?;
        self.records.save_all().await
    }
}

#[async_trait]
impl SessionResolver for PersistentSessions {
    async fn create(&self, user_id: Option<&str>) -> Option<String> {
        self.create_session(user_id).await
    }

    async fn lookup(&self, session_id: Option<&str>) -> Option<String> {
        self.user_id_for_session_id(session_id).await
    }

    async fn destroy(&self, session_id: &str) -> bool {
        self.destroy_session(session_id).await
    }
}
