// ============================
// crates/backend-lib/src/auth/expiring.rs
// ============================
//! Time-to-live enforcement on top of [`SessionStore`].
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use metrics::counter;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::session::{SessionEntry, SessionResolver, SessionStore};
use crate::config::SessionDuration;
use crate::metrics::SESSION_EXPIRED;

/// Sessions that stop resolving `duration` seconds after creation.
///
/// There is no sliding window and no background sweep: an expired entry is
/// simply ignored on lookup.
#[derive(Debug, Clone)]
pub struct ExpiringSessions {
    store: SessionStore,
    duration: SessionDuration,
    clock: Arc<dyn Clock>,
}

impl ExpiringSessions {
    pub fn new(store: SessionStore, duration: SessionDuration) -> Self {
        Self::with_clock(store, duration, Arc::new(SystemClock))
    }

    pub fn with_clock(store: SessionStore, duration: SessionDuration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            duration,
            clock,
        }
    }

    pub fn duration(&self) -> SessionDuration {
        self.duration
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether a session created at `created_at` is past its boundary.
    ///
    /// The boundary instant itself is still valid. A zero duration, or one too
    /// large to represent, never expires.
    pub fn is_expired(&self, created_at: DateTime<Utc>) -> bool {
        if self.duration.never_expires() {
            return false;
        }
        let boundary = i64::try_from(self.duration.as_secs())
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| created_at.checked_add_signed(ttl));

        match boundary {
            Some(boundary) => boundary < self.now(),
            None => false,
        }
    }

    /// Create a session and stamp it with the current time
    pub fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let session_id = self.store.create_session(Some(user_id))?;
        self.store.insert_entry(
            &session_id,
            SessionEntry {
                user_id: user_id.to_owned(),
                created_at: Some(self.now()),
            },
        );
        Some(session_id)
    }

    /// User bound to `session_id`; an expired entry is evicted on the way out
    pub fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        let session_id = session_id?;
        let entry = self.store.entry(session_id)?;
        // entries without a timestamp were not created through this layer
        let created_at = entry.created_at?;
        if self.is_expired(created_at) {
            self.store.remove(session_id);
            counter!(SESSION_EXPIRED).increment(1);
            return None;
        }
        Some(entry.user_id)
    }

    /// Drop the in-memory entry
    pub fn remove(&self, session_id: &str) -> bool {
        self.store.remove(session_id).is_some()
    }

    /// The wrapped store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[async_trait]
impl SessionResolver for ExpiringSessions {
    async fn create(&self, user_id: Option<&str>) -> Option<String> {
        self.create_session(user_id)
    }

    async fn lookup(&self, session_id: Option<&str>) -> Option<String> {
        self.user_id_for_session_id(session_id)
    }

    async fn destroy(&self, session_id: &str) -> bool {
        if self.user_id_for_session_id(Some(session_id)).is_none() {
            return false;
        }
        self.remove(session_id)
    }
}
