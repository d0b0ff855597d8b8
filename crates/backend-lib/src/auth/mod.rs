// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
//!
//! Layers, leaf first: path exclusion and credential extraction, then the
//! session layers ([`SessionStore`] → [`ExpiringSessions`] →
//! [`PersistentSessions`]), then the [`AuthStrategy`] implementations the
//! HTTP layer talks to.
pub mod basic;
pub mod clock;
pub mod credentials;
pub mod expiring;
pub mod password;
pub mod path;
pub mod persistent_session;
pub mod session;
pub mod strategy;

pub use basic::BasicAuth;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use expiring::ExpiringSessions;
pub use password::{
    hash_password, hash_password_async, hash_password_with_cost, verify_password,
    verify_password_async,
};
pub use path::require_auth;
pub use persistent_session::PersistentSessions;
pub use session::{SessionEntry, SessionResolver, SessionStore};
pub use strategy::{
    from_settings, AuthStrategy, BaseAuth, ExpiringSessionAuth, InMemorySessionAuth,
    PersistentSessionAuth, SessionAuth,
};
