// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Session authentication core for the session-gate HTTP API.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod redact;
pub mod router;
pub mod storage;

use std::sync::Arc;

use crate::accounts::Accounts;
use crate::auth::{from_settings, AuthStrategy, Clock, SystemClock};
use crate::config::Settings;
use crate::error::AppError;
use crate::models::User;
use crate::storage::{FileObjectStore, ObjectStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Strategy selected at startup
    pub auth: Arc<dyn AuthStrategy>,
    /// User records
    pub users: Arc<dyn ObjectStore<User>>,
    /// Registration and password reset over `users`
    pub accounts: Arc<Accounts>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Open the user store under `storage.path` and build the configured strategy
    pub async fn new(settings: Settings) -> Result<Self, AppError> {
        Self::with_clock(settings, Arc::new(SystemClock)).await
    }

    /// Same as [`AppState::new`] with an explicit time source
    pub async fn with_clock(settings: Settings, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let users = Arc::new(FileObjectStore::<User>::new(&settings.storage.path)?);
        users.load_all().await?;
        let auth = from_settings(&settings, users.clone(), clock).await?;
        Ok(Self::from_parts(auth, users, settings))
    }

    pub fn from_parts(
        auth: Arc<dyn AuthStrategy>,
        users: Arc<dyn ObjectStore<User>>,
        settings: Settings,
    ) -> Self {
        let accounts = Arc::new(Accounts::new(users.clone(), settings.auth.password_cost));
        Self {
            auth,
            users,
            accounts,
            settings: Arc::new(settings),
        }
    }
}
