// =============
// crates/backend-lib/src/auth/strategy.rs
// =============
//! The `AuthStrategy` trait called by the HTTP layer, its concrete
//! implementations and the factory picking one from configuration.
use async_trait::async_trait;
use axum::http::HeaderMap;
use sessiongate_common::Principal;
use std::sync::Arc;
use tracing::info;

use super::basic::BasicAuth;
use super::clock::Clock;
use super::credentials;
use super::expiring::ExpiringSessions;
use super::path;
use super::persistent_session::PersistentSessions;
use super::session::{SessionResolver, SessionStore};
use crate::config::{AuthType, Settings};
use crate::error::AppError;
use crate::models::{User, UserSession};
use crate::storage::{FileObjectStore, ObjectStore};

/// Authentication strategy.
///
/// The provided methods describe the base behaviour: credentials can be
/// extracted but never resolved, and no sessions are issued. Strategies
/// override what they support.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Name of the session cookie, if one is configured
    fn session_name(&self) -> Option<&str>;

    /// Whether `path` needs authentication given `excluded_paths`
    fn require_auth(&self, path: Option<&str>, excluded_paths: &[String]) -> bool {
        path::require_auth(path, excluded_paths)
    }

    fn authorization_header(&self, request: Option<&HeaderMap>) -> Option<String> {
        credentials::authorization_header(request)
    }

    fn session_cookie(&self, request: Option<&HeaderMap>) -> Option<String> {
        credentials::session_cookie(request, self.session_name())
    }

    /// Identity behind the request's credentials
    async fn current_user(&self, _request: Option<&HeaderMap>) -> Option<Principal> {
        None
    }

    async fn create_session(&self, _user_id: Option<&str>) -> Option<String> {
        None
    }

    async fn user_id_for_session_id(&self, _session_id: Option<&str>) -> Option<String> {
        None
    }

    /// Revoke the session named by the request's cookie
    async fn destroy_session(&self, _request: Option<&HeaderMap>) -> bool {
        false
    }
}

/// Base strategy: every protected request is refused
#[derive(Debug, Clone, Default)]
pub struct BaseAuth {
    session_name: Option<String>,
}

impl BaseAuth {
    pub fn new(session_name: Option<String>) -> Self {
        Self { session_name }
    }
}

impl AuthStrategy for BaseAuth {
    fn session_name(&self) -> Option<&str> {
        self.session_name.as_deref()
    }
}

/// Session-cookie strategy over any [`SessionResolver`] layer
pub struct SessionAuth<R> {
    resolver: R,
    session_name: Option<String>,
    users: Arc<dyn ObjectStore<User>>,
}

/// Sessions kept in memory, never expiring
pub type InMemorySessionAuth = SessionAuth<SessionStore>;
/// Sessions kept in memory with a time-to-live
pub type ExpiringSessionAuth = SessionAuth<ExpiringSessions>;
/// Sessions persisted to the object store
pub type PersistentSessionAuth = SessionAuth<PersistentSessions>;

impl<R: SessionResolver> SessionAuth<R> {
    pub fn new(resolver: R, session_name: Option<String>, users: Arc<dyn ObjectStore<User>>) -> Self {
        Self {
            resolver,
            session_name,
            users,
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

#[async_trait]
impl<R: SessionResolver> AuthStrategy for SessionAuth<R> {
    fn session_name(&self) -> Option<&str> {
        self.session_name.as_deref()
    }

    async fn current_user(&self, request: Option<&HeaderMap>) -> Option<Principal> {
        let session_id = self.session_cookie(request)?;
        let user_id = self.resolver.lookup(Some(&session_id)).await?;
        // sessions of deleted users do not authenticate
        let user = self.users.get(&user_id)?;
        Some(Principal::new(user.id))
    }

    async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        self.resolver.create(user_id).await
    }

    async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.resolver.lookup(session_id).await
    }

    async fn destroy_session(&self, request: Option<&HeaderMap>) -> bool {
        let Some(session_id) = self.session_cookie(request) else {
            return false;
        };
        self.resolver.destroy(&session_id).await
    }
}

/// Build the strategy named by `settings.auth.auth_type`.
///
/// Called once at startup; the result is shared for the process lifetime.
pub async fn from_settings(
    settings: &Settings,
    users: Arc<dyn ObjectStore<User>>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn AuthStrategy>, AppError> {
    let auth = &settings.auth;
    let session_name = auth.session_name.clone();
    let expiring =
        || ExpiringSessions::with_clock(SessionStore::new(), auth.session_duration, clock.clone());

    let strategy: Arc<dyn AuthStrategy> = match auth.auth_type {
        AuthType::Auth => Arc::new(BaseAuth::new(session_name)),
        AuthType::BasicAuth => Arc::new(BasicAuth::new(session_name, users)),
        AuthType::SessionAuth => {
            Arc::new(InMemorySessionAuth::new(SessionStore::new(), session_name, users))
        },
        AuthType::SessionExpAuth => {
            Arc::new(ExpiringSessionAuth::new(expiring(), session_name, users))
        },
        AuthType::SessionDbAuth => {
            let records = Arc::new(FileObjectStore::<UserSession>::new(&settings.storage.path)?);
            records.load_all().await?;
            let backend = PersistentSessions::new(expiring(), records);
            Arc::new(PersistentSessionAuth::new(backend, session_name, users))
        },
    };

    info!(
        auth_type = ?auth.auth_type,
        session_duration = auth.session_duration.as_secs(),
        "authentication strategy selected"
    );
    Ok(strategy)
}
