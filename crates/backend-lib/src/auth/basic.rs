// ============================
// crates/backend-lib/src/auth/basic.rs
// ============================
//! HTTP Basic authentication (RFC 7617) against the user store.
use async_trait::async_trait;
use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sessiongate_common::Principal;
use std::sync::Arc;

use super::password::verify_password_async;
use super::strategy::AuthStrategy;
use crate::models::User;
use crate::storage::ObjectStore;

const BASIC_PREFIX: &str = "Basic ";

/// Strategy authenticating every request with `Authorization: Basic`
pub struct BasicAuth {
    session_name: Option<String>,
    users: Arc<dyn ObjectStore<User>>,
}

impl BasicAuth {
    pub fn new(session_name: Option<String>, users: Arc<dyn ObjectStore<User>>) -> Self {
        Self {
            session_name,
            users,
        }
    }

    /// Base64 part of a `Basic` authorization header
    pub fn extract_base64_authorization_header(header: Option<&str>) -> Option<&str> {
        header?.strip_prefix(BASIC_PREFIX)
    }

    /// Decode the credentials; `None` if not base64 or not UTF-8
    pub fn decode_base64_authorization_header(encoded: Option<&str>) -> Option<String> {
        let bytes = STANDARD.decode(encoded?).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Split `email:password`; the password may itself contain `:`
    pub fn extract_user_credentials(decoded: Option<&str>) -> Option<(String, String)> {
        let (email, password) = decoded?.split_once(':')?;
        Some((email.to_owned(), password.to_owned()))
    }

    /// User with this email whose password matches.
    ///
    /// The scrypt check runs on the blocking pool.
    pub async fn user_object_from_credentials(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Option<User> {
        let (email, password) = (email?, password?);
        let user = self
            .users
            .search(&|user: &User| user.email == email)
            .into_iter()
            .next()?;
        verify_password_async(&user.hashed_password, password)
            .await
            .then_some(user)
    }
}

#[async_trait]
impl AuthStrategy for BasicAuth {
    fn session_name(&self) -> Option<&str> {
        self.session_name.as_deref()
    }

    async fn current_user(&self, request: Option<&HeaderMap>) -> Option<Principal> {
        let header = self.authorization_header(request);
        let encoded = Self::extract_base64_authorization_header(header.as_deref());
        let decoded = Self::decode_base64_authorization_header(encoded);
        let (email, password) = Self::extract_user_credentials(decoded.as_deref())?;
        let user = self
            .user_object_from_credentials(Some(&email), Some(&password))
            .await?;
        Some(Principal::new(user.id))
    }
}
