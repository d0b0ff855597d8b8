// ============================
// crates/backend-lib/src/models.rs
// ============================
//! Durable records kept in an [`ObjectStore`](crate::storage::ObjectStore).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sessiongate_common::UserResponse;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::storage::Record;

/// A user able to log in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// scrypt PHC string
    pub hashed_password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Single-use token for a pending password reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

impl User {
    /// Create a user, hashing `password`
    pub fn new(email: impl Into<String>, password: &str) -> anyhow::Result<Self> {
        Ok(Self::from_hash(email, hash_password(password)?))
    }

    /// Create a user from an already computed password hash
    pub fn from_hash(email: impl Into<String>, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            hashed_password,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
            reset_token: None,
        }
    }

    pub fn with_name(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn is_valid_password(&self, password: &str) -> bool {
        verify_password(&self.hashed_password, password)
    }
}

impl Record for User {
    const NAME: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Durable binding of a session id to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: &str, session_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            session_id: session_id.to_owned(),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Record for UserSession {
    const NAME: &'static str = "UserSession";

    fn id(&self) -> &str {
        &self.id
    }
}
