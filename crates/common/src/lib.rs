// ================
// common/src/lib.rs
// ================
//! Common types shared between the session-gate library, its binary and
//! API clients. This module defines the JSON bodies exchanged over HTTP and
//! the principal handed to request handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity resolved for a request.
///
/// Only the user identifier is carried; loading the full user record is the
/// handler's business.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub user_id: String,
}

impl Principal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Public view of a user record (never contains the password hash)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `GET /api/v1/status`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Error body returned by every failing endpoint
/// # Fields
/// * `error` - Human readable reason, deliberately coarse for auth failures
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
