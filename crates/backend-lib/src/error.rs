// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sessiongate_common::ErrorResponse;
use thiserror::Error;

use crate::storage::StoreError;

/// Application error types surfaced to the HTTP layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0} missing")]
    MissingField(&'static str),

    #[error("no user found for this email")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("email already registered")]
    UserExists(String),

    #[error("invalid reset token")]
    InvalidResetToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::InvalidResetToken => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::MissingField(_) | AppError::UserExists(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Message placed in the JSON body; internals never leak to clients
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) => "Not found".to_string(),
            AppError::Config(_) | AppError::Store(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
