// ============================
// crates/backend-lib/src/handlers/index.rs
// ============================
//! Status and error check endpoints.
use axum::Json;
use sessiongate_common::StatusResponse;

use crate::error::AppError;

/// `GET /api/v1/status`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// `GET /api/v1/unauthorized`: always 401
pub async fn unauthorized() -> AppError {
    AppError::Unauthorized
}

/// `GET /api/v1/forbidden`: always 403
pub async fn forbidden() -> AppError {
    AppError::Forbidden
}

pub async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}
