// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
use axum::{extract::State, Extension, Json};
use sessiongate_common::{Principal, UserResponse};

use crate::{error::AppError, AppState};

/// `GET /api/v1/users/me`: the authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get(&principal.user_id)
        .ok_or_else(|| AppError::NotFound(format!("user {}", principal.user_id)))?;
    Ok(Json(UserResponse::from(&user)))
}
