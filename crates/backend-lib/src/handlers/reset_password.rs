// ============================
// crates/backend-lib/src/handlers/reset_password.rs
// ============================
//! Password reset: request a token, then trade it for a new password.
use axum::{extract::State, Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::session_auth::required;
use crate::{error::AppError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ResetTokenForm {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePasswordForm {
    pub email: Option<String>,
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

/// `POST /api/v1/reset_password`: 403 for an unknown email
#[instrument(skip_all)]
pub async fn get_reset_password_token(
    State(state): State<AppState>,
    Form(form): Form<ResetTokenForm>,
) -> Result<Json<Value>, AppError> {
    let email = required(form.email, "email")?;
    let reset_token = state
        .accounts
        .get_reset_password_token(&email)
        .await
        .map_err(|err| match err {
            AppError::UserNotFound => AppError::Forbidden,
            other => other,
        })?;
    Ok(Json(json!({ "email": email, "reset_token": reset_token })))
}

/// `PUT /api/v1/reset_password`: 403 for an unknown or spent token
#[instrument(skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Json<Value>, AppError> {
    let email = required(form.email, "email")?;
    let reset_token = required(form.reset_token, "reset_token")?;
    let new_password = required(form.new_password, "new_password")?;

    state
        .accounts
        .update_password(&reset_token, &new_password)
        .await?;
    Ok(Json(json!({ "email": email, "message": "Password updated" })))
}
