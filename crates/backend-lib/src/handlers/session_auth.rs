// ============================
// crates/backend-lib/src/handlers/session_auth.rs
// ============================
//! Session login and logout.
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sessiongate_common::UserResponse;
use tracing::{info, instrument, warn};

use crate::auth::password::verify_password_async;
use crate::models::User;
use crate::redact::redact_pii;
use crate::{error::AppError, AppState};

/// Form body of `POST /api/v1/auth_session/login`
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingField(field))
}

/// Check the credentials, open a session and set its cookie.
///
/// 400 when a field is missing, 404 for an unknown email and 401 for a wrong
/// password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = required(form.email, "email")?;
    let password = required(form.password, "password")?;
    info!(
        target: "security",
        "{}",
        redact_pii(&format!("login attempt: email={email};password={password};"))
    );

    let user = state
        .users
        .search(&|user: &User| user.email == email)
        .into_iter()
        .next()
        .ok_or(AppError::UserNotFound)?;

    if !verify_password_async(&user.hashed_password, &password).await {
        warn!(target: "security", user_id = %user.id, "wrong password");
        return Err(AppError::WrongPassword);
    }

    let session_name = state
        .auth
        .session_name()
        .ok_or_else(|| AppError::Config("session name is not configured".to_string()))?
        .to_owned();
    let session_id = state
        .auth
        .create_session(Some(&user.id))
        .await
        .ok_or_else(|| AppError::Internal("session could not be created".to_string()))?;

    info!(target: "security", user_id = %user.id, "session opened");
    let cookie = format!("{session_name}={session_id}; Path=/; HttpOnly");
    Ok(([(SET_COOKIE, cookie)], Json(UserResponse::from(&user))).into_response())
}

/// Destroy the session named by the request cookie
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    if !state.auth.destroy_session(Some(&headers)).await {
        return Err(AppError::NotFound("session".to_string()));
    }
    info!(target: "security", "session closed");
    Ok(Json(json!({})))
}
