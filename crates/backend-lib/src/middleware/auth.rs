// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Request filter run before every handler.
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::debug;

use crate::metrics::AUTH_DENIED;
use crate::{error::AppError, AppState};

/// Authentication gate.
///
/// Excluded paths pass through untouched. Otherwise a request carrying
/// neither an `Authorization` header nor the session cookie is rejected with
/// 401, and one whose credentials do not resolve to a user with 403. On
/// success the [`Principal`](sessiongate_common::Principal) is stored in the
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_owned();
    if !state
        .auth
        .require_auth(Some(&path), &state.settings.auth.excluded_paths)
    {
        return Ok(next.run(request).await);
    }

    let headers = request.headers();
    if state.auth.authorization_header(Some(headers)).is_none()
        && state.auth.session_cookie(Some(headers)).is_none()
    {
        counter!(AUTH_DENIED, "reason" => "unauthorized").increment(1);
        debug!(target: "security", %path, "no credentials");
        return Err(AppError::Unauthorized);
    }

    let Some(principal) = state.auth.current_user(Some(headers)).await else {
        counter!(AUTH_DENIED, "reason" => "forbidden").increment(1);
        debug!(target: "security", %path, "credentials did not resolve");
        return Err(AppError::Forbidden);
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
