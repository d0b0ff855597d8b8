// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{index, reset_password, session_auth, users};
use crate::middleware::authenticate;
use crate::AppState;

/// Build the application router.
///
/// The authentication gate wraps every route, the fallback included; which
/// paths it lets through is decided by `auth.excluded_paths`.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(index::status))
        .route("/unauthorized", get(index::unauthorized))
        .route("/forbidden", get(index::forbidden))
        .route("/users/me", get(users::me))
        .route("/auth_session/login", post(session_auth::login))
        .route("/auth_session/logout", delete(session_auth::logout))
        .route(
            "/reset_password",
            post(reset_password::get_reset_password_token).put(reset_password::update_password),
        );

    Router::new()
        .nest("/api/v1", api)
        .fallback(index::not_found)
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
