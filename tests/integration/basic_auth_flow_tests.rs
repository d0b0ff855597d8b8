// =========================================
// tests/integration/basic_auth_flow_tests.rs
// =========================================
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sessiongate_lib::{config::AuthType, router::create_router};
use tower::ServiceExt;

use crate::test_utils::{json_body, seed_user, setup_test_env, EMAIL, PASSWORD};

fn basic_request(credentials: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/v1/users/me")
        .header(header::AUTHORIZATION, format!("Basic {}", STANDARD.encode(credentials)))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_basic_auth_me() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::BasicAuth, 0).await;
    let user = seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(basic_request(&format!("{EMAIL}:{PASSWORD}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], user.id.as_str());

    let response = app
        .oneshot(basic_request(&format!("{EMAIL}:nope")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_basic_auth_rejects_other_schemes() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::BasicAuth, 0).await;
    seed_user(&state, EMAIL, PASSWORD).await;

    let request = Request::builder()
        .uri("/api/v1/users/me")
        .header(header::AUTHORIZATION, "Bearer abc")
        .body(Body::empty())
        .unwrap();
    let response = create_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
