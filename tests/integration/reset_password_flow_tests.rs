// ===========================================
// tests/integration/reset_password_flow_tests.rs
// ===========================================
//! Password reset through the full router
use axum::http::StatusCode;
use sessiongate_lib::{config::AuthType, router::create_router};
use tower::ServiceExt;

use crate::test_utils::{
    form_request, json_body, login_request, seed_user, setup_test_env, EMAIL, PASSWORD,
};

const RESET_URI: &str = "/api/v1/reset_password";

#[tokio::test]
async fn test_reset_password_flow() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(form_request("POST", RESET_URI, &[("email", EMAIL)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], EMAIL);
    let token = body["reset_token"].as_str().unwrap().to_string();

    let update = [
        ("email", EMAIL),
        ("reset_token", token.as_str()),
        ("new_password", "n3wPassw0rd"),
    ];
    let response = app
        .clone()
        .oneshot(form_request("PUT", RESET_URI, &update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], EMAIL);
    assert_eq!(body["message"], "Password updated");

    // the token is spent
    let response = app
        .clone()
        .oneshot(form_request("PUT", RESET_URI, &update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(login_request(Some(EMAIL), Some(PASSWORD)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(login_request(Some(EMAIL), Some("n3wPassw0rd")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reset_token_for_unknown_email_is_forbidden() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(form_request("POST", RESET_URI, &[("email", "eve@hbtn.io")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(form_request("POST", RESET_URI, &[]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "email missing");
}

#[tokio::test]
async fn test_update_password_with_unknown_token_is_forbidden() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(form_request(
            "PUT",
            RESET_URI,
            &[("email", EMAIL), ("reset_token", "bogus"), ("new_password", "x")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(form_request(
            "PUT",
            RESET_URI,
            &[("email", EMAIL), ("reset_token", "bogus")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "new_password missing");
}
