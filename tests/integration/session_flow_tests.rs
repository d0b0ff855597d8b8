// ====================================
// tests/integration/session_flow_tests.rs
// ====================================
//! Login, access and logout through the full router
use axum::http::{header, StatusCode};
use sessiongate_lib::{config::AuthType, router::create_router, AppState};
use tower::ServiceExt;

use crate::test_utils::{
    json_body, login_request, request, seed_user, session_id_from, setup_test_env, test_settings,
    EMAIL, PASSWORD,
};

#[tokio::test]
async fn test_status_is_public() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;

    let response = create_router(state)
        .oneshot(request("GET", "/api/v1/status", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "OK");
}

#[tokio::test]
async fn test_status_and_error_endpoints() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/v1/unauthorized", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");

    let response = app
        .oneshot(request("GET", "/api/v1/forbidden", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "Forbidden");
}

#[tokio::test]
async fn test_login_me_logout() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    let user = seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(login_request(Some(EMAIL), Some(PASSWORD)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.contains("HttpOnly"));
    let session_id = session_id_from(&response).unwrap();
    let body = json_body(response).await;
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["email"], EMAIL);
    assert!(body.get("hashed_password").is_none());

    let response = app
        .clone()
        .oneshot(request("GET", "/api/v1/users/me", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], user.id.as_str());

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/v1/auth_session/logout", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({}));

    let response = app
        .oneshot(request("GET", "/api/v1/users/me", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_errors() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let cases = [
        (None, Some(PASSWORD), StatusCode::BAD_REQUEST, "email missing"),
        (Some(EMAIL), None, StatusCode::BAD_REQUEST, "password missing"),
        (
            Some("eve@hbtn.io"),
            Some(PASSWORD),
            StatusCode::NOT_FOUND,
            "no user found for this email",
        ),
        (Some(EMAIL), Some("wrong"), StatusCode::UNAUTHORIZED, "wrong password"),
    ];

    for (email, password, status, error) in cases {
        let response = app
            .clone()
            .oneshot(login_request(email, password))
            .await
            .unwrap();
        assert_eq!(response.status(), status);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["error"], error);
    }
}

#[tokio::test]
async fn test_protected_routes_without_credentials() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    let app = create_router(state);

    for (method, uri) in [
        ("GET", "/api/v1/users/me"),
        ("DELETE", "/api/v1/auth_session/logout"),
        ("GET", "/api/v1/nowhere"),
    ] {
        let response = app.clone().oneshot(request(method, uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let response = app
        .oneshot(request("GET", "/api/v1/users/me", Some("forged")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_route_for_authenticated_user() {
    let (state, _clock, _temp_dir) = setup_test_env(AuthType::SessionAuth, 0).await;
    let user = seed_user(&state, EMAIL, PASSWORD).await;
    let session_id = state.auth.create_session(Some(&user.id)).await.unwrap();

    let response = create_router(state)
        .oneshot(request("GET", "/api/v1/nowhere", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Not found");
}

#[tokio::test]
async fn test_expiring_session_times_out() {
    let (state, clock, _temp_dir) = setup_test_env(AuthType::SessionExpAuth, 5).await;
    seed_user(&state, EMAIL, PASSWORD).await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(login_request(Some(EMAIL), Some(PASSWORD)))
        .await
        .unwrap();
    let session_id = session_id_from(&response).unwrap();

    clock.advance_secs(5);
    let response = app
        .clone()
        .oneshot(request("GET", "/api/v1/users/me", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    clock.advance_secs(1);
    let response = app
        .oneshot(request("GET", "/api/v1/users/me", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_persistent_session_survives_restart() {
    let (state, clock, temp_dir) = setup_test_env(AuthType::SessionDbAuth, 0).await;
    let user = seed_user(&state, EMAIL, PASSWORD).await;

    let response = create_router(state)
        .oneshot(login_request(Some(EMAIL), Some(PASSWORD)))
        .await
        .unwrap();
    let session_id = session_id_from(&response).unwrap();

    let stored = std::fs::read_to_string(temp_dir.path().join(".db_UserSession.json")).unwrap();
    assert!(stored.contains(&session_id));

    let restarted = AppState::with_clock(
        test_settings(&temp_dir, AuthType::SessionDbAuth, 0),
        std::sync::Arc::new(clock),
    )
    .await
    .unwrap();
    let response = create_router(restarted)
        .oneshot(request("GET", "/api/v1/users/me", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], user.id.as_str());
}
