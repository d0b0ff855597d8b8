// ========================
// tests/unit/path_tests.rs
// ========================
//! Path exclusion as seen through the default strategy
use sessiongate_lib::auth::{require_auth, AuthStrategy, BaseAuth};
use sessiongate_lib::config::Settings;

#[test]
fn test_default_exclusions() {
    let excluded = Settings::default().auth.excluded_paths;

    for path in [
        "/api/v1/status",
        "/api/v1/status/",
        "/api/v1/unauthorized",
        "/api/v1/forbidden/",
        "/api/v1/auth_session/login",
    ] {
        assert!(!require_auth(Some(path), &excluded), "{path} should be public");
    }
    for path in ["/api/v1/users/me", "/api/v1/auth_session/logout", "/api/v1/stat"] {
        assert!(require_auth(Some(path), &excluded), "{path} should be protected");
    }
}

#[test]
fn test_wildcard_and_order() {
    let auth = BaseAuth::new(None);
    let excluded = vec!["/api/v1/users".to_string(), "/api/v1/stat*".to_string()];

    assert!(!auth.require_auth(Some("/api/v1/status"), &excluded));
    assert!(!auth.require_auth(Some("/api/v1/stats/"), &excluded));
    assert!(auth.require_auth(Some("/api/v1/users"), &excluded));

    let reversed: Vec<String> = excluded.iter().rev().cloned().collect();
    assert!(!auth.require_auth(Some("/api/v1/status"), &reversed));
}

#[test]
fn test_fail_closed() {
    let auth = BaseAuth::new(None);
    assert!(auth.require_auth(None, &["/api/v1/status/".to_string()]));
    assert!(auth.require_auth(Some("/api/v1/status"), &[]));
}
