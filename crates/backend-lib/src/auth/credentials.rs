// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================
//! Pulls raw credentials out of request headers.
//!
//! Nothing here interprets the values: scheme parsing belongs to the
//! strategies.
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};

/// Raw `Authorization` header value, if present and non-empty
pub fn authorization_header(request: Option<&HeaderMap>) -> Option<String> {
    let value = request?.get(AUTHORIZATION)?.to_str().ok()?;
    if value.is_empty() {
        return None;
    }
    Some(value.to_owned())
}

/// Value of the cookie called `name`, searching every `Cookie` header
pub fn cookie(request: Option<&HeaderMap>, name: &str) -> Option<String> {
    request?
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_owned())
        })
}

/// Value of the session cookie; absent when no session name is configured
pub fn session_cookie(request: Option<&HeaderMap>, session_name: Option<&str>) -> Option<String> {
    let name = session_name.filter(|n| !n.is_empty())?;
    cookie(request, name)
}
