// ============================
// crates/backend-lib/src/auth/path.rs
// ============================
//! Decides whether a request path is exempt from authentication.

/// Marker turning an excluded path into a prefix pattern
pub const WILDCARD: char = '*';

/// Returns `true` when `path` must be authenticated.
///
/// A missing or empty path and an empty exclusion list both require
/// authentication. `path` is compared with a trailing `/` appended, so
/// `/api/v1/status` and `/api/v1/status/` are equivalent. Patterns ending in
/// [`WILDCARD`] match by prefix, all others must be equal. Any match exempts
/// the path, whatever the order of the patterns.
pub fn require_auth<S: AsRef<str>>(path: Option<&str>, excluded_paths: &[S]) -> bool {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return true;
    };
    if excluded_paths.is_empty() {
        return true;
    }

    let normalized = if path.ends_with('/') {
        path.to_owned()
    } else {
        format!("{path}/")
    };

    !excluded_paths
        .iter()
        .any(|pattern| matches(&normalized, pattern.as_ref()))
}

fn matches(normalized: &str, pattern: &str) -> bool {
    match pattern.strip_suffix(WILDCARD) {
        Some(prefix) => normalized.starts_with(prefix),
        None => normalized == pattern,
    }
}
