use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Checks the shared-secret bearer token the voice platform sends.
pub fn authorized(headers: &HeaderMap, expected: &str) -> bool {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) else {
        return false;
    };
    match value.strip_prefix("Bearer ") {
        Some(token) => !expected.is_empty() && token.trim() == expected,
        None => false,
    }
}
