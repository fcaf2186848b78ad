//! Shared-secret authentication for the worker-facing endpoints.
//!
//! Workers authenticate with `Authorization: <prefix><key>` (prefix
//! typically `Bearer `). An empty configured key disables the check
//! entirely, which is the default for local development.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Why a request was rejected. The first three are malformed credentials
/// (401); only an actual key mismatch is 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    EmptyKey,
    WrongKey,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader | AuthError::InvalidFormat | AuthError::EmptyKey => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::WrongKey => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Unauthorized: missing authorization header",
            AuthError::InvalidFormat => "Unauthorized: invalid authorization header format",
            AuthError::EmptyKey => "Unauthorized: empty API key",
            AuthError::WrongKey => "Unauthorized: invalid API key",
        }
    }
}

/// Worker-auth settings: header prefix plus the expected key.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    key_prefix: String,
    key: String,
}

impl AuthConfig {
    pub fn new(key_prefix: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.is_empty() {
            tracing::warn!("Empty worker API key configured, internal endpoints are open");
        }
        Self {
            key_prefix: key_prefix.into(),
            key,
        }
    }

    pub fn disabled() -> Self {
        Self {
            key_prefix: String::new(),
            key: String::new(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !self.key.is_empty()
    }

    /// Validates the `Authorization` header value. Pass-through when no key
    /// is configured.
    pub fn check(&self, header: Option<&str>) -> Result<(), AuthError> {
        if !self.requires_auth() {
            return Ok(());
        }

        let header = header.ok_or(AuthError::MissingHeader)?;
        let key = header
            .strip_prefix(&self.key_prefix)
            .ok_or(AuthError::InvalidFormat)?;
        if key.is_empty() {
            return Err(AuthError::EmptyKey);
        }
        if !constant_time_eq(key, &self.key) {
            return Err(AuthError::WrongKey);
        }

        Ok(())
    }
}

/// Axum middleware enforcing [`AuthConfig`] on a route tree.
pub async fn require_worker_auth(
    State(auth): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match auth.check(header) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!("Rejected worker request: {}", err.message());
            (err.status(), err.message()).into_response()
        }
    }
}

/// Compares the full strings regardless of where the first difference is,
/// so response timing does not leak how much of the key matched.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_auth_accepts_anything() {
        let auth = AuthConfig::disabled();
        assert!(!auth.requires_auth());
        assert!(auth.check(None).is_ok());
        assert!(auth.check(Some("garbage")).is_ok());
    }

    #[test]
    fn test_valid_key_accepted() {
        let auth = AuthConfig::new("Bearer ", "secret-key");
        assert!(auth.requires_auth());
        assert!(auth.check(Some("Bearer secret-key")).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let auth = AuthConfig::new("Bearer ", "secret-key");
        assert_eq!(auth.check(None), Err(AuthError::MissingHeader));
        assert_eq!(AuthError::MissingHeader.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_wrong_prefix() {
        let auth = AuthConfig::new("Bearer ", "secret-key");
        assert_eq!(
            auth.check(Some("Token secret-key")),
            Err(AuthError::InvalidFormat)
        );
    }

    #[test]
    fn test_empty_key() {
        let auth = AuthConfig::new("Bearer ", "secret-key");
        assert_eq!(auth.check(Some("Bearer ")), Err(AuthError::EmptyKey));
    }

    #[test]
    fn test_wrong_key_is_forbidden() {
        let auth = AuthConfig::new("Bearer ", "secret-key");
        assert_eq!(auth.check(Some("Bearer nope")), Err(AuthError::WrongKey));
        assert_eq!(AuthError::WrongKey.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("same-key", "same-key"));
        assert!(constant_time_eq("", ""));
        assert!(!constant_time_eq("key1", "key2"));
        assert!(!constant_time_eq("short", "longer"));
    }
}
