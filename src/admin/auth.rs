//! HTTP basic authentication for the management API.
//!
//! - no `Authorization` header → 401
//! - header present but undecodable or wrong → 403
//! - matching credentials → request proceeds

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::http::response::ApiError;

/// The single admin identity, fixed for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    Missing,
    Rejected,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn check(&self, header: Option<&HeaderValue>) -> AuthOutcome {
        let Some(header) = header else {
            return AuthOutcome::Missing;
        };
        match header.to_str().ok().and_then(decode_basic) {
            Some((user, pass)) if user == self.username && pass == self.password => {
                AuthOutcome::Authorized
            }
            _ => AuthOutcome::Rejected,
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decode `Basic <base64(user:pass)>`. The password may contain `:`.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub async fn admin_auth_middleware(
    State(credentials): State<Arc<AdminCredentials>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match credentials.check(request.headers().get(AUTHORIZATION)) {
        AuthOutcome::Authorized => next.run(request).await,
        AuthOutcome::Missing => ApiError::Unauthorized.into_response(),
        AuthOutcome::Rejected => {
            tracing::warn!(path = %request.uri().path(), "Rejected admin credentials");
            ApiError::Forbidden.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user_pass: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(user_pass))).unwrap()
    }

    #[test]
    fn test_outcomes() {
        let creds = AdminCredentials::new("admin", "password");

        assert_eq!(creds.check(None), AuthOutcome::Missing);
        assert_eq!(creds.check(Some(&basic("admin:password"))), AuthOutcome::Authorized);
        assert_eq!(creds.check(Some(&basic("admin:wrong"))), AuthOutcome::Rejected);
        assert_eq!(creds.check(Some(&basic("other:password"))), AuthOutcome::Rejected);
        assert_eq!(creds.check(Some(&basic("admin"))), AuthOutcome::Rejected);
    }

    #[test]
    fn test_malformed_headers_are_rejected_not_missing() {
        let creds = AdminCredentials::new("admin", "password");

        for raw in ["Bearer abc", "Basic", "Basic !!!notbase64", ""] {
            let value = HeaderValue::from_str(raw).unwrap();
            assert_eq!(creds.check(Some(&value)), AuthOutcome::Rejected, "{:?}", raw);
        }
    }

    #[test]
    fn test_password_with_colon() {
        let creds = AdminCredentials::new("admin", "pa:ss:word");
        assert_eq!(creds.check(Some(&basic("admin:pa:ss:word"))), AuthOutcome::Authorized);
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let creds = AdminCredentials::new("admin", "password");
        let value =
            HeaderValue::from_str(&format!("basic {}", STANDARD.encode("admin:password"))).unwrap();
        assert_eq!(creds.check(Some(&value)), AuthOutcome::Authorized);
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = AdminCredentials::new("admin", "s3cret");
        assert!(!format!("{:?}", creds).contains("s3cret"));
    }
}
