//! Authentication primitives.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

/// Fixed login path; always authenticated with HTTP Basic.
pub const LOGIN_PATH: &str = "/users/login/";

/// Path used to check that a token is still accepted.
pub const WHOAMI_PATH: &str = "/users/me/";

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    pub success: bool,
    /// Empty on success.
    pub error_message: String,
    /// `None` when the server was never reached.
    pub http_status: Option<u16>,
}

impl AuthStatus {
    pub(crate) fn succeeded(status: Option<u16>) -> Self {
        Self {
            success: true,
            error_message: String::new(),
            http_status: status,
        }
    }

    pub(crate) fn failed(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            error_message: message.into(),
            http_status: status,
        }
    }
}

/// `Authorization` header value for HTTP Basic.
pub fn basic_authorization(identifier: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{identifier}:{secret}")))
}

/// `Authorization` header value for an API token.
pub fn token_authorization(token: &str) -> String {
    format!("Token {token}")
}
