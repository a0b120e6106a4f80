//! Account endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// JSON error body in the sync server's `{"detail": ...}` shape.
pub fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Resolve the `Authorization: Token ...` header to an account.
pub fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            detail(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
            )
        })?;

    let token = header
        .strip_prefix("Token ")
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid token header."))?;

    state
        .user_for_token(token.trim())
        .map(str::to_string)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid token."))
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (identifier, secret) = decoded.split_once(':')?;
    Some((identifier.to_string(), secret.to_string()))
}

/// POST /users/login/
pub async fn login(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some((identifier, secret)) = basic_credentials(&headers) else {
        return detail(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        );
    };

    let mut state = state.write().await;

    match state.login(&identifier, &secret) {
        Some(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Invalid username/password."),
    }
}

/// GET /users/me/
pub async fn whoami(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let state = state.read().await;

    match authenticate(&state, &headers) {
        Ok(identifier) => (StatusCode::OK, Json(json!({ "username": identifier }))).into_response(),
        Err(response) => response,
    }
}
