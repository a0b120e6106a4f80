//! Note, notebook and tag endpoint handlers.
//!
//! The same handlers serve all three collections; the router attaches the
//! collection's [`ResourceType`] as an extension.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::auth::{authenticate, detail};
use crate::mock_server::state::MockState;
use crate::ResourceType;

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Not found.")
}

fn object_body(body: Value) -> Result<Map<String, Value>, Response> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(detail(
            StatusCode::BAD_REQUEST,
            "Invalid data. Expected a dictionary.",
        )),
    }
}

/// GET /{kind}/
pub async fn list_items(
    State(state): State<Arc<RwLock<MockState>>>,
    Extension(kind): Extension<ResourceType>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let state = state.read().await;

    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    (StatusCode::OK, Json(Value::Array(state.list(kind)))).into_response()
}

/// GET /{kind}/{sync_hash}/
pub async fn get_item(
    State(state): State<Arc<RwLock<MockState>>>,
    Extension(kind): Extension<ResourceType>,
    Path(sync_hash): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let state = state.read().await;

    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    match state.get(kind, &sync_hash) {
        Some(item) => (StatusCode::OK, Json(item.clone())).into_response(),
        None => not_found(),
    }
}

/// POST /{kind}/
pub async fn create_item(
    State(state): State<Arc<RwLock<MockState>>>,
    Extension(kind): Extension<ResourceType>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    match object_body(body) {
        Ok(fields) => (StatusCode::CREATED, Json(state.create(kind, fields))).into_response(),
        Err(response) => response,
    }
}

/// PATCH /{kind}/{sync_hash}/
pub async fn patch_item(
    state: State<Arc<RwLock<MockState>>>,
    kind: Extension<ResourceType>,
    sync_hash: Path<String>,
    headers: HeaderMap,
    body: Json<Value>,
) -> impl IntoResponse {
    write_item(state, kind, sync_hash, headers, body, true).await
}

/// PUT /{kind}/{sync_hash}/
pub async fn put_item(
    state: State<Arc<RwLock<MockState>>>,
    kind: Extension<ResourceType>,
    sync_hash: Path<String>,
    headers: HeaderMap,
    body: Json<Value>,
) -> impl IntoResponse {
    write_item(state, kind, sync_hash, headers, body, false).await
}

async fn write_item(
    State(state): State<Arc<RwLock<MockState>>>,
    Extension(kind): Extension<ResourceType>,
    Path(sync_hash): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
    partial: bool,
) -> Response {
    let mut state = state.write().await;

    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    let fields = match object_body(body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    match state.update(kind, &sync_hash, fields, partial) {
        Some(item) => (StatusCode::OK, Json(item.clone())).into_response(),
        None => not_found(),
    }
}

/// DELETE /{kind}/{sync_hash}/
pub async fn delete_item(
    State(state): State<Arc<RwLock<MockState>>>,
    Extension(kind): Extension<ResourceType>,
    Path(sync_hash): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if let Err(response) = authenticate(&state, &headers) {
        return response;
    }

    if state.delete(kind, &sync_hash) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
