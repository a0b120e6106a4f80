//! Mock sync server.
//!
//! Provides an axum-based HTTP server that simulates the Vibrato sync API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;
use crate::ResourceType;

/// A mock sync server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `VibratoClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for (identifier, secret) in scenario.users {
            state = state.with_user(&identifier, &secret);
        }

        for (token, identifier) in scenario.tokens {
            state = state.with_token(&token, &identifier);
        }

        for (kind, item) in scenario.items {
            state = state.with_item(kind, item);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let mut router = Router::new()
            // API root, used for reachability checks
            .route("/", get(api_root))
            // Account routes
            .route("/users/login/", post(handlers::login))
            .route("/users/me/", get(handlers::whoami));

        // One collection and one item route per resource type
        for kind in ResourceType::ALL {
            router = router
                .route(
                    &format!("/{}/", kind.as_str()),
                    get(handlers::list_items)
                        .post(handlers::create_item)
                        .layer(Extension(kind)),
                )
                .route(
                    &format!("/{}/:sync_hash/", kind.as_str()),
                    get(handlers::get_item)
                        .patch(handlers::patch_item)
                        .put(handlers::put_item)
                        .delete(handlers::delete_item)
                        .layer(Extension(kind)),
                );
        }

        router.with_state(state)
    }
}

/// API root listing the collections.
async fn api_root() -> Json<Value> {
    let mut root = serde_json::Map::new();
    for kind in ResourceType::ALL {
        root.insert(kind.as_str().to_string(), json!(format!("/{}/", kind.as_str())));
    }
    Json(Value::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::{TEST_PASSWORD, TEST_TOKEN, TEST_USER};
    use crate::VibratoClient;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["notes"], "/notes/");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_login_with_vibrato_client() {
        let server = MockServer::start().await;
        let client = VibratoClient::new(server.url()).unwrap();

        let status = client.login(TEST_USER, TEST_PASSWORD).await;

        assert!(status.success, "{}", status.error_message);
        assert_eq!(status.http_status, Some(200));
        assert!(client.has_token());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_note_with_vibrato_client() {
        let server = MockServer::start().await;
        let client = VibratoClient::with_token(server.url(), TEST_TOKEN).unwrap();

        let note = client
            .notes()
            .get("note-groceries")
            .await
            .expect("Failed to get note");

        assert_eq!(note["title"], "Groceries");
        assert_eq!(note["notebook"], "nb-personal");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = VibratoClient::with_token(server.url(), "unknown").unwrap();

        let result = client.notes().get("nonexistent").await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), "Invalid token.");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = MockState::new()
            .with_token("custom", "someone")
            .with_item(ResourceType::Tags, Fixtures::tag("tag-x", "custom tag"));

        let server = MockServer::with_state(state).await;
        let client = VibratoClient::with_token(server.url(), "custom").unwrap();

        let tags = client.tags().list().await.expect("Failed to list tags");

        assert_eq!(tags.as_array().map(Vec::len), Some(1));
        assert_eq!(tags[0]["name"], "custom tag");

        server.shutdown().await;
    }
}
