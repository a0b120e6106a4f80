//! Mock Vibrato sync server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the sync
//! server for integration and end-to-end testing. Unlike wiremock which mocks
//! at the HTTP level per-test, this server maintains state across requests,
//! enabling realistic workflow testing (log in, create, fetch, update, delete).
//!
//! # Example
//!
//! ```ignore
//! use vibrato_sync::mock_server::MockServer;
//! use vibrato_sync::VibratoClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = VibratoClient::new(server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     assert!(client.login("test-user", "vibratonotes").await.success);
//!     let note = client.notes().get("note-groceries").await.unwrap();
//!     assert_eq!(note["title"], "Groceries");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, TEST_PASSWORD, TEST_TOKEN, TEST_USER};
pub use server::MockServer;
pub use state::MockState;
