//! E2E tests using the mock sync server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use serde_json::json;
use vibrato_sync::mock_server::{
    Fixtures, MockServer, MockState, TEST_PASSWORD, TEST_TOKEN, TEST_USER,
};
use vibrato_sync::{ErrorKind, ResourceType, VibratoClient};

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_base_endpoint_check_after_shutdown() {
    let server = MockServer::start().await;
    let url = server.url().to_string();
    let client = VibratoClient::new(&url).unwrap();

    assert_eq!(client.check_endpoint().await.unwrap(), 200);

    server.shutdown().await;

    // After shutdown, the endpoint is unreachable
    let client = VibratoClient::new(&url).unwrap();
    let err = client.check_endpoint().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

// =============================================================================
// Authentication Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_login_then_list_workflow() {
    let server = MockServer::start().await;
    let client = VibratoClient::new(server.url()).unwrap();
    let mut tokens = client.subscribe_token();

    // Step 1: Resource calls fail before login
    let err = client.notes().list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // Step 2: Log in
    let status = client.login(TEST_USER, TEST_PASSWORD).await;
    assert!(status.success, "{}", status.error_message);
    assert!(tokens.has_changed().unwrap());
    let token = tokens.borrow_and_update().clone().expect("token published");

    // Step 3: The issued token works for every collection
    let notes = client.notes().list().await.expect("Failed to list notes");
    assert_eq!(notes.as_array().map(Vec::len), Some(2));

    let notebooks = client.notebooks().list().await.expect("Failed to list notebooks");
    assert_eq!(notebooks[0]["name"], "Personal");

    // Step 4: A second client restores the session from the token
    let restored = VibratoClient::with_token(server.url(), &token).unwrap();
    let me = restored.verify_token().await.expect("token accepted");
    assert_eq!(me["username"], TEST_USER);

    server.shutdown().await;
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = MockServer::start().await;
    let client = VibratoClient::new(server.url()).unwrap();

    let status = client.login(TEST_USER, "wrong").await;

    assert!(!status.success);
    assert_eq!(status.http_status, Some(401));
    assert_eq!(status.error_message, "Invalid username/password.");
    assert!(!client.has_token());

    server.shutdown().await;
}

// =============================================================================
// CRUD Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_create_then_get_returns_superset() {
    let server = MockServer::start().await;
    let client = VibratoClient::with_token(server.url(), TEST_TOKEN).unwrap();

    let body = json!({"title": "Hello Rust", "text": "first draft", "notebook": "nb-personal"});

    let created = client
        .create(ResourceType::Notes, &body)
        .await
        .expect("Failed to create note");
    let sync_hash = created["sync_hash"].as_str().expect("server assigns sync_hash");

    let fetched = client
        .get(ResourceType::Notes, sync_hash)
        .await
        .expect("Failed to get note");

    for (key, value) in body.as_object().unwrap() {
        assert_eq!(&fetched[key], value, "field {key} lost");
    }
    assert!(fetched.get("id").is_some());

    server.shutdown().await;
}

#[tokio::test]
async fn test_update_workflow() {
    let server = MockServer::start().await;
    let client = VibratoClient::with_token(server.url(), TEST_TOKEN).unwrap();

    // Step 1: Patch keeps the other fields
    let patched = client
        .notes()
        .update("note-ideas", json!({"title": "Better Ideas"}))
        .await
        .expect("Failed to patch note");
    assert_eq!(patched["title"], "Better Ideas");
    assert_eq!(patched["notebook"], "nb-personal");

    // Step 2: Put replaces the body
    let replaced = client
        .notes()
        .replace("note-ideas", json!({"title": "Only Title"}))
        .await
        .expect("Failed to replace note");
    assert_eq!(replaced["title"], "Only Title");
    assert!(replaced.get("notebook").is_none());
    assert_eq!(replaced["sync_hash"], "note-ideas");

    // Step 3: Verify update persisted
    let fetched = client.notes().get("note-ideas").await.unwrap();
    assert_eq!(fetched["title"], "Only Title");

    server.shutdown().await;
}

#[tokio::test]
async fn test_delete_workflow() {
    let server = MockServer::start().await;
    let client = VibratoClient::with_token(server.url(), TEST_TOKEN).unwrap();

    client
        .tags()
        .delete("tag-work")
        .await
        .expect("Failed to delete tag");

    let err = client.tags().get("tag-work").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.detail(), "Not found.");

    // Deleting again is a server error, not a success
    let err = client.tags().delete("tag-work").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);

    let tags = client.tags().list().await.unwrap();
    assert_eq!(tags.as_array().map(Vec::len), Some(1));

    server.shutdown().await;
}

// =============================================================================
// Custom State Tests
// =============================================================================

#[tokio::test]
async fn test_custom_state_with_notes() {
    let state = MockState::new()
        .with_token("t", "someone")
        .with_item(ResourceType::Notes, Fixtures::note("n-1", "Alpha", None))
        .with_item(ResourceType::Notes, Fixtures::note("n-2", "Beta", None));

    let server = MockServer::with_state(state).await;
    let client = VibratoClient::with_token(server.url(), "t").unwrap();

    let notes = client.notes().list().await.expect("Failed to list notes");
    assert_eq!(notes.as_array().map(Vec::len), Some(2));
    assert_eq!(notes[0]["title"], "Alpha");

    let notebooks = client.notebooks().list().await.unwrap();
    assert_eq!(notebooks, json!([]));

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start().await;
    let client = VibratoClient::with_token(server.url(), TEST_TOKEN).unwrap();

    server
        .state()
        .write()
        .await
        .tokens
        .clear();

    let err = client.notes().list().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    server.shutdown().await;
}
