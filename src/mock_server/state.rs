//! Mock server state management.
//!
//! Provides the in-memory data store for the mock sync server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::ResourceType;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Passwords indexed by account identifier.
    pub users: HashMap<String, String>,

    /// Account identifier indexed by issued token.
    pub tokens: HashMap<String, String>,

    /// Items indexed by resource type, then sync hash.
    pub items: HashMap<ResourceType, BTreeMap<String, Value>>,

    /// Last primary key handed out.
    pub last_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an account that can log in.
    pub fn with_user(mut self, identifier: &str, secret: &str) -> Self {
        self.users
            .insert(identifier.to_string(), secret.to_string());
        self
    }

    /// Accept `token` as belonging to `identifier` without a login.
    pub fn with_token(mut self, token: &str, identifier: &str) -> Self {
        self.tokens
            .insert(token.to_string(), identifier.to_string());
        self
    }

    /// Add an item. It must carry a string `sync_hash`.
    pub fn with_item(mut self, kind: ResourceType, item: Value) -> Self {
        if let Some(hash) = item.get("sync_hash").and_then(Value::as_str) {
            let hash = hash.to_string();
            self.items.entry(kind).or_default().insert(hash, item);
        }
        self
    }

    /// Check a password and issue a token for the account.
    pub fn login(&mut self, identifier: &str, secret: &str) -> Option<String> {
        match self.users.get(identifier) {
            Some(expected) if expected == secret => {
                let token = uuid::Uuid::new_v4().simple().to_string();
                self.tokens
                    .insert(token.clone(), identifier.to_string());
                Some(token)
            }
            _ => None,
        }
    }

    /// Identifier the token belongs to, if it is known.
    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }

    /// All items of a type, ordered by sync hash.
    pub fn list(&self, kind: ResourceType) -> Vec<Value> {
        self.items
            .get(&kind)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Get an item by sync hash.
    pub fn get(&self, kind: ResourceType, sync_hash: &str) -> Option<&Value> {
        self.items.get(&kind).and_then(|items| items.get(sync_hash))
    }

    /// Store a new item, assigning `id` and `sync_hash`.
    pub fn create(&mut self, kind: ResourceType, fields: Map<String, Value>) -> Value {
        self.last_id += 1;
        let sync_hash = uuid::Uuid::new_v4().to_string();

        let mut item = fields;
        item.insert("id".to_string(), Value::from(self.last_id));
        item.insert("sync_hash".to_string(), Value::String(sync_hash.clone()));

        let item = Value::Object(item);
        self.items
            .entry(kind)
            .or_default()
            .insert(sync_hash, item.clone());
        item
    }

    /// Update an item and return the updated version.
    ///
    /// A partial update merges `fields` into the item; a full update replaces
    /// everything except `id` and `sync_hash`.
    pub fn update(
        &mut self,
        kind: ResourceType,
        sync_hash: &str,
        fields: Map<String, Value>,
        partial: bool,
    ) -> Option<&Value> {
        let item = self.items.get_mut(&kind)?.get_mut(sync_hash)?;
        let Value::Object(current) = item else {
            return None;
        };

        if partial {
            current.extend(fields);
        } else {
            let id = current.get("id").cloned();
            let hash = current.get("sync_hash").cloned();
            *current = fields;
            if let Some(id) = id {
                current.insert("id".to_string(), id);
            }
            if let Some(hash) = hash {
                current.insert("sync_hash".to_string(), hash);
            }
        }

        self.get(kind, sync_hash)
    }

    /// Remove an item. Returns whether it existed.
    pub fn delete(&mut self, kind: ResourceType, sync_hash: &str) -> bool {
        self.items
            .get_mut(&kind)
            .map(|items| items.remove(sync_hash).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_state_login() {
        let mut state = MockState::new().with_user("test-user", "vibratonotes");

        assert!(state.login("test-user", "wrong").is_none());
        let token = state.login("test-user", "vibratonotes").unwrap();
        assert_eq!(state.user_for_token(&token), Some("test-user"));
    }

    #[test]
    fn test_state_create_assigns_identity() {
        let mut state = MockState::new();
        let note = state.create(ResourceType::Notes, fields(json!({"title": "Hello"})));

        let hash = note["sync_hash"].as_str().unwrap();
        assert_eq!(note["title"], "Hello");
        assert_eq!(note["id"], 1);
        assert_eq!(state.get(ResourceType::Notes, hash), Some(&note));
        assert!(state.list(ResourceType::Tags).is_empty());
    }

    #[test]
    fn test_state_partial_and_full_update() {
        let mut state = MockState::new().with_item(
            ResourceType::Notes,
            json!({"id": 7, "sync_hash": "n1", "title": "Old", "text": "body"}),
        );

        let patched = state
            .update(ResourceType::Notes, "n1", fields(json!({"title": "New"})), true)
            .unwrap();
        assert_eq!(patched["title"], "New");
        assert_eq!(patched["text"], "body");

        let replaced = state
            .update(ResourceType::Notes, "n1", fields(json!({"title": "Only"})), false)
            .unwrap();
        assert_eq!(replaced["title"], "Only");
        assert!(replaced.get("text").is_none());
        assert_eq!(replaced["id"], 7);
        assert_eq!(replaced["sync_hash"], "n1");
    }

    #[test]
    fn test_state_delete() {
        let mut state = MockState::new()
            .with_item(ResourceType::Tags, json!({"sync_hash": "t1", "name": "work"}));

        assert!(state.delete(ResourceType::Tags, "t1"));
        assert!(!state.delete(ResourceType::Tags, "t1"));
        assert!(!state.delete(ResourceType::Notes, "t1"));
    }
}
