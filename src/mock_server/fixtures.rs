//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

use crate::ResourceType;

/// Account present in the default scenario.
pub const TEST_USER: &str = "test-user";

/// Password of [`TEST_USER`].
pub const TEST_PASSWORD: &str = "vibratonotes";

/// Token accepted by the default scenario without logging in.
pub const TEST_TOKEN: &str = "test-token";

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default test scenario with linked notebooks, notes and tags.
pub struct DefaultScenario {
    pub users: Vec<(String, String)>,
    pub tokens: Vec<(String, String)>,
    pub items: Vec<(ResourceType, Value)>,
}

impl Fixtures {
    /// Create a notebook.
    pub fn notebook(sync_hash: &str, name: &str) -> Value {
        json!({
            "sync_hash": sync_hash,
            "name": name,
        })
    }

    /// Create a tag.
    pub fn tag(sync_hash: &str, name: &str) -> Value {
        json!({
            "sync_hash": sync_hash,
            "name": name,
        })
    }

    /// Create a note, optionally filed in a notebook.
    pub fn note(sync_hash: &str, title: &str, notebook: Option<&str>) -> Value {
        json!({
            "sync_hash": sync_hash,
            "title": title,
            "text": format!("# {title}"),
            "notebook": notebook,
            "tags": [],
        })
    }

    /// Create the default test scenario.
    ///
    /// Contains:
    /// - The account `test-user` / `vibratonotes` and the token `test-token`
    /// - Notebook `nb-personal` with notes `note-groceries` and `note-ideas`
    /// - Tags `tag-home` and `tag-work`
    pub fn default_scenario() -> DefaultScenario {
        let mut groceries = Self::note("note-groceries", "Groceries", Some("nb-personal"));
        groceries["tags"] = json!(["tag-home"]);

        DefaultScenario {
            users: vec![(TEST_USER.to_string(), TEST_PASSWORD.to_string())],
            tokens: vec![(TEST_TOKEN.to_string(), TEST_USER.to_string())],
            items: vec![
                (ResourceType::Notebooks, Self::notebook("nb-personal", "Personal")),
                (ResourceType::Notes, groceries),
                (
                    ResourceType::Notes,
                    Self::note("note-ideas", "Ideas", Some("nb-personal")),
                ),
                (ResourceType::Tags, Self::tag("tag-home", "home")),
                (ResourceType::Tags, Self::tag("tag-work", "work")),
            ],
        }
    }
}
