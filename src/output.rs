//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization, and [`ResourceRow`] for tables.

use serde_json::Value;
use tabled::Tabled;

/// Trait for human-readable key-value output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Value {
    fn pretty_print(&self) -> String {
        let Some(fields) = self.as_object() else {
            return scalar(self);
        };

        let header = format!("Item: {}", sync_hash(self));
        let divider = "─".repeat(header.chars().count().max(30));
        let width = fields.keys().map(|k| k.len()).max().unwrap_or(0) + 1;

        let mut lines = vec![header, divider];
        for (key, value) in fields {
            lines.push(format!("{:<width$} {}", format!("{key}:"), scalar(value)));
        }
        lines.join("\n")
    }
}

/// One table row per resource.
#[derive(Debug, Tabled)]
pub struct ResourceRow {
    pub sync_hash: String,
    pub title: String,
    pub modified: String,
}

impl From<&Value> for ResourceRow {
    fn from(v: &Value) -> Self {
        Self {
            sync_hash: sync_hash(v),
            title: field(v, &["title", "name"]),
            modified: field(v, &["date_modified", "modified", "updated_at"]),
        }
    }
}

fn sync_hash(v: &Value) -> String {
    field(v, &["sync_hash", "id"])
}

fn field(v: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| v.get(*k).filter(|f| !f.is_null()))
        .map(scalar)
        .unwrap_or_default()
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
