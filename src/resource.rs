//! Resource types and the typed per-resource handle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::VibratoClient;
use crate::error::{Result, VibratoError};

/// The collections exposed by the sync server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Notes,
    Notebooks,
    Tags,
}

impl ResourceType {
    /// All resource types, in URL order.
    pub const ALL: [ResourceType; 3] = [Self::Notes, Self::Notebooks, Self::Tags];

    /// Collection name as it appears in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Notebooks => "notebooks",
            Self::Tags => "tags",
        }
    }
}

impl FromStr for ResourceType {
    type Err = VibratoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notes" | "note" => Ok(Self::Notes),
            "notebooks" | "notebook" => Ok(Self::Notebooks),
            "tags" | "tag" => Ok(Self::Tags),
            _ => Err(VibratoError::InvalidResourceType(s.to_string())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations on one resource type.
///
/// Obtained from [`VibratoClient::notes`], [`VibratoClient::notebooks`],
/// [`VibratoClient::tags`] or [`VibratoClient::resources`]. Bodies pass
/// through the client's [`PayloadCipher`](crate::PayloadCipher) on the way
/// out and every returned object on the way in.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use vibrato_sync::VibratoClient;
///
/// # async fn example() -> vibrato_sync::Result<()> {
/// let client = VibratoClient::with_token("http://localhost:8000", "token")?;
/// let tag = client.tags().create(json!({"name": "work"})).await?;
/// let hash = tag["sync_hash"].as_str().unwrap_or_default();
/// client.tags().update(hash, json!({"name": "office"})).await?;
/// client.tags().delete(hash).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resources<'a> {
    client: &'a VibratoClient,
    kind: ResourceType,
}

impl<'a> Resources<'a> {
    pub(crate) fn new(client: &'a VibratoClient, kind: ResourceType) -> Self {
        Self { client, kind }
    }

    /// The resource type this handle is bound to.
    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Fetch the whole collection.
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::list`].
    pub async fn list(&self) -> Result<Value> {
        let value = self.client.list(self.kind).await?;
        self.decrypt(value)
    }

    /// Fetch one item by sync hash.
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::get`].
    pub async fn get(&self, sync_hash: &str) -> Result<Value> {
        let value = self.client.get(self.kind, sync_hash).await?;
        self.decrypt(value)
    }

    /// Create an item; the server assigns its sync hash.
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::create`].
    pub async fn create(&self, body: Value) -> Result<Value> {
        let body = self.client.cipher().encrypt(self.kind, body)?;
        let value = self.client.create(self.kind, &body).await?;
        self.decrypt(value)
    }

    /// Partially update an item (PATCH).
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::update`].
    pub async fn update(&self, sync_hash: &str, body: Value) -> Result<Value> {
        self.write(sync_hash, body, true).await
    }

    /// Replace an item (PUT).
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::update`].
    pub async fn replace(&self, sync_hash: &str, body: Value) -> Result<Value> {
        self.write(sync_hash, body, false).await
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// See [`VibratoClient::delete`].
    pub async fn delete(&self, sync_hash: &str) -> Result<()> {
        self.client.delete(self.kind, sync_hash).await
    }

    async fn write(&self, sync_hash: &str, body: Value, partial: bool) -> Result<Value> {
        let body = self.client.cipher().encrypt(self.kind, body)?;
        let value = self
            .client
            .update(self.kind, sync_hash, &body, partial)
            .await?;
        self.decrypt(value)
    }

    fn decrypt(&self, value: Value) -> Result<Value> {
        let cipher = self.client.cipher();
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| cipher.decrypt(self.kind, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => cipher.decrypt(self.kind, other),
        }
    }
}
