//! Payload encryption hook.
//!
//! The library ships no cipher of its own. Hosts that store encrypted
//! payloads install a [`PayloadCipher`]; the typed resource handles call it
//! on every body they send and every object they receive.

use serde_json::Value;

use crate::error::Result;
use crate::resource::ResourceType;

/// Transforms resource payloads at the client boundary.
pub trait PayloadCipher: Send + Sync {
    /// Called on create/update bodies before they are sent.
    fn encrypt(&self, kind: ResourceType, payload: Value) -> Result<Value>;

    /// Called on each object returned by the server.
    fn decrypt(&self, kind: ResourceType, payload: Value) -> Result<Value>;
}

/// Identity cipher, installed by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PayloadCipher for Plaintext {
    fn encrypt(&self, _kind: ResourceType, payload: Value) -> Result<Value> {
        Ok(payload)
    }

    fn decrypt(&self, _kind: ResourceType, payload: Value) -> Result<Value> {
        Ok(payload)
    }
}
