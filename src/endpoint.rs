//! URL composition for the sync server.
//!
//! Base endpoints are stored without a trailing slash; every path handed to
//! [`resolve`] is made absolute against that base. Item URLs always end in a
//! slash because the server routes on it.

use url::Url;

use crate::error::{Result, VibratoError};
use crate::resource::ResourceType;

/// Default sync server.
pub const DEFAULT_BASE_ENDPOINT: &str = "https://api.vibrato.app";

/// Validate a base endpoint and strip trailing slashes.
///
/// # Errors
///
/// Returns [`VibratoError::InvalidEndpoint`] if the value is not an absolute
/// `http` or `https` URL.
pub fn normalize_base(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|e| VibratoError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(VibratoError::InvalidEndpoint {
                url: url.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(VibratoError::InvalidEndpoint {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Append `path` to an already normalized `base`.
///
/// An empty path yields `base` unchanged; a missing leading slash is added.
pub fn resolve(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Collection URL for a resource type, e.g. `{base}/notes/`.
pub fn resolve_collection(base: &str, kind: ResourceType) -> String {
    resolve(base, &format!("/{}/", kind.as_str()))
}

/// Item URL for a resource, e.g. `{base}/notes/{sync_hash}/`.
pub fn resolve_item(base: &str, kind: ResourceType, sync_hash: &str) -> String {
    let encoded = urlencoding::encode(sync_hash);
    resolve(base, &format!("/{}/{}/", kind.as_str(), encoded))
}
