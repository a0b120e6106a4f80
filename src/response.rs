//! Normalization of raw responses into results.
//!
//! The sync server is not consistent about what it sends back: JSON objects,
//! JSON arrays, JSON error bodies, HTML error pages, or nothing at all. These
//! functions fold every case into `Ok(value)` or a classified
//! [`VibratoError`], so callers never see an unparsed response.

use serde_json::Value;

use crate::error::{Result, VibratoError};
use crate::transport::RawResponse;

/// Detail used when the body is not JSON.
pub const INVALID_RESPONSE: &str = "Invalid response from server.";

/// Detail used when an error body is JSON without a `detail` field.
pub const UNKNOWN_ERROR: &str = "Unknown error.";

/// Detail used when a success body is JSON but neither object nor array.
pub const STRANGE_JSON: &str = "Strange JSON object returned from server.";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Whether a content type header denotes JSON.
///
/// Parameters such as `charset` are ignored.
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Normalize the response to a GET, POST, PUT or PATCH.
pub fn normalize(raw: RawResponse) -> Result<Value> {
    let status = match raw.status {
        Some(s) => s,
        None => return Err(transport_error(raw)),
    };

    if !is_success(status) {
        return Err(VibratoError::Server {
            status,
            detail: error_detail(&raw),
        });
    }

    if !is_json(raw.content_type.as_deref()) {
        return Err(VibratoError::Malformed {
            status,
            detail: INVALID_RESPONSE.to_string(),
        });
    }

    match serde_json::from_str::<Value>(&raw.body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(VibratoError::Malformed {
            status,
            detail: STRANGE_JSON.to_string(),
        }),
        Err(_) => Err(VibratoError::Malformed {
            status,
            detail: INVALID_RESPONSE.to_string(),
        }),
    }
}

/// Normalize the response to a DELETE.
///
/// Only `204 No Content` counts as success. Any other status, 2xx included,
/// is a server error whose detail is taken from the body.
pub fn normalize_delete(raw: RawResponse) -> Result<()> {
    match raw.status {
        None => Err(transport_error(raw)),
        Some(204) => Ok(()),
        Some(status) => Err(VibratoError::Server {
            status,
            detail: error_detail(&raw),
        }),
    }
}

/// Best-effort human-readable message from an error body.
pub fn error_detail(raw: &RawResponse) -> String {
    if !is_json(raw.content_type.as_deref()) {
        return INVALID_RESPONSE.to_string();
    }

    match serde_json::from_str::<Value>(&raw.body) {
        Ok(json) => json
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string(),
        Err(_) => INVALID_RESPONSE.to_string(),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn transport_error(raw: RawResponse) -> VibratoError {
    VibratoError::Transport {
        detail: raw
            .transport_error
            .unwrap_or_else(|| "no response received".to_string()),
    }
}
