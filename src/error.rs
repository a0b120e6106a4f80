//! Error types for Vibrato sync operations.

use thiserror::Error;

/// Errors that can occur during Vibrato sync operations.
///
/// Every request either yields a usable JSON value or one of these. Use
/// [`VibratoError::kind`] to branch on the broad category.
#[derive(Debug, Error)]
pub enum VibratoError {
    /// Configuration is missing or incomplete (e.g. no credential set).
    #[error("Vibrato configuration required: {0}")]
    ConfigMissing(String),

    /// Resource type outside of notes, notebooks and tags.
    #[error("Invalid resource type '{0}': expected one of notes, notebooks, tags")]
    InvalidResourceType(String),

    /// HTTP verb outside of GET, POST, PUT, PATCH and DELETE.
    #[error("Unknown HTTP verb '{0}'")]
    UnknownMethod(String),

    /// Base endpoint is not an absolute http(s) URL.
    #[error("Invalid base endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// No HTTP status was obtained (DNS, connect, TLS, timeout).
    #[error("Transport error: {detail}")]
    Transport { detail: String },

    /// HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a failure status.
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// Server answered successfully but the body is not a usable JSON value.
    #[error("Malformed response ({status}): {detail}")]
    Malformed { status: u16, detail: String },

    /// The installed payload cipher rejected a value.
    #[error("Payload cipher failed: {0}")]
    Cipher(String),
}

/// Broad classification of a [`VibratoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal to the call; nothing was sent.
    Configuration,
    /// No status code was obtained.
    Transport,
    /// Non-success status from the server.
    Server,
    /// Success status with an unusable body.
    Malformed,
    /// Failure inside the host-supplied payload cipher.
    Cipher,
}

impl VibratoError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing(_)
            | Self::InvalidResourceType(_)
            | Self::UnknownMethod(_)
            | Self::InvalidEndpoint { .. } => ErrorKind::Configuration,
            Self::Transport { .. } | Self::HttpError(_) => ErrorKind::Transport,
            Self::Server { .. } => ErrorKind::Server,
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::Cipher(_) => ErrorKind::Cipher,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Malformed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable detail, without the category prefix used by `Display`.
    pub fn detail(&self) -> String {
        match self {
            Self::Transport { detail }
            | Self::Server { detail, .. }
            | Self::Malformed { detail, .. } => detail.clone(),
            Self::ConfigMissing(msg) | Self::Cipher(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Vibrato operations.
pub type Result<T> = core::result::Result<T, VibratoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status() {
        let err = VibratoError::Server {
            status: 401,
            detail: "bad credentials".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), "bad credentials");

        let err = VibratoError::Transport {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_configuration_errors_have_no_status() {
        let err = VibratoError::InvalidResourceType("users".to_string());
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), None);
        assert!(err.detail().contains("users"));

        let err = VibratoError::UnknownMethod("FETCH".to_string());
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Unknown HTTP verb 'FETCH'");
    }
}
