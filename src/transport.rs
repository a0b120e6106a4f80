//! HTTP transport seam.
//!
//! The engine describes each exchange as a [`RequestDescriptor`] and gets a
//! [`RawResponse`] back. Interpreting status, content type and body is left
//! to [`crate::response`]; the transport only moves bytes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::{Result, VibratoError};

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("vibrato-sync/", env!("CARGO_PKG_VERSION"));

/// HTTP verbs understood by the sync server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Parse a verb, falling back to GET for anything unrecognized.
    ///
    /// The fallback is logged at warn level rather than reported as an error.
    pub fn parse_lenient(verb: &str) -> Self {
        verb.parse().unwrap_or_else(|_| {
            tracing::warn!(verb, "Unrecognized HTTP verb, sending GET instead");
            Self::Get
        })
    }

    /// Whether a body is sent with this verb.
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl FromStr for Method {
    type Err = VibratoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(VibratoError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request, built fresh for every call.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// What came back from the transport, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// `None` when no status was obtained.
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub body: String,
    /// Description of the transport failure, if any.
    pub transport_error: Option<String>,
}

impl RawResponse {
    /// A response the server actually sent.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            content_type: content_type.map(str::to_string),
            body: body.into(),
            transport_error: None,
        }
    }

    /// Shorthand for a JSON response.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Some("application/json"), body)
    }

    /// A transport-level failure with no status.
    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self {
            transport_error: Some(detail.into()),
            ..Self::default()
        }
    }

    /// Whether the exchange failed below HTTP.
    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }
}

/// Executes request descriptors against the network.
///
/// Implementations must not fail: every problem is reported through
/// [`RawResponse::transport_failure`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange.
    async fn execute(&self, request: RequestDescriptor) -> RawResponse;
}

/// Transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> RawResponse {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return RawResponse::transport_failure(describe(&e)),
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.text().await {
            Ok(body) => RawResponse {
                status: Some(status),
                content_type,
                body,
                transport_error: None,
            },
            Err(e) => RawResponse::transport_failure(describe(&e)),
        }
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!("patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!(" DELETE ".parse::<Method>().unwrap(), Method::Delete);
        assert!(matches!(
            "BREW".parse::<Method>(),
            Err(VibratoError::UnknownMethod(verb)) if verb == "BREW"
        ));
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::with_timeout(Duration::from_millis(500)).is_ok());
    }

    #[test]
    fn test_unknown_verb_falls_back_to_get() {
        assert_eq!(Method::parse_lenient("BREW"), Method::Get);
        assert_eq!(Method::parse_lenient("put"), Method::Put);
    }

    #[test]
    fn test_only_write_verbs_carry_body() {
        assert!(Method::Post.carries_body());
        assert!(Method::Patch.carries_body());
        assert!(!Method::Get.carries_body());
        assert!(!Method::Delete.carries_body());
    }

    #[test]
    fn test_descriptor_debug_hides_header_values() {
        let request = RequestDescriptor {
            method: Method::Get,
            url: "http://localhost/notes/".to_string(),
            headers: vec![("Authorization".to_string(), "Token secret".to_string())],
            body: None,
        };
        let debug = format!("{:?}", request);
        assert!(debug.contains("Authorization"));
        assert!(!debug.contains("secret"));
        assert_eq!(request.header("authorization"), Some("Token secret"));
    }

    #[test]
    fn test_transport_failure_has_no_status() {
        let raw = RawResponse::transport_failure("dns");
        assert!(raw.is_transport_failure());
        assert_eq!(raw.transport_error.as_deref(), Some("dns"));
    }
}
