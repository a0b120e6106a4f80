//! Vibrato sync client.
//!
//! Owns the base endpoint and the credential, dispatches requests through a
//! [`Transport`] and normalizes every response. Per-resource convenience
//! calls live on [`Resources`](crate::Resources).

use std::env;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use crate::auth::{self, AuthStatus, LOGIN_PATH, WHOAMI_PATH};
use crate::cipher::{PayloadCipher, Plaintext};
use crate::endpoint::{self, DEFAULT_BASE_ENDPOINT};
use crate::error::{Result, VibratoError};
use crate::resource::{ResourceType, Resources};
use crate::response::{self, INVALID_RESPONSE};
use crate::transport::{
    Method, RawResponse, RequestDescriptor, ReqwestTransport, Transport, DEFAULT_TIMEOUT,
};

/// Credential and endpoint shared by all clones of a client.
struct Session {
    base: RwLock<Arc<str>>,
    token: watch::Sender<Option<String>>,
}

/// Client for the Vibrato sync server.
///
/// Every network operation is a single awaited exchange that resolves to a
/// terminal result. Resource operations require a token; calling one without
/// a token fails with [`VibratoError::ConfigMissing`] before anything is sent.
///
/// Clones share the credential and base endpoint, so a login on one clone is
/// visible to all of them.
///
/// # Example
///
/// ```no_run
/// use vibrato_sync::VibratoClient;
///
/// # async fn example() -> vibrato_sync::Result<()> {
/// let client = VibratoClient::new("http://localhost:8000")?;
/// let status = client.login("test-user", "vibratonotes").await;
/// assert!(status.success, "{}", status.error_message);
///
/// let notes = client.notes().list().await?;
/// println!("{notes}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VibratoClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    cipher: Arc<dyn PayloadCipher>,
}

impl std::fmt::Debug for VibratoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VibratoClient")
            .field("base_endpoint", &self.base_endpoint())
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

impl VibratoClient {
    /// Create an unauthenticated client for `base_endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    pub fn new(base_endpoint: &str) -> Result<Self> {
        Self::with_transport(base_endpoint, Arc::new(ReqwestTransport::new()?))
    }

    /// Create a client that restores a previously obtained token.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    pub fn with_token(base_endpoint: &str, token: &str) -> Result<Self> {
        let client = Self::new(base_endpoint)?;
        client.set_token(token);
        Ok(client)
    }

    /// Create a client from a stored token and check it against the server.
    ///
    /// The token is kept whatever the check reports; the returned result is
    /// the `/users/me/` answer, so a stale token shows up before real calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    pub async fn with_verified_token(
        base_endpoint: &str,
        token: &str,
    ) -> Result<(Self, Result<Value>)> {
        let client = Self::with_token(base_endpoint, token)?;
        let verified = client.verify_token().await;
        Ok((client, verified))
    }

    /// Create a client and log in immediately.
    ///
    /// The client is returned even when the login fails, so the caller can
    /// inspect the status and retry with other credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    pub async fn with_credentials(
        base_endpoint: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<(Self, AuthStatus)> {
        let client = Self::new(base_endpoint)?;
        let status = client.login(identifier, secret).await;
        Ok((client, status))
    }

    /// Create a client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    pub fn with_transport(base_endpoint: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let base = endpoint::normalize_base(base_endpoint)?;
        let (token, _) = watch::channel(None);

        Ok(Self {
            transport,
            session: Arc::new(Session {
                base: RwLock::new(Arc::from(base)),
                token,
            }),
            cipher: Arc::new(Plaintext),
        })
    }

    /// Create a client from environment variables.
    ///
    /// Reads `VIBRATO_API_URL` (defaults to `https://api.vibrato.app`),
    /// `VIBRATO_TOKEN` and `VIBRATO_TIMEOUT_SECS`, all optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the timeout is not a
    /// positive integer.
    pub fn from_env() -> Result<Self> {
        let base = env::var("VIBRATO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_ENDPOINT.to_string());

        let timeout = match env::var("VIBRATO_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    VibratoError::ConfigMissing(format!(
                        "VIBRATO_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    ))
                })?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let client =
            Self::with_transport(&base, Arc::new(ReqwestTransport::with_timeout(timeout)?))?;

        if let Ok(token) = env::var("VIBRATO_TOKEN") {
            if !token.is_empty() {
                client.set_token(token);
            }
        }

        Ok(client)
    }

    /// Install a payload cipher used by the typed resource handles.
    #[must_use]
    pub fn with_cipher(mut self, cipher: Arc<dyn PayloadCipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub(crate) fn cipher(&self) -> &dyn PayloadCipher {
        self.cipher.as_ref()
    }

    // =========================================================================
    // Base endpoint
    // =========================================================================

    /// Current base endpoint, without trailing slash.
    pub fn base_endpoint(&self) -> String {
        let base = self
            .session
            .base
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        base.to_string()
    }

    /// Replace the base endpoint and, unless skipped, check that it answers.
    ///
    /// The new endpoint is stored before the check runs; a failed check is
    /// reported but does not roll it back.
    ///
    /// # Errors
    ///
    /// Returns [`VibratoError::InvalidEndpoint`] (nothing stored) for a bad
    /// URL, otherwise the transport or server error from the check. On
    /// success the check's status is returned, or `None` when skipped.
    #[tracing::instrument(skip(self))]
    pub async fn set_base_endpoint(&self, url: &str, skip_validation: bool) -> Result<Option<u16>> {
        let normalized = endpoint::normalize_base(url)?;
        {
            let mut base = self
                .session
                .base
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *base = Arc::from(normalized);
        }

        if skip_validation {
            return Ok(None);
        }
        self.check_endpoint().await.map(Some)
    }

    /// Unauthenticated GET against the bare base endpoint.
    ///
    /// Any 2xx status counts as reachable, whatever the body.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the server cannot be reached, or a server
    /// error for a non-2xx status.
    #[tracing::instrument(skip(self))]
    pub async fn check_endpoint(&self) -> Result<u16> {
        let raw = self
            .dispatch(Method::Get, self.base_endpoint(), None, None)
            .await;

        match raw.status {
            Some(status) if (200..300).contains(&status) => Ok(status),
            Some(status) => Err(VibratoError::Server {
                status,
                detail: response::error_detail(&raw),
            }),
            None => Err(VibratoError::Transport {
                detail: raw
                    .transport_error
                    .unwrap_or_else(|| "no response received".to_string()),
            }),
        }
    }

    /// Absolute URL for a path relative to the base endpoint.
    pub fn url(&self, path: &str) -> String {
        endpoint::resolve(&self.base_endpoint(), path)
    }

    // =========================================================================
    // Credential
    // =========================================================================

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        self.session.token.borrow().clone()
    }

    /// Whether a token is set.
    pub fn has_token(&self) -> bool {
        self.session.token.borrow().is_some()
    }

    /// Store a token directly, bypassing login.
    ///
    /// No request is made; use [`verify_token`](Self::verify_token) to check
    /// it against the server. A blank token clears the credential.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            self.clear_token();
        } else {
            self.replace_token(Some(token));
        }
    }

    /// Forget the current token.
    pub fn clear_token(&self) {
        self.replace_token(None);
    }

    /// Subscribe to token changes.
    ///
    /// The receiver observes every later change made through login,
    /// [`set_token`](Self::set_token) or [`clear_token`](Self::clear_token).
    pub fn subscribe_token(&self) -> watch::Receiver<Option<String>> {
        self.session.token.subscribe()
    }

    fn replace_token(&self, token: Option<String>) {
        let changed = self.session.token.send_if_modified(|current| {
            if *current == token {
                false
            } else {
                *current = token;
                true
            }
        });
        if changed {
            tracing::debug!(has_token = self.has_token(), "Credential changed");
        }
    }

    fn require_token(&self) -> Result<String> {
        self.token().ok_or_else(|| {
            VibratoError::ConfigMissing("no token set; log in or call set_token first".to_string())
        })
    }

    /// Ask the server who the current token belongs to.
    ///
    /// Advisory only: the token stays set whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set, otherwise the
    /// normalized error from the server.
    #[tracing::instrument(skip(self))]
    pub async fn verify_token(&self) -> Result<Value> {
        self.request("GET", WHOAMI_PATH, None).await
    }

    /// Exchange an identifier and secret for a token over HTTP Basic.
    ///
    /// On success the token is stored and subscribers are notified. A 2xx
    /// response without a non-empty `token` field is reported as a failure. Any
    /// previously stored token is neither sent nor cleared.
    #[tracing::instrument(skip(self, secret))]
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthStatus {
        let raw = self
            .dispatch(
                Method::Post,
                self.url(LOGIN_PATH),
                None,
                Some(auth::basic_authorization(identifier, secret)),
            )
            .await;
        let status = raw.status;

        let value = match response::normalize(raw) {
            Ok(value) => value,
            Err(VibratoError::Malformed { status, .. }) => {
                tracing::debug!(status, "Login answered without a JSON object");
                return AuthStatus::failed(INVALID_RESPONSE, Some(status));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Login failed");
                return AuthStatus::failed(e.detail(), e.status());
            }
        };

        match value
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.trim().is_empty())
        {
            Some(token) => {
                self.set_token(token);
                AuthStatus::succeeded(status)
            }
            None => AuthStatus::failed(INVALID_RESPONSE, status),
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Send one request and return the raw response.
    ///
    /// `verb` is matched case-insensitively; anything unrecognized is sent as
    /// GET with a warning. Bodies are only sent with POST, PUT and PATCH.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, without touching the network, if
    /// `authenticated` is set and no token is available. Network problems are
    /// reported inside the [`RawResponse`].
    pub async fn send(
        &self,
        url: &str,
        verb: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<RawResponse> {
        let method = Method::parse_lenient(verb);
        let authorization = if authenticated {
            Some(auth::token_authorization(&self.require_token()?))
        } else {
            None
        };

        Ok(self
            .dispatch(method, url.to_string(), body, authorization)
            .await)
    }

    /// Authenticated request to a path under the base endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set, otherwise the
    /// normalized error for the response.
    pub async fn request(&self, verb: &str, path: &str, body: Option<&Value>) -> Result<Value> {
        let raw = self.send(&self.url(path), verb, body, true).await?;
        response::normalize(raw)
    }

    async fn dispatch(
        &self,
        method: Method,
        url: String,
        body: Option<&Value>,
        authorization: Option<String>,
    ) -> RawResponse {
        let body = match body {
            Some(b) if method.carries_body() => Some(b.to_string()),
            Some(_) => {
                tracing::debug!(%method, "Ignoring request body");
                None
            }
            None => None,
        };

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(value) = authorization {
            headers.push(("Authorization".to_string(), value));
        }

        tracing::debug!(%method, %url, "Sending request");
        let raw = self
            .transport
            .execute(RequestDescriptor {
                method,
                url,
                headers,
                body,
            })
            .await;
        tracing::debug!(status = ?raw.status, "Received response");
        raw
    }

    // =========================================================================
    // Generic resource operations
    // =========================================================================

    /// GET the collection of a resource type.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set, otherwise the
    /// normalized error for the response.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, kind: ResourceType) -> Result<Value> {
        let token = self.require_token()?;
        let url = endpoint::resolve_collection(&self.base_endpoint(), kind);
        self.exchange(Method::Get, url, None, token).await
    }

    /// GET one resource by sync hash.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set or the hash is empty,
    /// otherwise the normalized error for the response.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, kind: ResourceType, sync_hash: &str) -> Result<Value> {
        let token = self.require_token()?;
        let url = self.item_url(kind, sync_hash)?;
        self.exchange(Method::Get, url, None, token).await
    }

    /// POST a new resource to its collection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set, otherwise the
    /// normalized error for the response.
    #[tracing::instrument(skip(self, body))]
    pub async fn create(&self, kind: ResourceType, body: &Value) -> Result<Value> {
        let token = self.require_token()?;
        let url = endpoint::resolve_collection(&self.base_endpoint(), kind);
        self.exchange(Method::Post, url, Some(body), token).await
    }

    /// PATCH (`partial`) or PUT a resource.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set or the hash is empty,
    /// otherwise the normalized error for the response.
    #[tracing::instrument(skip(self, body))]
    pub async fn update(
        &self,
        kind: ResourceType,
        sync_hash: &str,
        body: &Value,
        partial: bool,
    ) -> Result<Value> {
        let token = self.require_token()?;
        let url = self.item_url(kind, sync_hash)?;
        let method = if partial { Method::Patch } else { Method::Put };
        self.exchange(method, url, Some(body), token).await
    }

    /// DELETE a resource. Only `204 No Content` counts as success.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no token is set or the hash is empty,
    /// otherwise a transport or server error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, kind: ResourceType, sync_hash: &str) -> Result<()> {
        let token = self.require_token()?;
        let url = self.item_url(kind, sync_hash)?;
        let raw = self
            .dispatch(
                Method::Delete,
                url,
                None,
                Some(auth::token_authorization(&token)),
            )
            .await;
        response::normalize_delete(raw)
    }

    async fn exchange(
        &self,
        method: Method,
        url: String,
        body: Option<&Value>,
        token: String,
    ) -> Result<Value> {
        let raw = self
            .dispatch(method, url, body, Some(auth::token_authorization(&token)))
            .await;
        response::normalize(raw)
    }

    fn item_url(&self, kind: ResourceType, sync_hash: &str) -> Result<String> {
        if sync_hash.trim().is_empty() {
            return Err(VibratoError::ConfigMissing(format!(
                "sync hash required to address a single item in {kind}"
            )));
        }
        Ok(endpoint::resolve_item(&self.base_endpoint(), kind, sync_hash))
    }

    // =========================================================================
    // Typed handles
    // =========================================================================

    /// Operations bound to one resource type.
    pub fn resources(&self, kind: ResourceType) -> Resources<'_> {
        Resources::new(self, kind)
    }

    /// Notes.
    pub fn notes(&self) -> Resources<'_> {
        self.resources(ResourceType::Notes)
    }

    /// Notebooks.
    pub fn notebooks(&self) -> Resources<'_> {
        self.resources(ResourceType::Notebooks)
    }

    /// Tags.
    pub fn tags(&self) -> Resources<'_> {
        self.resources(ResourceType::Tags)
    }
}
