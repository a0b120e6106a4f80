//! Vibrato sync client library.
//!
//! A Rust library for talking to a Vibrato notes sync server: log in,
//! keep a token, and create, read, update and delete notes, notebooks and
//! tags. Every operation resolves to a [`Result`] holding either the JSON the
//! server returned or a classified [`VibratoError`].
//!
//! # Quick Start
//!
//! ```no_run
//! use serde_json::json;
//! use vibrato_sync::VibratoClient;
//!
//! #[tokio::main]
//! async fn main() -> vibrato_sync::Result<()> {
//!     let client = VibratoClient::new("http://localhost:8000")?;
//!
//!     // Persist the token whenever it changes
//!     let mut tokens = client.subscribe_token();
//!     tokio::spawn(async move {
//!         while tokens.changed().await.is_ok() {
//!             let token = tokens.borrow_and_update().clone();
//!             println!("token is now {:?}", token);
//!         }
//!     });
//!
//!     let status = client.login("test-user", "vibratonotes").await;
//!     if !status.success {
//!         eprintln!("login failed: {}", status.error_message);
//!         return Ok(());
//!     }
//!
//!     let note = client.notes().create(json!({"title": "Hello"})).await?;
//!     println!("Created: {note}");
//!
//!     let notes = client.notes().list().await?;
//!     println!("Found {} notes", notes.as_array().map_or(0, Vec::len));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`endpoint`] turns a base endpoint and a path or resource key into a URL.
//! - [`VibratoClient`] owns the base endpoint and token, builds one
//!   [`RequestDescriptor`] per call and hands it to a [`Transport`].
//! - [`response`] folds whatever came back into `Ok(value)` or an error.
//! - [`Resources`] binds the generic operations to one [`ResourceType`] and
//!   applies the installed [`PayloadCipher`].
//!
//! # Configuration
//!
//! [`VibratoClient::from_env`] reads:
//!
//! - `VIBRATO_API_URL` (optional) - Base endpoint (defaults to `https://api.vibrato.app`)
//! - `VIBRATO_TOKEN` (optional) - Token from an earlier login
//! - `VIBRATO_TIMEOUT_SECS` (optional) - Per-request timeout (defaults to 30)

mod auth;
mod cipher;
mod client;
mod error;
mod resource;

pub mod cli;
pub mod endpoint;
pub mod output;
pub mod response;
pub mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{basic_authorization, token_authorization, AuthStatus, LOGIN_PATH, WHOAMI_PATH};
pub use cipher::{PayloadCipher, Plaintext};
pub use client::VibratoClient;
pub use error::{ErrorKind, Result, VibratoError};
pub use resource::{ResourceType, Resources};
pub use transport::{Method, RawResponse, RequestDescriptor, ReqwestTransport, Transport};
