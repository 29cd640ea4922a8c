// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Drishti Fetch
//!
//! HTTP transport and credential storage for the Drishti client.
//!
//! ## Host APIs
//!
//! - [`host::token`] - Bearer token persistence in the system keychain
//!
//! ## Transport
//!
//! - [`ApiClient`] - Joins paths onto the base URL, attaches the bearer
//!   token, and turns non-2xx responses into [`RequestError::Http`]
//! - [`UnauthorizedNotifier`] - Single listener slot fed on every 401
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use drishti_fetch::{ApiClient, KeychainTokenStore, Query};
//!
//! let client = ApiClient::builder("https://api.example.com")
//!     .token_store(Arc::new(KeychainTokenStore::system()))
//!     .build()?;
//!
//! let sessions: serde_json::Value = client
//!     .get("session", &Query::new().param("limit", 20))
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod host;
pub mod unauthorized;

pub use client::{ApiClient, ApiClientBuilder, Query, RequestBody, RequestOptions, path_segment};
pub use error::{KeychainError, RequestError};
pub use host::{KeychainTokenStore, MemoryTokenStore, TokenStore};
pub use unauthorized::{UnauthorizedEvent, UnauthorizedListener, UnauthorizedNotifier};

pub use reqwest::Method;
