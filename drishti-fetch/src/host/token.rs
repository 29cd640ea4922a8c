//! Session token persistence.
//!
//! The token is the only credential the client keeps. Reads never fail:
//! an unavailable keychain is logged and treated as "no token".

use async_trait::async_trait;
use keyring::Entry;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::KeychainError;

/// Keychain service holding the session token.
pub const TOKEN_SERVICE: &str = "drishti:session";

/// Keychain account holding the session token.
pub const TOKEN_ACCOUNT: &str = "token";

// ============================================================================
// Token Store Trait
// ============================================================================

/// Durable storage for the bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` if absent, empty, or unreadable.
    async fn get_token(&self) -> Option<String>;

    /// Overwrites the stored token.
    async fn set_token(&self, token: &str) -> Result<(), KeychainError>;

    /// Removes the stored token. Clearing an empty store succeeds.
    async fn clear_token(&self) -> Result<(), KeychainError>;

    /// True when a non-empty token is stored.
    async fn has_token(&self) -> bool {
        self.get_token().await.is_some()
    }
}

// ============================================================================
// Keychain Store
// ============================================================================

/// Token store on the system keychain.
///
/// macOS Keychain Services, Windows Credential Manager, or the Linux
/// Secret Service, whichever `keyring` finds.
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service: String,
}

impl KeychainTokenStore {
    /// Uses the default `drishti:session` entry.
    pub fn system() -> Self {
        Self::new(TOKEN_SERVICE)
    }

    /// Uses a different keychain service, e.g. one per backend.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry, KeychainError> {
        Ok(Entry::new(&self.service, TOKEN_ACCOUNT)?)
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn get_token(&self) -> Option<String> {
        let read = self
            .entry()
            .and_then(|entry| token_from_read(entry.get_password()));
        match read {
            Ok(token) => token,
            Err(e) => {
                warn!(service = %self.service, error = %e, "Token unreadable, treating as signed out");
                None
            }
        }
    }

    async fn set_token(&self, token: &str) -> Result<(), KeychainError> {
        self.entry()?.set_password(token).map_err(|e| {
            warn!(service = %self.service, error = %e, "Failed to store session token");
            KeychainError::from(e)
        })?;
        debug!(service = %self.service, "Session token stored");
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), KeychainError> {
        cleared(self.entry()?.delete_credential())?;
        debug!(service = %self.service, "Session token cleared");
        Ok(())
    }
}

/// A missing or empty entry reads as no token.
fn token_from_read(read: keyring::Result<String>) -> Result<Option<String>, KeychainError> {
    match read {
        Ok(token) => Ok(Some(token).filter(|t| !t.is_empty())),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Deleting an entry that is already gone succeeds.
fn cleared(result: keyring::Result<()>) -> Result<(), KeychainError> {
    match result {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Option<String> {
        self.token.read().await.clone().filter(|t| !t.is_empty())
    }

    async fn set_token(&self, token: &str) -> Result<(), KeychainError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), KeychainError> {
        *self.token.write().await = None;
        Ok(())
    }
}
