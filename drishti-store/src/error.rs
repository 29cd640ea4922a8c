//! Store error types.

use drishti_api::ApiError;
use drishti_core::ValidationError;
use drishti_fetch::{KeychainError, RequestError};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Endpoint call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Transport failure outside an endpoint wrapper.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Token could not be written or removed.
    #[error("Token storage failed: {0}")]
    Keychain(#[from] KeychainError),

    /// Input rejected locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Api(ApiError::Request(e)) | StoreError::Request(e) => e.is_network(),
            StoreError::Io(_) => true,
            _ => false,
        }
    }

    /// True when the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            StoreError::Api(e) => e.is_unauthorized(),
            StoreError::Request(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let unauthorized = StoreError::Api(ApiError::Request(RequestError::Http {
            status: 401,
            message: "nope".to_string(),
            data: None,
        }));
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_transient());

        let io = StoreError::Io(std::io::Error::other("disk"));
        assert!(io.is_transient());

        let validation = StoreError::from(ValidationError::PasswordMismatch);
        assert!(!validation.is_transient());
        assert_eq!(validation.to_string(), "Passwords do not match");
    }
}
