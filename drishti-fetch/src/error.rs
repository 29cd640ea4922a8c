//! Transport and credential storage error types.

use thiserror::Error;

// ============================================================================
// Request Error
// ============================================================================

/// Error returned by every [`ApiClient`](crate::ApiClient) call.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The transport could not complete the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message taken from the body, or `HTTP <status>`.
        message: String,
        /// Parsed JSON body, when the server sent one.
        data: Option<serde_json::Value>,
    },

    /// Base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// A 2xx body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl RequestError {
    /// HTTP status, absent for transport and local failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            RequestError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for a 401, meaning the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Structured payload from the error body.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            RequestError::Http { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// True when the transport failed before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, RequestError::Network(_))
    }
}

// ============================================================================
// Keychain Error
// ============================================================================

/// Failure reading or writing the token entry in the system keychain.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// The keychain is locked or refused access.
    #[error("Keychain access denied: {0}")]
    AccessDenied(String),

    /// The platform credential store failed.
    #[error("Keychain unavailable: {0}")]
    Unavailable(String),

    /// The entry name or stored value was rejected.
    #[error("Keychain entry rejected: {0}")]
    Rejected(String),
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoStorageAccess(e) => KeychainError::AccessDenied(e.to_string()),
            keyring::Error::PlatformFailure(e) => KeychainError::Unavailable(e.to_string()),
            other => KeychainError::Rejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_accessors() {
        let err = RequestError::Http {
            status: 409,
            message: "Incomplete".to_string(),
            data: Some(json!({ "scoreCardId": "x" })),
        };
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_unauthorized());
        assert_eq!(err.to_string(), "Incomplete");
        assert_eq!(err.data().and_then(|d| d.get("scoreCardId")), Some(&json!("x")));
    }

    #[test]
    fn test_local_errors_have_no_status() {
        let err = RequestError::InvalidUrl("nope".to_string());
        assert_eq!(err.status(), None);
        assert!(err.data().is_none());
        assert!(!err.is_network());
    }

    #[test]
    fn test_keyring_error_mapping() {
        let err = KeychainError::from(keyring::Error::NoStorageAccess("locked".into()));
        assert!(matches!(err, KeychainError::AccessDenied(ref m) if m == "locked"));

        let err = KeychainError::from(keyring::Error::PlatformFailure("dbus down".into()));
        assert_eq!(err.to_string(), "Keychain unavailable: dbus down");

        let err = KeychainError::from(keyring::Error::TooLong("service".to_string(), 255));
        assert!(matches!(err, KeychainError::Rejected(_)));
    }
}
