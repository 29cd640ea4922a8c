//! Endpoint error types.

use drishti_core::{CoreError, PublishConflict, ValidationError};
use drishti_fetch::RequestError;
use thiserror::Error;

/// Errors from a typed endpoint call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or HTTP failure.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Input rejected before the request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Response body did not have the expected envelope.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request(e) => e.status(),
            _ => None,
        }
    }

    /// True when the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.is_unauthorized())
    }
}

/// Errors from publishing a session.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A score card is incomplete; the payload names it.
    #[error("{}", .0.describe())]
    Conflict(PublishConflict),

    /// Any other failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<RequestError> for PublishError {
    fn from(err: RequestError) -> Self {
        if err.status() == Some(409) {
            if let Some(conflict) = err.data().and_then(PublishConflict::from_payload) {
                return PublishError::Conflict(conflict);
            }
        }
        PublishError::Api(ApiError::Request(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http(status: u16, data: Option<serde_json::Value>) -> RequestError {
        RequestError::Http {
            status,
            message: format!("HTTP {status}"),
            data,
        }
    }

    #[test]
    fn test_conflict_extracted_from_409() {
        let err = PublishError::from(http(
            409,
            Some(json!({
                "message": "Incomplete score card:",
                "scoreCardId": "c9",
                "pose": { "sanskritName": "Bakasana" },
                "side": "LEFT",
                "missing": ["ease"]
            })),
        ));
        let PublishError::Conflict(conflict) = err else {
            panic!("expected conflict");
        };
        assert_eq!(conflict.score_card_id, "c9");
        assert_eq!(conflict.missing, vec!["ease"]);
    }

    #[test]
    fn test_409_without_card_is_plain_error() {
        let err = PublishError::from(http(409, Some(json!({ "message": "Already published" }))));
        assert!(matches!(err, PublishError::Api(_)));
    }

    #[test]
    fn test_unauthorized_passthrough() {
        let err = ApiError::from(http(401, None));
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert!(!ApiError::from(ValidationError::PasswordMismatch).is_unauthorized());
    }
}
