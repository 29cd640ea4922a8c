//! Core error types for Drishti.

use thiserror::Error;

/// Core error type for Drishti operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-side validation failed before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Input rejected on the client before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty after trimming.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A score card metric outside the accepted range.
    #[error("{metric} must be between {min} and {max}, got {value}")]
    MetricOutOfRange {
        /// Metric field name.
        metric: &'static str,
        /// Rejected value.
        value: u8,
        /// Lowest accepted value.
        min: u8,
        /// Highest accepted value.
        max: u8,
    },

    /// Unknown metric name.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Score cards of a published session are read-only.
    #[error("This session is published. Unpublish to edit.")]
    SessionPublished,
}
