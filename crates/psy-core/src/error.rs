//! Error types for psychometric analytics
//!
//! Provides a unified error type for all psy-* crates.

use thiserror::Error;

/// Core error type for analytics operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value or an input record failed validation
    #[error("Validation failed for `{field}` (value: {value}): {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// Invalid engine parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data for the requested operation
    ///
    /// Not raised by the analytics components, which mark short inputs with
    /// `DataStatus::InsufficientData` instead. Reserved for hosts and
    /// observation sources that must refuse a request.
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// The result repository could not deliver observations
    #[error("Repository error: {0}")]
    Repository(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The caller cancelled the analysis
    #[error("Analysis cancelled")]
    Cancelled,

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error for a named field
    pub fn validation(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a validation error for a required field that is absent
    pub fn missing_field(field: &str) -> Self {
        Self::validation(field, "<missing>", "required field is missing")
    }

    /// Whether this error came from validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidParameter(_))
    }
}
