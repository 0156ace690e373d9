//! Error types for the LifeMode health engine

use thiserror::Error;

/// Errors raised while validating input or computing a health analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealthError {
    /// Input outside its declared range, non-finite, or missing
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// A denominator that must be positive was zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A categorical value outside its fixed set
    #[error("Unrecognized {field}: '{value}'")]
    UnrecognizedCategory { field: String, value: String },

    /// The risk classifier artifact is missing or incompatible
    #[error("Risk model unavailable: {0}")]
    ModelUnavailable(String),
}

impl HealthError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HealthError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized(field: impl Into<String>, value: impl Into<String>) -> Self {
        HealthError::UnrecognizedCategory {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Name of the offending input field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            HealthError::Validation { field, .. } => Some(field),
            HealthError::UnrecognizedCategory { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result alias used throughout the engine
pub type HealthResult<T> = Result<T, HealthError>;
