//! Error types for declaration registration, resolution, and validation.

use thiserror::Error;

/// Errors returned while materializing environments or resolving declarations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading an env file failed.
    #[error("failed to read env file: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing env-format text failed.
    #[error("failed to parse env data: {0}")]
    ParseFailed(#[from] dotenvy::Error),
    /// A field value was rejected by one of its validators.
    #[error(
        "validation failed at {declaration}::{field}: {message} (value: <{value}>, type: \"{value_type}\")"
    )]
    Validation {
        /// Name of the declaration whose field was rejected.
        declaration: String,
        /// Field the failing validator was attached to.
        field: String,
        /// The validator's own failure message.
        message: String,
        /// Display form of the rejected value.
        value: String,
        /// Observed type of the rejected value.
        value_type: &'static str,
    },
    /// Misuse of the registration or resolution API.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure raised by a single validator over a single value.
///
/// Carries only the validator's message; the resolution engine adds the
/// declaration, field, and value context when wrapping it into
/// [`ConfigError::Validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable reason the value was rejected.
    pub message: String,
}

impl ValidationError {
    /// Build a validation failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
