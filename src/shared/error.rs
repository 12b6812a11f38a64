//! Shared Error Types
//!
//! Errors that can be produced while decoding or validating wire data,
//! independent of whether the caller is an HTTP handler or the chat relay.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON encoding/decoding failures
//! - `ValidationError` - A field violated a content rule
//! - `UnknownEvent` - A relay frame named an event the server does not handle
//!
//! # Usage
//!
//! ```rust
//! use postboard::shared::error::SharedError;
//!
//! let error = SharedError::validation("message", "must not be blank");
//! assert!(error.to_string().contains("message"));
//! ```
use thiserror::Error;

/// Shared error types for wire decoding and validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A relay frame carried an event name outside the supported set
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// The event name as received
        name: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown-event error
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Check that a text field is non-blank and at most `max_chars` characters.
///
/// Lengths are counted in `char`s so that multi-byte scripts get the same
/// allowance as ASCII.
pub fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be blank"));
    }
    limit_text(field, value, max_chars)
}

/// Check that a text field is at most `max_chars` characters (blank allowed).
pub fn limit_text(field: &str, value: &str, max_chars: usize) -> Result<(), SharedError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(SharedError::validation(
            field,
            format!("is {} characters long, limit is {}", len, max_chars),
        ));
    }
    Ok(())
}
