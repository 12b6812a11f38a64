/**
 * Backend Error Types
 *
 * # Error Categories
 *
 * ## Request errors
 * - `HandlerError` - a handler rejected the request with an explicit status
 * - `NotFound` - the addressed row does not exist (or is not the caller's)
 * - `Conflict` - a uniqueness rule would be broken
 * - `SharedError` - request body failed validation
 *
 * ## Dependency errors
 * - `Unavailable` - a dependency (database, geocoder) is not configured
 * - `Database` - the database driver failed
 * - `Store` - the chat message store failed
 * - `Geocode` - the external geocoding provider failed
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::chat::store::StoreError;
use crate::backend::geocode::client::GeocodeError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use postboard::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("Post 7 not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The addressed resource does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// A uniqueness constraint would be violated
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// A required dependency is not configured
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// Human-readable error message
        message: String,
    },

    /// Validation or decoding error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database driver error
    ///
    /// Constructed through `From<sqlx::Error>`, which maps unique-key
    /// violations to `Conflict` and missing rows to `NotFound` first.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Chat message store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Geocoding provider error
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - the status it carries
    /// - `NotFound` - 404
    /// - `Conflict` - 409
    /// - `Unavailable`, `Store(Unavailable)`, `Geocode(MissingApiKey)` - 503
    /// - `SharedError` validation/decoding - 400
    /// - `Geocode` provider failures - 502
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Geocode(GeocodeError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Geocode(_) => StatusCode::BAD_GATEWAY,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Driver errors are reduced to a generic message; the detail only goes
    /// to the log.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Unavailable { message } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::Database(_) => "Internal database error".to_string(),
            Self::Store(StoreError::Unavailable) => StoreError::Unavailable.to_string(),
            Self::Store(_) => "Failed to access chat messages".to_string(),
            Self::Geocode(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            BackendError::handler(StatusCode::UNAUTHORIZED, "no").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(BackendError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            BackendError::unavailable("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            BackendError::Store(StoreError::Unavailable).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            BackendError::Geocode(GeocodeError::MissingApiKey).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            BackendError::Geocode(GeocodeError::Upstream { status: 500 }).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("title", "must not be blank").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("title"));
    }

    #[test]
    fn test_database_message_is_generic() {
        let error = BackendError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(error.message(), "Internal database error");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
