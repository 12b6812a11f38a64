/**
 * Error Conversion
 *
 * - `IntoResponse` for `BackendError`, so handlers can return it directly
 * - `From<sqlx::Error>`, which classifies driver errors before wrapping them
 *
 * # Response Format
 *
 * ```json
 * { "error": "Error message", "status": 400 }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use sqlx::PgPool;

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Http] {} ({})", self, status);
        } else {
            tracing::debug!("[Http] {} ({})", self, status);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for BackendError {
    /// Classify a driver error
    ///
    /// - unique-key violation → `Conflict`
    /// - `RowNotFound` → `NotFound`
    /// - anything else → `Database`
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::conflict("A record with the same unique value already exists");
            }
        }
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Record not found"),
            other => Self::Database(other),
        }
    }
}

/// Turn an `UPDATE`/`DELETE` row count into `NotFound` when nothing matched
pub fn require_affected(rows: u64, what: impl FnOnce() -> String) -> Result<(), BackendError> {
    if rows == 0 {
        Err(BackendError::not_found(what()))
    } else {
        Ok(())
    }
}

/// The pool, or `Unavailable` when no database is configured
pub fn require_pool(db_pool: &Option<PgPool>) -> Result<&PgPool, BackendError> {
    db_pool
        .as_ref()
        .ok_or_else(|| BackendError::unavailable("Database not configured"))
}

/// Shorthand for a 400 with a message
pub fn bad_request(message: impl Into<String>) -> BackendError {
    BackendError::handler(StatusCode::BAD_REQUEST, message)
}
