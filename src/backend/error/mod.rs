//! Backend Error Module
//!
//! Error types for the HTTP surface. Every handler returns
//! `Result<_, BackendError>`, and `BackendError` converts itself into a JSON
//! response with the matching status code.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! ├── conversion.rs - IntoResponse and From implementations
//! └── rejection.rs  - ApiJson/ApiQuery extractors with JSON rejections
//! ```
//!
//! # Response Format
//!
//! ```json
//! { "error": "Post 7 not found", "status": 404 }
//! ```
//!
//! The chat relay never produces a `BackendError`: relay failures are logged
//! and never surfaced to clients.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Extractors whose rejections are `BackendError`s
pub mod rejection;

pub use rejection::{ApiJson, ApiQuery};
pub use types::BackendError;
