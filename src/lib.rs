//! Postboard - Main Library
//!
//! Postboard is the backend of a small community board: posts, user
//! profiles, replies ("reples"), address geocoding, and a real-time chat
//! room relayed over a WebSocket.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared with clients
//!   - Chat messages and relay events
//!   - Board entities and request/response bodies
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, CORS and static SPA serving
//!   - Chat relay: broadcast group, per-connection state machine
//!   - PostgreSQL persistence through sqlx
//!   - External geocoding lookups
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the
//!   `postboard-server` binary.
//!
//! # Usage
//!
//! ```rust,no_run
//! use postboard::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The chat broadcast group is the only process-wide mutable state. It is
//! guarded by a single mutex; everything else is either immutable
//! configuration or the database pool.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
