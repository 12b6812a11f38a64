//! Backend Module
//!
//! All server-side code: an Axum HTTP server whose single listener carries
//! both the board API and the chat relay's WebSocket channel.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, startup
//! - **`routes`** - Router assembly, CORS, static SPA fallback
//! - **`chat`** - Chat relay, message store, chat history endpoint
//! - **`realtime`** - Broadcast group and the WebSocket connection loop
//! - **`post`** / **`user`** / **`reple`** - Board CRUD endpoints
//! - **`geocode`** - External address lookup
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Config, state, init
//! ├── routes/         - Router assembly
//! ├── chat/           - Relay core and persistence adapter
//! ├── realtime/       - Broadcast group, WebSocket handler
//! ├── post/ user/ reple/ - Board endpoints (db + handlers)
//! ├── geocode/        - Geocoding client + handlers
//! └── error/          - Error types
//! ```
//!
//! # Chat Flow
//!
//! ```text
//! client ──frame──▶ realtime::socket ──▶ chat::relay ──save──▶ chat::store
//!                                             │
//!                                             ▼ (only after a successful save)
//!                                   realtime::broadcast ──▶ every connected client
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat relay and message persistence
pub mod chat;

/// Real-time connection management
pub mod realtime;

/// Board posts
pub mod post;

/// User profiles
pub mod user;

/// Replies to posts
pub mod reple;

/// Address geocoding
pub mod geocode;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use server::create_app;
pub use chat::{ChatRelay, MessageStore};
pub use realtime::BroadcastGroup;
pub use error::BackendError;
