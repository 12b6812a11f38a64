//! Routes Module
//!
//! Assembles the HTTP surface.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Top-level router, static fallback and layers
//! └── api_routes.rs - `/api` endpoints
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postboard::backend::chat::MemoryMessageStore;
//! use postboard::backend::routes::create_router;
//! use postboard::backend::server::{AppState, ServerConfig};
//!
//! let state = AppState::new(ServerConfig::default(), None, Arc::new(MemoryMessageStore::new()));
//! let router = create_router(state);
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
