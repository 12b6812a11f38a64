//! Server Module
//!
//! Process bootstrap: configuration, application state and router assembly.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Configuration loading and the database pool
//! └── init.rs   - App creation and serving
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use postboard::backend::server::{config::ServerConfig, serve};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{create_app, serve};
pub use state::AppState;
