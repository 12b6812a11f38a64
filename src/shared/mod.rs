//! Shared Module
//!
//! Types that cross the wire: chat messages, relay events and the board's
//! request/response bodies. Nothing in here depends on the server stack, so
//! the module builds without the `ssr` feature.

/// Chat message data structures
pub mod message;

/// Real-time relay events
pub mod event;

/// Shared error types
pub mod error;

/// Board entities (users, posts, reples) and their request bodies
pub mod board;

/// Re-export commonly used types for convenience
pub use message::{Message, NewMessage};
pub use event::{ClientEvent, ServerEvent};
pub use error::SharedError;
