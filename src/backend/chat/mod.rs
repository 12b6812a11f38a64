//! Chat Backend Module
//!
//! Server-side half of the chat: the relay that persists and fans out
//! messages, the store it writes through, and the history endpoint.
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs     - Module exports and documentation
//! ├── relay.rs   - Persist-then-broadcast relay and connection lifecycle
//! ├── store.rs   - MessageStore trait, PostgreSQL and in-memory stores
//! ├── db.rs      - SQL for the messages table
//! └── history.rs - GET /api/chat/messages
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postboard::backend::chat::{ChatRelay, MemoryMessageStore};
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let relay = ChatRelay::new(Arc::new(MemoryMessageStore::new()));
//! let (tx, _rx) = mpsc::unbounded_channel();
//! let connection = relay.connect(tx);
//! let frame = r#"{"event":"chat message","data":{"username":"alice","message":"hi"}}"#;
//! if let Some(write) = connection.on_frame(frame).await {
//!     let _outcome = write.await;
//! }
//! # }
//! ```

/// Relay and connection lifecycle
pub mod relay;

/// Persistence adapter
pub mod store;

/// Database operations for chat messages
pub mod db;

/// History endpoint
pub mod history;

pub use history::handle_chat_history;
pub use relay::{ChatRelay, Connection, ConnectionState, RelayOutcome};
pub use store::{MemoryMessageStore, MessageStore, PgMessageStore, StoreError};
