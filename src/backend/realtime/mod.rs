//! Real-time Transport Module
//!
//! Carries chat relay events between the server and browsers over WebSocket.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── broadcast.rs - The set of connected clients and fan-out
//! └── socket.rs    - WebSocket upgrade and per-socket tasks
//! ```
//!
//! # Frames
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": <payload>}`. Clients send `chat message`;
//! the server sends `chat message` (to everyone) and `chat rejected` (to the
//! sender of an invalid frame only).

/// Broadcast group
pub mod broadcast;

/// WebSocket upgrade handler
pub mod socket;

pub use broadcast::{BroadcastGroup, ClientSender, ConnectionId};
pub use socket::handle_socket_upgrade;
