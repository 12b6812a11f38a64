/**
 * Real-time Relay Events
 *
 * Every WebSocket text frame exchanged with the chat relay is a JSON object
 * of the form `{"event": "<name>", "data": <payload>}`.
 *
 * Inbound (client → server):
 * - `chat message` - a `NewMessage` to persist and relay
 *
 * Outbound (server → client):
 * - `chat message` - a persisted `Message`, sent to every connected client
 * - `chat rejected` - sent only to the client whose frame was turned away
 *
 * The set of inbound events is closed: anything else is decoded into
 * `SharedError::UnknownEvent` rather than dispatched dynamically.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::message::{Message, NewMessage};

/// Event name for chat messages, in both directions
pub const CHAT_MESSAGE: &str = "chat message";

/// Event name for the sender-only rejection notice
pub const CHAT_REJECTED: &str = "chat rejected";

/// An event sent by a client to the relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// A chat message to persist and broadcast
    #[serde(rename = "chat message")]
    ChatMessage(NewMessage),
}

/// An event sent by the relay to one or more clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A message that has been persisted
    #[serde(rename = "chat message")]
    ChatMessage(Message),
    /// The sender's last frame was not accepted
    #[serde(rename = "chat rejected")]
    ChatRejected {
        /// Why the frame was turned away
        reason: String,
    },
}

/// Envelope used to read the event name before decoding the payload
#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ClientEvent {
    /// Decode a WebSocket text frame
    ///
    /// A frame whose `data` is missing or `null` decodes to an empty payload,
    /// which validation will later reject with a field-level reason.
    ///
    /// # Errors
    ///
    /// - `SerializationError` if the frame is not a JSON event envelope or the
    ///   payload has the wrong shape
    /// - `UnknownEvent` if the event name is not supported
    pub fn from_frame(text: &str) -> Result<Self, SharedError> {
        let raw: RawFrame = serde_json::from_str(text)?;
        match raw.event.as_str() {
            CHAT_MESSAGE => {
                let payload = if raw.data.is_null() {
                    NewMessage::default()
                } else {
                    serde_json::from_value(raw.data)?
                };
                Ok(Self::ChatMessage(payload))
            }
            other => Err(SharedError::unknown_event(other)),
        }
    }

    /// Encode as a WebSocket text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ServerEvent {
    /// Create a rejection notice
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::ChatRejected {
            reason: reason.into(),
        }
    }

    /// The wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatMessage(_) => CHAT_MESSAGE,
            Self::ChatRejected { .. } => CHAT_REJECTED,
        }
    }

    /// Encode as a WebSocket text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a WebSocket text frame
    pub fn from_frame(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }
}
