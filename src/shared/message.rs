/**
 * Chat Message Data Structures
 *
 * Two shapes exist for a chat message:
 *
 * - `NewMessage` is what a client submits: the three user-supplied fields.
 * - `Message` is what the store hands back after a successful write: the same
 *   fields plus the store-assigned id and creation timestamp.
 *
 * Only `Message` values are ever broadcast, so a client can never observe a
 * message that was not persisted.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{limit_text, require_text, SharedError};

/// Longest accepted sender name, in characters
pub const MAX_USERNAME_LENGTH: usize = 100;

/// Longest accepted message body, in characters
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Longest accepted avatar URL, in characters
pub const MAX_PHOTO_URL_LENGTH: usize = 2048;

/// A persisted chat message
///
/// Serialized with the field names the web client already understands
/// (`_id`, `photoURL`, `createdAt`).
///
/// # Example
/// ```rust
/// use postboard::shared::{Message, NewMessage};
///
/// let draft = NewMessage::new("alice", "hi", None);
/// let stored = draft.into_message(uuid::Uuid::new_v4(), chrono::Utc::now());
/// assert_eq!(stored.username, "alice");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned unique identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Sender name as supplied by the client
    pub username: String,
    /// Message body
    pub message: String,
    /// Optional sender avatar URL
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Store-assigned creation time (UTC)
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A chat message as submitted by a client, before persistence
///
/// Every field defaults when absent so that a structurally incomplete payload
/// still decodes and is then turned away by [`NewMessage::validate`] with a
/// field-specific reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    /// Sender name
    #[serde(default)]
    pub username: String,
    /// Message body
    #[serde(default)]
    pub message: String,
    /// Optional sender avatar URL
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl NewMessage {
    /// Create a new draft message
    pub fn new(username: impl Into<String>, message: impl Into<String>, photo_url: Option<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
            photo_url,
        }
    }

    /// Check the content rules for an inbound chat message
    ///
    /// - `username` must be non-blank, at most 100 characters
    /// - `message` must be non-blank, at most 10 000 characters
    /// - `photoURL`, when present, at most 2048 characters
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("username", &self.username, MAX_USERNAME_LENGTH)?;
        require_text("message", &self.message, MAX_MESSAGE_LENGTH)?;
        if let Some(url) = &self.photo_url {
            limit_text("photoURL", url, MAX_PHOTO_URL_LENGTH)?;
        }
        Ok(())
    }

    /// Attach the store-assigned identity, producing the persisted record
    pub fn into_message(self, id: Uuid, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            username: self.username,
            message: self.message,
            photo_url: self.photo_url,
            created_at,
        }
    }
}
