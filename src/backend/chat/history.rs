/**
 * Chat History Handler
 *
 * `GET /api/chat/messages?limit=N` returns the most recent persisted chat
 * messages, oldest first. New clients use it to fill the view before they
 * start receiving live broadcasts; the relay itself never replays history.
 */

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::chat::relay::ChatRelay;
use crate::backend::error::{ApiQuery, BackendError};
use crate::shared::Message;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

impl HistoryQuery {
    /// Requested limit clamped to `1..=MAX_HISTORY_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub success: bool,
    pub messages: Vec<Message>,
}

/// Handle `GET /api/chat/messages`
pub async fn handle_chat_history(
    State(relay): State<ChatRelay>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<ChatHistoryResponse>, BackendError> {
    let messages = relay.store().recent(query.effective_limit()).await?;
    Ok(Json(ChatHistoryResponse {
        success: true,
        messages,
    }))
}
