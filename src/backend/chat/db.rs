/**
 * Database Operations for Chat Messages
 *
 * The `messages` table is append-only from the relay's point of view:
 * rows are inserted once and never updated or deleted here.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::{Message, NewMessage};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    username: String,
    message: String,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            username: row.username,
            message: row.message,
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}

/// Insert a message and return the stored row
///
/// The id and `created_at` are assigned by the database, so the returned
/// value is exactly what a later read would see.
pub async fn insert_message(pool: &PgPool, draft: &NewMessage) -> Result<Message, sqlx::Error> {
    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (username, message, photo_url)
        VALUES ($1, $2, $3)
        RETURNING id, username, message, photo_url, created_at
        "#,
    )
    .bind(&draft.username)
    .bind(&draft.message)
    .bind(&draft.photo_url)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Load the `limit` most recent messages, oldest first
pub async fn recent_messages(pool: &PgPool, limit: i64) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, username, message, photo_url, created_at
        FROM (
            SELECT id, username, message, photo_url, created_at
            FROM messages
            ORDER BY created_at DESC
            LIMIT $1
        ) AS latest
        ORDER BY created_at ASC
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Message::from).collect())
}
