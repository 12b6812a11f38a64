//! Database operations for reples
//!
//! Inserting or deleting a reple adjusts the parent post's `reple_num` in
//! the same transaction, so the counter always matches the row count.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::shared::board::{AuthorSummary, Reple, SubmitRepleRequest};

const REPLE_SELECT: &str = r#"
    SELECT r.id, r.post_num, r.reple, r.created_at, r.updated_at,
           r.author_uid, u.display_name, u.photo_url
    FROM reples r
    LEFT JOIN users u ON u.uid = r.author_uid
"#;

fn reple_from_row(row: &PgRow) -> Reple {
    Reple {
        id: row.get("id"),
        post_num: row.get("post_num"),
        reple: row.get("reple"),
        author: AuthorSummary {
            uid: row.get("author_uid"),
            display_name: row.get("display_name"),
            photo_url: row.get("photo_url"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Create a reple and bump the post's counter
///
/// Returns `None` when the post or the user does not exist.
pub async fn insert_reple(pool: &PgPool, request: &SubmitRepleRequest) -> Result<Option<Reple>, sqlx::Error> {
    let mut tx: Transaction<'_, Postgres> = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO reples (post_num, author_uid, reple)
        SELECT p.post_num, u.uid, $3
        FROM posts p, users u
        WHERE p.post_num = $1 AND u.uid = $2
        RETURNING id
        "#,
    )
    .bind(request.post_num)
    .bind(&request.uid)
    .bind(&request.reple)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = inserted else {
        return Ok(None);
    };
    let id: Uuid = row.get("id");

    sqlx::query("UPDATE posts SET reple_num = reple_num + 1 WHERE post_num = $1")
        .bind(request.post_num)
        .execute(&mut *tx)
        .await?;

    let sql = format!("{REPLE_SELECT} WHERE r.id = $1");
    let row = sqlx::query(&sql).bind(id).fetch_one(&mut *tx).await?;

    tx.commit().await?;
    Ok(Some(reple_from_row(&row)))
}

/// All reples of a post, oldest first
pub async fn list_reples(pool: &PgPool, post_num: i64) -> Result<Vec<Reple>, sqlx::Error> {
    let sql = format!("{REPLE_SELECT} WHERE r.post_num = $1 ORDER BY r.created_at ASC");
    let rows = sqlx::query(&sql).bind(post_num).fetch_all(pool).await?;
    Ok(rows.iter().map(reple_from_row).collect())
}

/// Edit a reple's body; returns the number of rows changed
pub async fn update_reple(pool: &PgPool, reple_id: Uuid, uid: &str, body: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE reples SET reple = $1, updated_at = now()
        WHERE id = $2 AND author_uid = $3
        "#,
    )
    .bind(body)
    .bind(reple_id)
    .bind(uid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a reple and decrement the post's counter
///
/// Returns `false` when no reple by `uid` had that id.
pub async fn delete_reple(pool: &PgPool, reple_id: Uuid, uid: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM reples WHERE id = $1 AND author_uid = $2 RETURNING post_num")
        .bind(reple_id)
        .bind(uid)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = deleted else {
        return Ok(false);
    };
    let post_num: i64 = row.get("post_num");

    sqlx::query("UPDATE posts SET reple_num = GREATEST(reple_num - 1, 0) WHERE post_num = $1")
        .bind(post_num)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}
