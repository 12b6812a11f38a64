//! Database operations for user profiles

use sqlx::{PgPool, Row};

use crate::shared::board::{RegisterRequest, UserProfile};

/// Create a user profile
///
/// A taken `uid`, email or display name surfaces as a unique violation.
pub async fn insert_user(pool: &PgPool, request: &RegisterRequest) -> Result<UserProfile, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO users (uid, email, display_name, photo_url)
        VALUES ($1, $2, $3, $4)
        RETURNING uid, email, display_name, photo_url, created_at
        "#,
    )
    .bind(&request.uid)
    .bind(&request.email)
    .bind(request.display_name.trim())
    .bind(&request.photo_url)
    .fetch_one(pool)
    .await?;

    Ok(UserProfile {
        uid: row.get("uid"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        photo_url: row.get("photo_url"),
        created_at: row.get("created_at"),
    })
}

/// Whether a display name is already in use
pub async fn display_name_taken(pool: &PgPool, display_name: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE display_name = $1) AS taken")
        .bind(display_name.trim())
        .fetch_one(pool)
        .await?;

    Ok(row.get("taken"))
}

/// Replace a user's profile photo; returns the number of rows changed
pub async fn update_photo_url(pool: &PgPool, uid: &str, photo_url: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET photo_url = $1 WHERE uid = $2")
        .bind(photo_url)
        .bind(uid)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
