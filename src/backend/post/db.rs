//! Database operations for posts
//!
//! Posts are always read joined with their author's profile. Edits and
//! deletes are scoped to the author: a row that exists but belongs to
//! someone else is reported the same way as a missing one.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::shared::board::{
    AuthorSummary, EditPostRequest, Post, PostSort, SubmitPostRequest, POST_PAGE_SIZE,
};

const POST_COLUMNS: &str = r#"
    p.post_num, p.title, p.content, p.image, p.reple_num, p.created_at, p.updated_at,
    p.author_uid, u.display_name, u.photo_url
"#;

fn post_from_row(row: &PgRow) -> Post {
    Post {
        post_num: row.get("post_num"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        author: AuthorSummary {
            uid: row.get("author_uid"),
            display_name: row.get("display_name"),
            photo_url: row.get("photo_url"),
        },
        reple_num: row.get("reple_num"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Create a post
///
/// Returns `None` when `uid` is not a registered user.
pub async fn insert_post(pool: &PgPool, request: &SubmitPostRequest) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO posts (title, content, image, author_uid)
        SELECT $1, $2, $3, u.uid FROM users u WHERE u.uid = $4
        RETURNING post_num
        "#,
    )
    .bind(&request.title)
    .bind(&request.content)
    .bind(&request.image)
    .bind(&request.uid)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row.get("post_num")))
}

/// One page of posts, optionally filtered by a title/content search
pub async fn list_posts(
    pool: &PgPool,
    sort: PostSort,
    search_term: &str,
    skip: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let order = match sort {
        PostSort::New => "p.created_at DESC, p.post_num DESC",
        PostSort::Best => "p.reple_num DESC, p.created_at DESC, p.post_num DESC",
    };
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts p
        LEFT JOIN users u ON u.uid = p.author_uid
        WHERE $1 = '' OR p.title ILIKE $2 OR p.content ILIKE $2
        ORDER BY {order}
        LIMIT $3 OFFSET $4
        "#
    );

    let search_term = search_term.trim();
    let rows = sqlx::query(&sql)
        .bind(search_term)
        .bind(contains_pattern(search_term))
        .bind(POST_PAGE_SIZE)
        .bind(skip.max(0))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(post_from_row).collect())
}

/// Fetch a single post
pub async fn get_post(pool: &PgPool, post_num: i64) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts p
        LEFT JOIN users u ON u.uid = p.author_uid
        WHERE p.post_num = $1
        "#
    );
    let row = sqlx::query(&sql).bind(post_num).fetch_optional(pool).await?;
    Ok(row.as_ref().map(post_from_row))
}

/// Update a post's body; returns the number of rows changed
pub async fn update_post(pool: &PgPool, request: &EditPostRequest) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = $1, content = $2, image = $3, updated_at = now()
        WHERE post_num = $4 AND author_uid = $5
        "#,
    )
    .bind(&request.title)
    .bind(&request.content)
    .bind(&request.image)
    .bind(request.post_num)
    .bind(&request.uid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a post; its replies go with it
pub async fn delete_post(pool: &PgPool, post_num: i64, uid: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE post_num = $1 AND author_uid = $2")
        .bind(post_num)
        .bind(uid)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
