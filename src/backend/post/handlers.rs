//! Post HTTP Handlers
//!
//! All routes are `POST` with a JSON body, mirroring what the board client
//! sends.

use axum::{extract::State, Json};
use sqlx::PgPool;

use super::db;
use crate::backend::error::conversion::{require_affected, require_pool};
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::board::{
    AckResponse, DeletePostRequest, EditPostRequest, ListPostsRequest, PostDetailResponse,
    PostListResponse, PostNumRequest, SubmitPostRequest, SubmitPostResponse,
};

/// Create a post
pub async fn submit_post(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<SubmitPostRequest>,
) -> Result<Json<SubmitPostResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let post_num = db::insert_post(pool, &request)
        .await?
        .ok_or_else(|| BackendError::not_found(format!("User {} not found", request.uid)))?;

    tracing::info!("[Post] {} created post {}", request.uid, post_num);
    Ok(Json(SubmitPostResponse {
        success: true,
        post_num,
    }))
}

/// List one page of posts
pub async fn list_posts(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<ListPostsRequest>,
) -> Result<Json<PostListResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;

    let post_list = db::list_posts(pool, request.sort, &request.search_term, request.skip).await?;
    Ok(Json(PostListResponse {
        success: true,
        post_list,
    }))
}

/// Fetch one post with its author
pub async fn post_detail(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<PostNumRequest>,
) -> Result<Json<PostDetailResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;

    let post = db::get_post(pool, request.post_num)
        .await?
        .ok_or_else(|| BackendError::not_found(format!("Post {} not found", request.post_num)))?;

    Ok(Json(PostDetailResponse {
        success: true,
        post,
    }))
}

/// Edit a post
pub async fn edit_post(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<EditPostRequest>,
) -> Result<Json<AckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let rows = db::update_post(pool, &request).await?;
    require_affected(rows, || format!("Post {} not found", request.post_num))?;

    tracing::info!("[Post] {} edited post {}", request.uid, request.post_num);
    Ok(Json(AckResponse::ok()))
}

/// Delete a post and its replies
pub async fn delete_post(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<DeletePostRequest>,
) -> Result<Json<AckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;

    let rows = db::delete_post(pool, request.post_num, &request.uid).await?;
    require_affected(rows, || format!("Post {} not found", request.post_num))?;

    tracing::info!("[Post] {} deleted post {}", request.uid, request.post_num);
    Ok(Json(AckResponse::ok()))
}
