//! Reple HTTP Handlers

use axum::{extract::State, Json};
use sqlx::PgPool;

use super::db;
use crate::backend::error::conversion::{require_affected, require_pool};
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::board::{
    AckResponse, DeleteRepleRequest, EditRepleRequest, PostNumRequest, RepleListResponse,
    RepleResponse, SubmitRepleRequest,
};

/// Add a reple to a post
pub async fn submit_reple(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<SubmitRepleRequest>,
) -> Result<Json<RepleResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let reple = db::insert_reple(pool, &request).await?.ok_or_else(|| {
        BackendError::not_found(format!(
            "Post {} or user {} not found",
            request.post_num, request.uid
        ))
    })?;

    tracing::info!("[Reple] {} replied to post {}", request.uid, request.post_num);
    Ok(Json(RepleResponse {
        success: true,
        reple,
    }))
}

/// List a post's reples
pub async fn get_reples(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<PostNumRequest>,
) -> Result<Json<RepleListResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;

    let reple_list = db::list_reples(pool, request.post_num).await?;
    Ok(Json(RepleListResponse {
        success: true,
        reple_list,
    }))
}

/// Edit a reple
pub async fn edit_reple(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<EditRepleRequest>,
) -> Result<Json<AckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let rows = db::update_reple(pool, request.reple_id, &request.uid, &request.reple).await?;
    require_affected(rows, || format!("Reple {} not found", request.reple_id))?;

    Ok(Json(AckResponse::ok()))
}

/// Delete a reple
pub async fn delete_reple(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<DeleteRepleRequest>,
) -> Result<Json<AckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;

    if !db::delete_reple(pool, request.reple_id, &request.uid).await? {
        return Err(BackendError::not_found(format!("Reple {} not found", request.reple_id)));
    }

    tracing::info!("[Reple] {} deleted reple {}", request.uid, request.reple_id);
    Ok(Json(AckResponse::ok()))
}
