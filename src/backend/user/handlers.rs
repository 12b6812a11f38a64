//! User HTTP Handlers
//!
//! Identity is owned by the client-side auth provider; these routes only
//! keep the board's copy of the profile.

use axum::{extract::State, Json};
use sqlx::PgPool;

use super::db;
use crate::backend::error::conversion::{bad_request, require_affected, require_pool};
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::board::{
    AckResponse, NameCheckRequest, NameCheckResponse, ProfileImageRequest, RegisterRequest,
    RegisterResponse,
};

/// Register a profile
pub async fn register(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let user = db::insert_user(pool, &request).await?;

    tracing::info!("[User] registered {} as {}", user.uid, user.display_name);
    Ok(Json(RegisterResponse {
        success: true,
        user,
    }))
}

/// Report whether a display name is still free
pub async fn name_check(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<NameCheckRequest>,
) -> Result<Json<NameCheckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    if request.display_name.trim().is_empty() {
        return Err(bad_request("displayName must not be blank"));
    }

    let taken = db::display_name_taken(pool, &request.display_name).await?;
    Ok(Json(NameCheckResponse {
        success: true,
        check: !taken,
    }))
}

/// Update the profile photo
pub async fn update_profile_image(
    State(db_pool): State<Option<PgPool>>,
    ApiJson(request): ApiJson<ProfileImageRequest>,
) -> Result<Json<AckResponse>, BackendError> {
    let pool = require_pool(&db_pool)?;
    request.validate()?;

    let rows = db::update_photo_url(pool, &request.uid, &request.photo_url).await?;
    require_affected(rows, || format!("User {} not found", request.uid))?;

    Ok(Json(AckResponse::ok()))
}
