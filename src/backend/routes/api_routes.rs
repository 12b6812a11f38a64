/**
 * API Route Handlers
 *
 * Mounts every JSON endpoint under `/api`.
 *
 * # Routes
 *
 * ## Posts
 * - `POST /api/post/submit`, `/list`, `/detail`, `/edit`, `/delete`
 *
 * ## Users
 * - `POST /api/user/register`, `/namecheck`, `/profile/img`
 *
 * ## Reples
 * - `POST /api/reple/submit`, `/getReple`, `/edit`, `/delete`
 *
 * ## Geocoding
 * - `GET /api/geocode?address=..`
 * - `GET /api/geocode/reverse?lat=..&lng=..`
 *
 * ## Chat
 * - `GET /api/chat/messages?limit=..`
 *
 * ## Health
 * - `GET /api/health`
 */

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::backend::chat::handle_chat_history;
use crate::backend::geocode::{handle_forward_geocode, handle_reverse_geocode};
use crate::backend::server::state::AppState;
use crate::backend::post::handlers as post_handlers;
use crate::backend::reple::handlers as reple_handlers;
use crate::backend::user::handlers as user_handlers;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .nest("/api/post", post_routes())
        .nest("/api/user", user_routes())
        .nest("/api/reple", reple_routes())
        .route("/api/geocode", get(handle_forward_geocode))
        .route("/api/geocode/reverse", get(handle_reverse_geocode))
        .route("/api/chat/messages", get(handle_chat_history))
        .route("/api/health", get(handle_health))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/submit", post(post_handlers::submit_post))
        .route("/list", post(post_handlers::list_posts))
        .route("/detail", post(post_handlers::post_detail))
        .route("/edit", post(post_handlers::edit_post))
        .route("/delete", post(post_handlers::delete_post))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(user_handlers::register))
        .route("/namecheck", post(user_handlers::name_check))
        .route("/profile/img", post(user_handlers::update_profile_image))
}

fn reple_routes() -> Router<AppState> {
    Router::new()
        .route("/submit", post(reple_handlers::submit_reple))
        .route("/getReple", post(reple_handlers::get_reples))
        .route("/edit", post(reple_handlers::edit_reple))
        .route("/delete", post(reple_handlers::delete_reple))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether the database answered a trivial query
    pub database: bool,
    /// Connected chat clients
    pub clients: usize,
}

/// Liveness plus a database probe
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db_pool {
        Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
        None => false,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        database,
        clients: state.relay.group().len(),
    })
}
