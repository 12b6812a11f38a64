/**
 * Server Initialization
 *
 * Builds the application from a loaded configuration and runs it.
 *
 * # Initialization Process
 *
 * 1. Open the database pool (lazily) and run migrations
 * 2. Back the chat relay with the PostgreSQL message store
 * 3. Assemble `AppState` and the router
 *
 * A missing or unreachable database never stops startup; see
 * `config::load_database`.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::chat::PgMessageStore;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing postboard backend server");

    let db_pool = load_database(&config).await;
    let store = Arc::new(PgMessageStore::new(db_pool.clone()));

    if config.geocode.api_key.is_none() {
        tracing::warn!("GEOCODE_API_KEY not set. Geocoding routes will answer 503.");
    }

    let app_state = AppState::new(config, db_pool, store);
    tracing::info!("Chat relay ready");

    create_router(app_state)
}

/// Bind the configured address and serve until the process ends
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let app = create_app(config).await;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await
}
