/**
 * Router Configuration
 *
 * Combines every route into a single Axum router.
 *
 * # Route Order
 *
 * 1. `GET /ws` - chat relay WebSocket
 * 2. `/api/...` - JSON API
 * 3. Fallback - files from the client build directory; any path that is not
 *    a file gets `index.html` so the client router can handle it
 *
 * # Layers
 *
 * - CORS: exactly one allowed origin, `GET` and `POST` only
 * - Request tracing
 */

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(handle_socket_upgrade));

    let router = configure_api_routes(router);

    let static_dir = &app_state.config.static_dir;
    let client = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let router = router.fallback_service(client);

    router
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match config.allowed_origin_header() {
        // A list match sends the header only to the configured origin.
        Ok(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        Err(e) => {
            // Unreachable for configs built through ServerConfigBuilder.
            tracing::error!("CORS disabled: {}", e);
            layer
        }
    }
}
