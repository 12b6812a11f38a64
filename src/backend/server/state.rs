/**
 * Application State Management
 *
 * Defines the application state and the `FromRef` implementations that let
 * handlers extract only the part they need.
 *
 * # State Extraction
 *
 * - `State<ChatRelay>` - the chat relay (WebSocket and history handlers)
 * - `State<Option<PgPool>>` - the database pool, `None` without a database
 * - `State<GeocodeClient>` - the geocoding client
 * - `State<Arc<ServerConfig>>` - the loaded configuration
 *
 * # Example
 *
 * ```rust
 * use postboard::backend::chat::ChatRelay;
 * use axum::extract::State;
 *
 * async fn handler(State(relay): State<ChatRelay>) -> String {
 *     format!("{} clients online", relay.group().len())
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::chat::{ChatRelay, MessageStore};
use crate::backend::geocode::GeocodeClient;
use crate::backend::server::config::ServerConfig;

/// Central state container for the router
///
/// Every field is cheap to clone; clones share the underlying resources.
#[derive(Clone)]
pub struct AppState {
    /// Chat relay: broadcast group plus message store
    pub relay: ChatRelay,

    /// Database connection pool
    ///
    /// `None` if `DATABASE_URL` is not set. Board handlers answer 503 then.
    pub db_pool: Option<PgPool>,

    /// Geocoding provider client
    pub geocoder: GeocodeClient,

    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble state from its parts
    ///
    /// The relay writes through `store`, which is independent of `db_pool`
    /// so tests can run the relay in memory.
    pub fn new(config: ServerConfig, db_pool: Option<PgPool>, store: Arc<dyn MessageStore>) -> Self {
        let geocoder = GeocodeClient::new(config.geocode.clone());
        Self {
            relay: ChatRelay::new(store),
            db_pool,
            geocoder,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for ChatRelay {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for GeocodeClient {
    fn from_ref(state: &AppState) -> Self {
        state.geocoder.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
