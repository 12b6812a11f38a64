//! Common test utilities and helpers
//!
//! - building a config and an in-memory `AppState`
//! - running the router on a real socket for WebSocket tests
//! - waiting for the relay to register connections
//! - `database`: fixtures for tests that need a real PostgreSQL

#![allow(dead_code)]

pub mod database;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use postboard::backend::chat::{ChatRelay, MemoryMessageStore};
use postboard::backend::routes::create_router;
use postboard::backend::server::{AppState, ServerConfig};

pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Config pointing at a static dir that does not need to exist
pub fn test_config() -> ServerConfig {
    config_with_static_dir(Path::new("/nonexistent/client/build"))
}

pub fn config_with_static_dir(dir: &Path) -> ServerConfig {
    ServerConfig::builder()
        .allowed_origin(TEST_ORIGIN)
        .static_dir(dir)
        .build()
        .unwrap()
}

/// App state with no database and an in-memory message store
pub fn memory_state(config: ServerConfig) -> (AppState, MemoryMessageStore) {
    let store = MemoryMessageStore::new();
    let state = AppState::new(config, None, Arc::new(store.clone()));
    (state, store)
}

/// Serve the router on an ephemeral local port
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Poll until the relay has exactly `count` members
pub async fn wait_for_members(relay: &ChatRelay, count: usize) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while relay.group().len() != count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(
        waited.is_ok(),
        "expected {} members, found {}",
        count,
        relay.group().len()
    );
}
