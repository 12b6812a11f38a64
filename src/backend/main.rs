/**
 * Postboard Server Entry Point
 *
 * Initializes tracing, loads configuration and serves the board API, the
 * chat relay and the client build.
 */

use postboard::backend::server::{config::ServerConfig, serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // `.env` may carry RUST_LOG, so it is read before the subscriber exists.
    let dotenv = dotenv::dotenv();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    match dotenv {
        Ok(path) => tracing::info!("[STARTUP] Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("[STARTUP] No .env file"),
        Err(e) => tracing::warn!("[STARTUP] Ignoring unreadable .env: {}", e),
    }

    let config = ServerConfig::load().map_err(|e| {
        tracing::error!("[STARTUP] Invalid configuration: {}", e);
        e
    })?;

    tracing::info!("[STARTUP] Starting server on {}", config.socket_addr());
    tracing::info!("[STARTUP] Allowed origin: {}", config.allowed_origin);

    serve(config).await?;
    Ok(())
}
