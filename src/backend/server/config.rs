/**
 * Server Configuration
 *
 * Loads the server's settings and opens the optional PostgreSQL pool.
 *
 * # Configuration Sources
 *
 * Later sources override earlier ones:
 *
 * 1. Built-in defaults, suitable for local development
 * 2. A TOML file, if `POSTBOARD_CONFIG` names one
 * 3. Environment variables (a `.env` file is loaded first if present)
 *
 * | Variable              | TOML key               | Default                  |
 * |-----------------------|------------------------|--------------------------|
 * | `HOST`                | `host`                 | `0.0.0.0`                |
 * | `PORT`                | `port`                 | `8080`                   |
 * | `DATABASE_URL`        | `database_url`         | none                     |
 * | `ALLOWED_ORIGIN`      | `allowed_origin`       | `http://localhost:3000`  |
 * | `STATIC_DIR`          | `static_dir`           | `client/build`           |
 * | `GEOCODE_BASE_URL`    | `geocode.base_url`     | `https://dapi.kakao.com` |
 * | `GEOCODE_API_KEY`     | `geocode.api_key`      | none                     |
 * | `GEOCODE_AUTH_SCHEME` | `geocode.auth_scheme`  | `KakaoAK`                |
 *
 * `MONGO_URI` is read as a fallback for `DATABASE_URL` so existing
 * deployment environments keep working.
 *
 * # Error Handling
 *
 * Malformed values are configuration errors and stop startup. A database
 * that is configured but unreachable is not: the pool connects lazily, the
 * failure is logged, and the server runs without persistence until the
 * database comes back.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderValue;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "POSTBOARD_CONFIG";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_STATIC_DIR: &str = "client/build";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://dapi.kakao.com";
pub const DEFAULT_GEOCODE_AUTH_SCHEME: &str = "KakaoAK";

/// Geocoding provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeConfig {
    pub base_url: String,
    /// Lookups answer 503 while this is unset
    pub api_key: Option<String>,
    /// Prefix of the `Authorization` header value
    pub auth_scheme: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            api_key: None,
            auth_scheme: DEFAULT_GEOCODE_AUTH_SCHEME.to_string(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// PostgreSQL connection string; `None` runs without persistence
    pub database_url: Option<String>,
    /// The single origin allowed by CORS and the WebSocket handshake
    pub allowed_origin: String,
    /// Directory holding the built client
    pub static_dir: PathBuf,
    pub geocode: GeocodeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database_url: None,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            geocode: GeocodeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from defaults, the optional TOML file and the
    /// process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = Self::builder();
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            builder = builder.merge_file(Path::new(&path))?;
        }
        builder.merge_env(|key| std::env::var(key).ok())?.build()
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The allowed origin as a header value
    pub fn allowed_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin).map_err(|_| ConfigError::InvalidValue {
            key: "ALLOWED_ORIGIN",
            value: self.allowed_origin.clone(),
        })
    }
}

/// Builder for ServerConfig
///
/// Every setter overrides whatever an earlier source provided.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<IpAddr>,
    port: Option<u16>,
    database_url: Option<String>,
    allowed_origin: Option<String>,
    static_dir: Option<PathBuf>,
    geocode_base_url: Option<String>,
    geocode_api_key: Option<String>,
    geocode_auth_scheme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    database_url: Option<String>,
    allowed_origin: Option<String>,
    static_dir: Option<PathBuf>,
    geocode: Option<FileGeocodeConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileGeocodeConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    auth_scheme: Option<String>,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = Some(host);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = Some(origin.into());
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn geocode_base_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_base_url = Some(url.into());
        self
    }

    pub fn geocode_api_key(mut self, key: impl Into<String>) -> Self {
        self.geocode_api_key = Some(key.into());
        self
    }

    pub fn geocode_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.geocode_auth_scheme = Some(scheme.into());
        self
    }

    /// Apply settings from a TOML file
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&text)
    }

    /// Apply settings from TOML text
    pub fn merge_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;

        self.host = file.host.or(self.host);
        self.port = file.port.or(self.port);
        self.database_url = file.database_url.or(self.database_url);
        self.allowed_origin = file.allowed_origin.or(self.allowed_origin);
        self.static_dir = file.static_dir.or(self.static_dir);
        if let Some(geocode) = file.geocode {
            self.geocode_base_url = geocode.base_url.or(self.geocode_base_url);
            self.geocode_api_key = geocode.api_key.or(self.geocode_api_key);
            self.geocode_auth_scheme = geocode.auth_scheme.or(self.geocode_auth_scheme);
        }
        Ok(self)
    }

    /// Apply settings from environment-style lookups
    ///
    /// Empty values count as unset.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("HOST") {
            self.host = Some(parse_value("HOST", &value)?);
        }
        if let Some(value) = get("PORT") {
            self.port = Some(parse_value("PORT", &value)?);
        }
        if let Some(url) = get("DATABASE_URL").or_else(|| get("MONGO_URI")) {
            self.database_url = Some(url);
        }
        if let Some(origin) = get("ALLOWED_ORIGIN") {
            self.allowed_origin = Some(origin);
        }
        if let Some(dir) = get("STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get("GEOCODE_BASE_URL") {
            self.geocode_base_url = Some(url);
        }
        if let Some(key) = get("GEOCODE_API_KEY") {
            self.geocode_api_key = Some(key);
        }
        if let Some(scheme) = get("GEOCODE_AUTH_SCHEME") {
            self.geocode_auth_scheme = Some(scheme);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url,
            allowed_origin: self
                .allowed_origin
                .map(|origin| origin.trim_end_matches('/').to_string())
                .unwrap_or(defaults.allowed_origin),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            geocode: GeocodeConfig {
                base_url: self
                    .geocode_base_url
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.geocode.base_url),
                api_key: self.geocode_api_key,
                auth_scheme: self.geocode_auth_scheme.unwrap_or(defaults.geocode.auth_scheme),
            },
        };
        config.allowed_origin_header()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Open the database pool and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` when a database URL is configured. The pool connects
///   lazily, so an unreachable database only shows up as failing queries.
/// - `None` when no URL is configured or it cannot be parsed
///
/// Migration failures are logged and startup continues.
pub async fn load_database(config: &ServerConfig) -> Option<PgPool> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing; database requests fail until it is reachable");
        }
    }

    Some(pool)
}
