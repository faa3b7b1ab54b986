//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The resulting [`ShortenerConfig`] is
//! passed explicitly into the services at construction time.

use std::net::SocketAddr;

use anyhow::{Context, ensure};

/// Default alphabet for generated short ids.
pub const DEFAULT_ID_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated short ids.
pub const DEFAULT_ID_LENGTH: usize = 7;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ShortenerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// SQLite connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Public origin prepended to issued short URLs, without trailing slash.
    pub public_origin: String,

    /// Shared secret guarding the analytics endpoints. Empty disables access.
    pub api_key: String,

    /// Length of generated short ids.
    pub id_length: usize,

    /// Alphabet generated short ids are drawn from.
    pub id_alphabet: String,

    /// Optional seed making id generation deterministic.
    pub id_seed: Option<u64>,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ShortenerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], or if the short id settings are unusable.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://shortener.db".to_string());

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Self {
            listen_addr,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            public_origin: trim_origin(&public_origin),
            api_key: std::env::var("API_KEY").unwrap_or_default(),
            id_length: parse_env("SHORT_ID_LENGTH", DEFAULT_ID_LENGTH),
            id_alphabet: std::env::var("SHORT_ID_ALPHABET")
                .unwrap_or_else(|_| DEFAULT_ID_ALPHABET.to_string()),
            id_seed: std::env::var("SHORT_ID_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that cannot fall back to a default.
    ///
    /// # Errors
    ///
    /// Returns an error if the id length is zero or the alphabet is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.id_length > 0, "SHORT_ID_LENGTH must be at least 1");
        ensure!(
            !self.id_alphabet.is_empty(),
            "SHORT_ID_ALPHABET must not be empty"
        );
        Ok(())
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: "sqlite://shortener.db".to_string(),
            database_max_connections: 10,
            database_min_connections: 1,
            database_connect_timeout_secs: 5,
            public_origin: "http://localhost:3000".to_string(),
            api_key: String::new(),
            id_length: DEFAULT_ID_LENGTH,
            id_alphabet: DEFAULT_ID_ALPHABET.to_string(),
            id_seed: None,
            log_format: LogFormat::Pretty,
        }
    }
}

/// Strips trailing slashes so `origin + "/" + id` never doubles up.
fn trim_origin(origin: &str) -> String {
    origin.trim_end_matches('/').to_string()
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
