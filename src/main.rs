//! url-shortener server entry point.
//!
//! Opens the database and starts the Axum HTTP server.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use url_shortener::api;
use url_shortener::app_state::AppState;
use url_shortener::config::{LogFormat, ShortenerConfig};
use url_shortener::persistence::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ShortenerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(addr = %config.listen_addr, origin = %config.public_origin, "starting url-shortener");
    if config.api_key.is_empty() {
        tracing::warn!("API_KEY is not set; analytics endpoints will reject every request");
    }

    // Build persistence and service layers
    let store = SqliteStore::connect(&config)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;
    let app_state = AppState::new(&config, store)?;

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
