//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ShortenerConfig;
use crate::domain::IdGenerator;
use crate::persistence::SqliteStore;
use crate::service::{AnalyticsService, LinkService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Short id allocation and redirects.
    pub link_service: Arc<LinkService>,
    /// Click reports and purge.
    pub analytics_service: Arc<AnalyticsService>,
    /// Secret expected on analytics requests.
    pub api_key: Arc<str>,
}

impl AppState {
    /// Wires the services from configuration and an opened store.
    ///
    /// # Errors
    ///
    /// Returns an error if the short id settings are unusable.
    pub fn new(config: &ShortenerConfig, store: SqliteStore) -> anyhow::Result<Self> {
        let ids = IdGenerator::new(&config.id_alphabet, config.id_length, config.id_seed)?;
        Ok(Self {
            link_service: Arc::new(LinkService::new(
                store.clone(),
                ids,
                config.public_origin.as_str(),
            )),
            analytics_service: Arc::new(AnalyticsService::new(store)),
            api_key: Arc::from(config.api_key.as_str()),
        })
    }
}
