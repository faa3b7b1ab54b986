//! Analytics service: paginated summaries, per-link detail and bulk purge.

use crate::domain::analytics::DETAIL_EVENT_LIMIT;
use crate::domain::{AnalyticsPage, ClickRecord, LinkDetail, ListParams};
use crate::error::ShortenerError;
use crate::persistence::SqliteStore;

/// Read and purge operations over recorded clicks.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    store: SqliteStore,
}

impl AnalyticsService {
    /// Creates a new `AnalyticsService`.
    #[must_use]
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Returns one page of per-link summaries ordered by `last_clicked`.
    ///
    /// `total` counts every short id with at least one click, independent of
    /// the requested page.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on storage failure.
    pub async fn list(&self, params: ListParams) -> Result<AnalyticsPage, ShortenerError> {
        let data = self.store.summarize_clicks(&params).await?;
        let total = self.store.count_clicked_ids().await?;
        Ok(AnalyticsPage {
            params,
            total,
            data,
        })
    }

    /// Returns the most recent clicks for `id`, newest first.
    ///
    /// An id without clicks or without a URL row is not an error: the report
    /// is simply empty and `original_url` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on storage failure.
    pub async fn detail(&self, id: &str) -> Result<LinkDetail, ShortenerError> {
        let clicks = self.store.recent_clicks(id, DETAIL_EVENT_LIMIT).await?;
        let original_url = self.store.find_url(id).await?.map(|r| r.original_url);
        Ok(LinkDetail {
            id: id.to_string(),
            original_url,
            clicks: clicks.into_iter().map(ClickRecord::from).collect(),
        })
    }

    /// Removes the URL rows and all click events for `ids` atomically.
    ///
    /// Ids that do not exist are ignored. The input is echoed back without
    /// checking what was actually deleted.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidInput`] if `ids` is empty.
    /// - [`ShortenerError::Internal`] on storage failure; nothing is deleted.
    pub async fn purge(&self, ids: Vec<String>) -> Result<Vec<String>, ShortenerError> {
        if ids.is_empty() {
            return Err(ShortenerError::InvalidInput(
                "ids must be a non-empty array".to_string(),
            ));
        }

        let outcome = self.store.purge(&ids).await?;
        tracing::info!(
            requested = ids.len(),
            urls_deleted = outcome.urls_deleted,
            clicks_deleted = outcome.clicks_deleted,
            "links purged"
        );
        Ok(ids)
    }
}
