//! Link service: short id allocation and click recording.

use chrono::{DateTime, Utc};

use crate::domain::short_id::{validate_custom_id, validate_original_url};
use crate::domain::{ClickMetadata, IdGenerator};
use crate::error::ShortenerError;
use crate::persistence::{SqliteStore, UrlRecord};

/// Result of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    /// Short id under which the destination is reachable.
    pub id: String,
    /// Public short URL (`origin/id`).
    pub short_url: String,
    /// `true` when an earlier link for the same destination was returned.
    pub existing: bool,
    /// Creation time, set only when a new row was written.
    pub created: Option<DateTime<Utc>>,
}

/// Allocates short ids and records redirects.
///
/// Holds no mutable state besides the id generator; every call is a short
/// sequence of independent store round trips.
#[derive(Debug)]
pub struct LinkService {
    store: SqliteStore,
    ids: IdGenerator,
    public_origin: String,
}

impl LinkService {
    /// Creates a new `LinkService`.
    ///
    /// `public_origin` is used verbatim as the prefix of issued short URLs.
    #[must_use]
    pub fn new(store: SqliteStore, ids: IdGenerator, public_origin: impl Into<String>) -> Self {
        Self {
            store,
            ids,
            public_origin: public_origin.into(),
        }
    }

    /// Builds the public short URL for `id`.
    #[must_use]
    pub fn short_url(&self, id: &str) -> String {
        format!("{}/{id}", self.public_origin)
    }

    /// Shortens `original_url`, optionally under a caller-chosen id.
    ///
    /// Without `custom_id`, an existing row for the exact same destination is
    /// returned with `existing = true`. The lookup and the insert are not
    /// atomic, so two concurrent requests may both create a row for the same
    /// destination. With `custom_id`, a taken id is a conflict and no
    /// destination lookup happens. An empty `custom_id` counts as absent.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidInput`] for a malformed URL or custom id.
    /// - [`ShortenerError::Conflict`] if the id is already in use, including
    ///   a random id colliding at insert time.
    /// - [`ShortenerError::Internal`] on storage failure.
    pub async fn create_link(
        &self,
        original_url: &str,
        custom_id: Option<&str>,
    ) -> Result<CreatedLink, ShortenerError> {
        validate_original_url(original_url)?;
        let custom_id = custom_id.filter(|id| !id.is_empty());
        if let Some(id) = custom_id {
            validate_custom_id(id)?;
        }

        let id = match custom_id {
            Some(id) => {
                if self.store.find_url(id).await?.is_some() {
                    tracing::debug!(short_id = id, "custom id already taken");
                    return Err(ShortenerError::Conflict(id.to_string()));
                }
                id.to_string()
            }
            None => {
                if let Some(existing) = self.store.find_url_by_original(original_url).await? {
                    tracing::debug!(short_id = %existing.id, "reusing link for destination");
                    return Ok(CreatedLink {
                        short_url: self.short_url(&existing.id),
                        id: existing.id,
                        existing: true,
                        created: None,
                    });
                }
                self.ids.generate()
            }
        };

        let record = UrlRecord {
            id,
            original_url: original_url.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_url(&record).await?;

        tracing::info!(short_id = %record.id, custom = custom_id.is_some(), "link created");
        Ok(CreatedLink {
            short_url: self.short_url(&record.id),
            id: record.id,
            existing: false,
            created: Some(record.created_at),
        })
    }

    /// Resolves `id` and records one click event before returning the
    /// destination.
    ///
    /// The event write completes before this returns.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::NotFound`] if no link exists for `id`; nothing is
    ///   recorded.
    /// - [`ShortenerError::Internal`] on storage failure.
    pub async fn record_click(
        &self,
        id: &str,
        meta: &ClickMetadata,
    ) -> Result<String, ShortenerError> {
        let Some(record) = self.store.find_url(id).await? else {
            return Err(ShortenerError::NotFound(id.to_string()));
        };

        let event_id = self.store.insert_click(&record.id, meta, Utc::now()).await?;
        tracing::debug!(short_id = id, event_id, "click recorded");

        Ok(record.original_url)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ID_ALPHABET;

    async fn make_service(seed: u64) -> LinkService {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store");
        };
        let Ok(ids) = IdGenerator::new(DEFAULT_ID_ALPHABET, 7, Some(seed)) else {
            panic!("valid generator");
        };
        LinkService::new(store, ids, "https://sho.rt")
    }

    #[tokio::test]
    async fn create_generates_seeded_id() {
        let service = make_service(7).await;
        let Ok(expected) = IdGenerator::new(DEFAULT_ID_ALPHABET, 7, Some(7)) else {
            panic!("valid generator");
        };

        let Ok(link) = service.create_link("https://example.com", None).await else {
            panic!("create failed");
        };
        assert_eq!(link.id, expected.generate());
        assert_eq!(link.short_url, format!("https://sho.rt/{}", link.id));
        assert!(!link.existing);
        assert!(link.created.is_some());
    }

    #[tokio::test]
    async fn same_destination_is_deduplicated() {
        let service = make_service(1).await;
        let Ok(first) = service.create_link("https://example.com", None).await else {
            panic!("create failed");
        };
        let Ok(second) = service.create_link("https://example.com", None).await else {
            panic!("create failed");
        };
        assert_eq!(first.short_url, second.short_url);
        assert!(second.existing);
        assert!(second.created.is_none());

        let Ok(count) = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM urls WHERE original_url = 'https://example.com'",
        )
        .fetch_one(service.store.pool())
        .await
        else {
            panic!("count failed");
        };
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn distinct_destinations_get_distinct_ids() {
        let service = make_service(3).await;
        let mut seen = std::collections::HashSet::new();
        for i in 0..20 {
            let Ok(link) = service
                .create_link(&format!("https://example.com/{i}"), None)
                .await
            else {
                panic!("create failed");
            };
            assert!(!link.existing);
            assert!(seen.insert(link.id));
        }
    }

    #[tokio::test]
    async fn custom_id_conflict_keeps_original() {
        let service = make_service(1).await;
        let Ok(link) = service.create_link("https://a.example", Some("docs")).await else {
            panic!("create failed");
        };
        assert_eq!(link.short_url, "https://sho.rt/docs");

        let result = service.create_link("https://b.example", Some("docs")).await;
        assert!(matches!(result, Err(ShortenerError::Conflict(_))));

        let Ok(Some(record)) = service.store.find_url("docs").await else {
            panic!("record missing");
        };
        assert_eq!(record.original_url, "https://a.example");
    }

    #[tokio::test]
    async fn custom_id_skips_destination_dedup() {
        let service = make_service(1).await;
        let Ok(_) = service.create_link("https://a.example", None).await else {
            panic!("setup create");
        };
        let Ok(link) = service.create_link("https://a.example", Some("alias")).await else {
            panic!("create failed");
        };
        assert!(!link.existing);
        assert_eq!(link.id, "alias");
    }

    #[tokio::test]
    async fn empty_custom_id_is_treated_as_absent() {
        let service = make_service(1).await;
        let Ok(link) = service.create_link("https://a.example", Some("")).await else {
            panic!("create failed");
        };
        assert_eq!(link.id.len(), 7);
    }

    #[tokio::test]
    async fn random_collision_is_conflict() {
        let service = make_service(5).await;
        let Ok(peek) = IdGenerator::new(DEFAULT_ID_ALPHABET, 7, Some(5)) else {
            panic!("valid generator");
        };
        let next = peek.generate();
        let Ok(_) = service.create_link("https://first.example", Some(&next)).await else {
            panic!("setup create");
        };

        let result = service.create_link("https://second.example", None).await;
        assert!(matches!(result, Err(ShortenerError::Conflict(id)) if id == next));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let service = make_service(1).await;
        assert!(matches!(
            service.create_link("not a url", None).await,
            Err(ShortenerError::InvalidInput(_))
        ));
        assert!(matches!(
            service.create_link("https://a.example", Some("bad id")).await,
            Err(ShortenerError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn record_click_returns_destination_and_writes_event() {
        let service = make_service(1).await;
        let Ok(_) = service.create_link("https://a.example", Some("go")).await else {
            panic!("setup create");
        };
        let meta = ClickMetadata {
            ip: "198.51.100.1".to_string(),
            user_agent: "agent".to_string(),
            referrer: "https://ref.example".to_string(),
            country_code: "NL".to_string(),
        };

        let Ok(target) = service.record_click("go", &meta).await else {
            panic!("redirect failed");
        };
        assert_eq!(target, "https://a.example");

        let Ok(events) = service.store.recent_clicks("go", 10).await else {
            panic!("detail failed");
        };
        assert_eq!(events.len(), 1);
        let Some(event) = events.first() else {
            panic!("event missing");
        };
        assert_eq!(event.ip, meta.ip);
        assert_eq!(event.user_agent, meta.user_agent);
        assert_eq!(event.referrer, meta.referrer);
        assert_eq!(event.country_code, meta.country_code);
    }

    #[tokio::test]
    async fn record_click_unknown_id_writes_nothing() {
        let service = make_service(1).await;
        let result = service
            .record_click("missing", &ClickMetadata::default())
            .await;
        assert!(matches!(result, Err(ShortenerError::NotFound(_))));

        let Ok(total) = service.store.count_clicked_ids().await else {
            panic!("count failed");
        };
        assert_eq!(total, 0);
    }
}
