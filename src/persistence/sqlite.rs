//! SQLite implementation of the persistence layer.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{ClickEvent, SummaryRow, UrlRecord};
use crate::config::ShortenerConfig;
use crate::domain::{ClickMetadata, LinkSummary, ListParams};
use crate::error::ShortenerError;

/// Rows removed by a purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// Deleted `analytics` rows.
    pub clicks_deleted: u64,
    /// Deleted `urls` rows.
    pub urls_deleted: u64,
}

/// SQLite-backed store using `sqlx::SqlitePool`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store over an existing connection pool.
    ///
    /// The schema is not applied; call [`SqliteStore::migrate`].
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database named by the configuration and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] if the URL is malformed, the
    /// database cannot be opened, or a migration fails.
    pub async fn connect(config: &ShortenerConfig) -> Result<Self, ShortenerError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(ShortenerError::storage)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(ShortenerError::storage)?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// The pool holds a single connection that is never recycled, since an
    /// in-memory database lives exactly as long as its connection.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] if SQLite cannot be opened or a
    /// migration fails.
    pub async fn in_memory() -> Result<Self, ShortenerError> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(ShortenerError::storage)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(ShortenerError::storage)?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on migration failure.
    pub async fn migrate(&self) -> Result<(), ShortenerError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(ShortenerError::storage)
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Looks up a URL row by short id.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn find_url(&self, id: &str) -> Result<Option<UrlRecord>, ShortenerError> {
        sqlx::query_as::<_, UrlRecord>(
            "SELECT id, original_url, created_at FROM urls WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(ShortenerError::storage)
    }

    /// Looks up the oldest URL row whose destination matches exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn find_url_by_original(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, ShortenerError> {
        sqlx::query_as::<_, UrlRecord>(
            "SELECT id, original_url, created_at FROM urls \
             WHERE original_url = ? ORDER BY created_at ASC LIMIT 1",
        )
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(ShortenerError::storage)
    }

    /// Inserts a new URL row.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Conflict`] if the id is already taken and
    /// [`ShortenerError::Internal`] on any other database failure.
    pub async fn insert_url(&self, record: &UrlRecord) -> Result<(), ShortenerError> {
        sqlx::query("INSERT INTO urls (id, original_url, created_at) VALUES (?, ?, ?)")
            .bind(&record.id)
            .bind(&record.original_url)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    ShortenerError::Conflict(record.id.clone())
                }
                other => ShortenerError::storage(other),
            })?;
        Ok(())
    }

    /// Appends a click event and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn insert_click(
        &self,
        short_id: &str,
        meta: &ClickMetadata,
        at: DateTime<Utc>,
    ) -> Result<i64, ShortenerError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO analytics (short_id, ip, user_agent, country_code, referrer, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(short_id)
        .bind(&meta.ip)
        .bind(&meta.user_agent)
        .bind(&meta.country_code)
        .bind(&meta.referrer)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(ShortenerError::storage)
    }

    /// Groups click events by short id and returns one page of summaries.
    ///
    /// `latest_referrer` comes from an event whose timestamp equals the
    /// group maximum; among equal timestamps the pick is unspecified.
    /// `country_code` is the group `MAX`, not the latest value.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn summarize_clicks(
        &self,
        params: &ListParams,
    ) -> Result<Vec<LinkSummary>, ShortenerError> {
        let sql = format!(
            "WITH summary AS ( \
                 SELECT short_id, \
                        COUNT(*) AS click_count, \
                        MIN(timestamp) AS first_clicked, \
                        MAX(timestamp) AS last_clicked, \
                        MAX(country_code) AS country_code \
                 FROM analytics GROUP BY short_id \
             ) \
             SELECT s.short_id, u.original_url, s.click_count, s.first_clicked, s.last_clicked, \
                    (SELECT a.referrer FROM analytics a \
                     WHERE a.short_id = s.short_id AND a.timestamp = s.last_clicked \
                     LIMIT 1) AS latest_referrer, \
                    s.country_code \
             FROM summary s LEFT JOIN urls u ON u.id = s.short_id \
             ORDER BY s.last_clicked {}, s.short_id ASC \
             LIMIT ? OFFSET ?",
            params.sort.as_sql()
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(i64::from(params.limit))
            .bind(i64::try_from(params.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(ShortenerError::storage)?;

        Ok(rows.into_iter().map(LinkSummary::from).collect())
    }

    /// Counts distinct short ids that have at least one click event.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn count_clicked_ids(&self) -> Result<u64, ShortenerError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT short_id) FROM analytics")
            .fetch_one(&self.pool)
            .await
            .map_err(ShortenerError::storage)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Returns up to `limit` most recent events for a short id, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn recent_clicks(
        &self,
        short_id: &str,
        limit: u32,
    ) -> Result<Vec<ClickEvent>, ShortenerError> {
        sqlx::query_as::<_, ClickEvent>(
            "SELECT id, short_id, ip, user_agent, country_code, referrer, timestamp \
             FROM analytics WHERE short_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(short_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(ShortenerError::storage)
    }

    /// Deletes every click event and URL row for `ids` in one transaction.
    ///
    /// Unknown ids are ignored. If either delete fails, neither is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::Internal`] on database failure.
    pub async fn purge(&self, ids: &[String]) -> Result<PurgeOutcome, ShortenerError> {
        if ids.is_empty() {
            return Ok(PurgeOutcome::default());
        }

        let mut tx = self.pool.begin().await.map_err(ShortenerError::storage)?;

        let mut clicks = QueryBuilder::<Sqlite>::new("DELETE FROM analytics WHERE short_id IN (");
        let mut separated = clicks.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");
        let clicks_deleted = clicks
            .build()
            .execute(&mut *tx)
            .await
            .map_err(ShortenerError::storage)?
            .rows_affected();

        let mut urls = QueryBuilder::<Sqlite>::new("DELETE FROM urls WHERE id IN (");
        let mut separated = urls.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");
        let urls_deleted = urls
            .build()
            .execute(&mut *tx)
            .await
            .map_err(ShortenerError::storage)?
            .rows_affected();

        tx.commit().await.map_err(ShortenerError::storage)?;

        Ok(PurgeOutcome {
            clicks_deleted,
            urls_deleted,
        })
    }
}
