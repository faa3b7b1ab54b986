//! Database models for short links and click events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClickRecord, LinkSummary};

/// A stored row from the `urls` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UrlRecord {
    /// Short id (primary key).
    pub id: String,
    /// Destination URL exactly as submitted.
    pub original_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A stored row from the `analytics` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClickEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Short id the redirect resolved.
    pub short_id: String,
    /// Client IP.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
    /// Country code.
    pub country_code: String,
    /// Referrer header.
    pub referrer: String,
    /// Write timestamp.
    pub timestamp: DateTime<Utc>,
}

impl From<ClickEvent> for ClickRecord {
    fn from(event: ClickEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            ip: event.ip,
            user_agent: event.user_agent,
            referrer: event.referrer,
            country_code: event.country_code,
        }
    }
}

/// One grouped row of the analytics listing query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct SummaryRow {
    pub short_id: String,
    pub original_url: Option<String>,
    pub click_count: i64,
    pub first_clicked: DateTime<Utc>,
    pub last_clicked: DateTime<Utc>,
    pub latest_referrer: Option<String>,
    pub country_code: Option<String>,
}

impl From<SummaryRow> for LinkSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            short_id: row.short_id,
            original_url: row.original_url,
            click_count: u64::try_from(row.click_count).unwrap_or(0),
            first_clicked: row.first_clicked,
            last_clicked: row.last_clicked,
            latest_referrer: row.latest_referrer,
            country_code: row.country_code.unwrap_or_default(),
        }
    }
}
