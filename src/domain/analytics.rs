//! Analytics report types: list parameters, per-link summaries and
//! per-link click detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default page size of the analytics listing.
pub const DEFAULT_LIMIT: u32 = 50;

/// Largest page size of the analytics listing.
pub const MAX_LIMIT: u32 = 500;

/// Upper bound on events returned by the detail report.
pub const DETAIL_EVENT_LIMIT: u32 = 1000;

/// Direction in which summaries are ordered by `last_clicked`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest activity first.
    Asc,
    /// Most recent activity first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses a query value. Anything except `asc` means [`SortOrder::Desc`].
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized paging parameters for the analytics listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    /// 1-indexed page number.
    pub page: u32,
    /// Rows per page, within `1..=MAX_LIMIT`.
    pub limit: u32,
    /// Ordering of `last_clicked`.
    pub sort: SortOrder,
}

impl ListParams {
    /// Builds parameters from raw values, applying defaults and clamping.
    ///
    /// `page` below 1 becomes 1; `limit` is clamped to `[1, MAX_LIMIT]`.
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>, sort: SortOrder) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = limit
            .unwrap_or(i64::from(DEFAULT_LIMIT))
            .clamp(1, i64::from(MAX_LIMIT));
        Self {
            page: u32::try_from(page).unwrap_or(1),
            limit: u32::try_from(limit).unwrap_or(DEFAULT_LIMIT),
            sort,
        }
    }

    /// Rows to skip before the current page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(None, None, SortOrder::Desc)
    }
}

/// Aggregated click statistics for one short id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    /// Short id the events belong to.
    pub short_id: String,
    /// Destination, if the URL row still exists.
    pub original_url: Option<String>,
    /// Total number of events.
    pub click_count: u64,
    /// Earliest event timestamp.
    pub first_clicked: DateTime<Utc>,
    /// Latest event timestamp.
    pub last_clicked: DateTime<Utc>,
    /// Referrer of an event stamped exactly `last_clicked`. When several
    /// events share that timestamp, which one wins is unspecified.
    pub latest_referrer: Option<String>,
    /// Lexicographically largest country code over all events, not the most
    /// recent one.
    pub country_code: String,
}

/// One page of link summaries plus the overall count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsPage {
    /// Parameters the page was computed with.
    pub params: ListParams,
    /// Number of distinct short ids with at least one event.
    pub total: u64,
    /// Summaries on this page.
    pub data: Vec<LinkSummary>,
}

/// A single recorded click as shown in the detail report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    /// When the redirect happened.
    pub timestamp: DateTime<Utc>,
    /// Client IP.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
    /// Referrer header.
    pub referrer: String,
    /// Country code.
    pub country_code: String,
}

/// Click detail for one short id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDetail {
    /// Requested short id.
    pub id: String,
    /// Destination, if the URL row still exists.
    pub original_url: Option<String>,
    /// Most recent events, newest first, at most [`DETAIL_EVENT_LIMIT`].
    pub clicks: Vec<ClickRecord>,
}

impl LinkDetail {
    /// Number of events in this report. Under-counts once more than
    /// [`DETAIL_EVENT_LIMIT`] events exist.
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let params = ListParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.sort, SortOrder::Desc);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let params = ListParams::new(Some(0), Some(0), SortOrder::Asc);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);

        let params = ListParams::new(Some(-4), Some(10_000), SortOrder::Asc);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, MAX_LIMIT);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let params = ListParams::new(Some(3), Some(20), SortOrder::Desc);
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn sort_parsing_is_lenient() {
        assert_eq!(SortOrder::parse_lenient(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient(None), SortOrder::Desc);
    }

    #[test]
    fn sort_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SortOrder::Asc).ok().as_deref(),
            Some("\"asc\"")
        );
    }
}
