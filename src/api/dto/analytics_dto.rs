//! Analytics listing, detail and purge DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AnalyticsPage, ClickRecord, LinkDetail, LinkSummary, ListParams, SortOrder};

/// Query parameters for `GET /analytics`.
///
/// Values are taken as raw strings and normalized leniently: anything
/// unparseable falls back to its default.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Page number (1-indexed). Defaults to 1.
    pub page: Option<String>,
    /// Rows per page, clamped to 1..=500. Defaults to 50.
    pub limit: Option<String>,
    /// `asc` or `desc` by last click. Defaults to `desc`.
    pub sort: Option<String>,
}

impl AnalyticsQuery {
    /// Normalizes the raw query into [`ListParams`].
    #[must_use]
    pub fn to_params(&self) -> ListParams {
        ListParams::new(
            parse_int(self.page.as_deref()),
            parse_int(self.limit.as_deref()),
            SortOrder::parse_lenient(self.sort.as_deref()),
        )
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// One row of the analytics listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LinkSummaryDto {
    /// Short id.
    pub short_id: String,
    /// Destination, `null` once the link was deleted.
    pub original_url: Option<String>,
    /// Number of recorded clicks.
    pub click_count: u64,
    /// Earliest click.
    pub first_clicked: DateTime<Utc>,
    /// Latest click.
    pub last_clicked: DateTime<Utc>,
    /// Referrer of the latest click.
    pub latest_referrer: Option<String>,
    /// Representative country code (largest value seen).
    pub country_code: String,
}

impl From<LinkSummary> for LinkSummaryDto {
    fn from(s: LinkSummary) -> Self {
        Self {
            short_id: s.short_id,
            original_url: s.original_url,
            click_count: s.click_count,
            first_clicked: s.first_clicked,
            last_clicked: s.last_clicked,
            latest_referrer: s.latest_referrer,
            country_code: s.country_code,
        }
    }
}

/// Response body for `GET /analytics`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsListResponse {
    /// Current page.
    pub page: u32,
    /// Page size actually used.
    pub limit: u32,
    /// Sort direction actually used.
    pub sort: SortOrder,
    /// Distinct short ids with at least one click.
    pub total: u64,
    /// Summaries on this page.
    pub data: Vec<LinkSummaryDto>,
}

impl From<AnalyticsPage> for AnalyticsListResponse {
    fn from(page: AnalyticsPage) -> Self {
        Self {
            page: page.params.page,
            limit: page.params.limit,
            sort: page.params.sort,
            total: page.total,
            data: page.data.into_iter().map(LinkSummaryDto::from).collect(),
        }
    }
}

/// One click in the detail report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClickDto {
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

impl From<ClickRecord> for ClickDto {
    fn from(c: ClickRecord) -> Self {
        Self {
            timestamp: c.timestamp,
            ip: c.ip,
            user_agent: c.user_agent,
            referrer: c.referrer,
            country_code: c.country_code,
        }
    }
}

/// Response body for `GET /analytics/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LinkDetailResponse {
    /// Requested short id.
    pub id: String,
    /// Destination, `null` if the link does not exist.
    pub original_url: Option<String>,
    /// Number of clicks in `analytics` (capped at 1000).
    pub click_count: usize,
    /// Most recent clicks, newest first.
    pub analytics: Vec<ClickDto>,
}

impl From<LinkDetail> for LinkDetailResponse {
    fn from(detail: LinkDetail) -> Self {
        Self {
            click_count: detail.click_count(),
            id: detail.id,
            original_url: detail.original_url,
            analytics: detail.clicks.into_iter().map(ClickDto::from).collect(),
        }
    }
}

/// Request body for `DELETE /analytics`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PurgeRequest {
    /// Short ids to remove.
    pub ids: Vec<String>,
}

/// Response body for `DELETE /analytics`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurgeResponse {
    /// Always `true` on a 200 response.
    pub success: bool,
    /// The requested ids, echoed back.
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_falls_back_on_garbage() {
        let query = AnalyticsQuery {
            page: Some("abc".to_string()),
            limit: Some("-3".to_string()),
            sort: Some("ASC".to_string()),
        };
        let params = query.to_params();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);
        assert_eq!(params.sort, SortOrder::Asc);
    }

    #[test]
    fn empty_query_uses_defaults() {
        assert_eq!(AnalyticsQuery::default().to_params(), ListParams::default());
    }
}
