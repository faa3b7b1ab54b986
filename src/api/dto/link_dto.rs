//! Link creation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::CreatedLink;

/// Request body for `POST /create`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLinkRequest {
    /// Absolute destination URL.
    pub url: String,
    /// Optional caller-chosen short id (`[A-Za-z0-9_-]`, 1-64 chars).
    #[serde(default)]
    pub custom_id: Option<String>,
}

/// Response body for `POST /create`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateLinkResponse {
    /// Public short URL.
    pub short_url: String,
    /// `true` when an earlier link for the same destination was reused.
    pub existing: bool,
    /// Creation timestamp, present only for newly created links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl From<CreatedLink> for CreateLinkResponse {
    fn from(link: CreatedLink) -> Self {
        Self {
            short_url: link.short_url,
            existing: link.existing,
            created: link.created,
        }
    }
}
