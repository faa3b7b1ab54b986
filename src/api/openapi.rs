//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::api::handlers::{analytics, links, system};

/// OpenAPI description of the public HTTP surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "url-shortener",
        description = "Short links with per-redirect click analytics."
    ),
    paths(
        links::create_link,
        links::redirect,
        analytics::list_analytics,
        analytics::link_analytics,
        analytics::purge_analytics,
        system::health_handler,
    ),
    tags(
        (name = "Links", description = "Create and follow short links"),
        (name = "Analytics", description = "Click reports and purge (API key required)"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap_or_default();
        for path in ["/create", "/{id}", "/analytics", "/analytics/{id}", "/health"] {
            assert!(doc["paths"].get(path).is_some(), "missing {path}");
        }
    }
}
