//! Service layer: business logic orchestration.
//!
//! [`LinkService`] allocates short ids and records redirects;
//! [`AnalyticsService`] builds click reports and purges links. Both talk to
//! the [`crate::persistence::SqliteStore`] they were constructed with.

pub mod analytics_service;
pub mod link_service;

pub use analytics_service::AnalyticsService;
pub use link_service::{CreatedLink, LinkService};
