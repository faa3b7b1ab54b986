//! Domain layer: short id rules, click metadata and analytics report types.
//!
//! Everything here is storage-agnostic. The persistence layer produces these
//! types and the service layer hands them to the REST handlers.

pub mod analytics;
pub mod click;
pub mod short_id;

pub use analytics::{
    AnalyticsPage, ClickRecord, LinkDetail, LinkSummary, ListParams, SortOrder,
};
pub use click::ClickMetadata;
pub use short_id::IdGenerator;
