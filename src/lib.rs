//! # url-shortener
//!
//! Short links with per-redirect click analytics, served over a REST API.
//!
//! A destination URL is mapped to a short id; following the short link
//! records a click event and redirects. Click events are aggregated into
//! paginated per-link reports, and links can be purged together with all
//! their events in one transaction.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── LinkService / AnalyticsService (service/)
//!     ├── IdGenerator, ClickMetadata, report types (domain/)
//!     │
//!     └── SQLite Persistence (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
