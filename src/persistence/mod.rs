//! Persistence layer: SQLite storage for short links and click events.
//!
//! [`SqliteStore`] wraps a `sqlx::SqlitePool` and exposes the handful of
//! statements the services need. The schema lives in `migrations/` and is
//! embedded into the binary.

pub mod models;
pub mod sqlite;

pub use models::{ClickEvent, UrlRecord};
pub use sqlite::{PurgeOutcome, SqliteStore};
