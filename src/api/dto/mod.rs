//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names match the public JSON contract exactly; domain types are
//! converted into these at the handler boundary.

pub mod analytics_dto;
pub mod link_dto;

pub use analytics_dto::*;
pub use link_dto::*;
