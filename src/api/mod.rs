//! REST API layer: route handlers, DTOs, extractors and router composition.
//!
//! Routes are mounted at the root: the redirect lives on `/{id}`, so fixed
//! paths such as `/create` and `/analytics` are reserved ids.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}

/// Builds the complete application: routes, middleware and state.
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
