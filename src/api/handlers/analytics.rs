//! Analytics handlers: listing, per-link detail and purge.
//!
//! Every route here requires the API key (see [`RequireApiKey`]).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    AnalyticsListResponse, AnalyticsQuery, LinkDetailResponse, PurgeRequest, PurgeResponse,
};
use crate::api::extract::RequireApiKey;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ShortenerError};

/// `GET /analytics`: Paginated click summaries.
///
/// # Errors
///
/// Returns [`ShortenerError::Unauthorized`] without a valid key, or
/// [`ShortenerError::Internal`] on storage failure.
#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Analytics",
    summary = "List click summaries",
    description = "One row per short id with at least one click, ordered by last click. `total` counts all such ids regardless of page.",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Page of summaries", body = AnalyticsListResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
    )
)]
pub async fn list_analytics(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, ShortenerError> {
    let page = state.analytics_service.list(query.to_params()).await?;
    Ok(Json(AnalyticsListResponse::from(page)))
}

/// `GET /analytics/{id}`: Recent clicks for one short id.
///
/// # Errors
///
/// Returns [`ShortenerError::Unauthorized`] without a valid key, or
/// [`ShortenerError::Internal`] on storage failure.
#[utoipa::path(
    get,
    path = "/analytics/{id}",
    tag = "Analytics",
    summary = "Click detail for a short id",
    description = "Up to 1000 most recent clicks, newest first. `click_count` is the number of clicks returned.",
    params(
        ("id" = String, Path, description = "Short id"),
    ),
    responses(
        (status = 200, description = "Click detail", body = LinkDetailResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
    )
)]
pub async fn link_analytics(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ShortenerError> {
    let detail = state.analytics_service.detail(&id).await?;
    Ok(Json(LinkDetailResponse::from(detail)))
}

/// `DELETE /analytics`: Purge links and their clicks.
///
/// # Errors
///
/// Returns [`ShortenerError::Unauthorized`] without a valid key,
/// [`ShortenerError::InvalidInput`] for a missing or empty `ids` array, or
/// [`ShortenerError::Internal`] on storage failure.
#[utoipa::path(
    delete,
    path = "/analytics",
    tag = "Analytics",
    summary = "Purge short links",
    description = "Deletes the URL rows and all click events for the given ids in one transaction. Unknown ids are ignored.",
    request_body = PurgeRequest,
    responses(
        (status = 200, description = "Purge applied", body = PurgeResponse),
        (status = 400, description = "Missing or empty ids", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
    )
)]
pub async fn purge_analytics(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    body: Result<Json<PurgeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ShortenerError> {
    let Json(req) = body.map_err(|e| ShortenerError::InvalidInput(e.body_text()))?;
    let ids = state.analytics_service.purge(req.ids).await?;
    Ok(Json(PurgeResponse { success: true, ids }))
}

/// Analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(list_analytics).delete(purge_analytics))
        .route("/analytics/{id}", get(link_analytics))
}
