//! Link handlers: create and redirect.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateLinkRequest, CreateLinkResponse};
use crate::app_state::AppState;
use crate::domain::ClickMetadata;
use crate::error::{ErrorResponse, ShortenerError};

/// `POST /create`: Shorten a URL.
///
/// # Errors
///
/// Returns [`ShortenerError`] on an invalid body, a taken custom id, or a
/// storage failure.
#[utoipa::path(
    post,
    path = "/create",
    tag = "Links",
    summary = "Shorten a URL",
    description = "Issues a short URL for the destination. Without `custom_id`, a destination that was already shortened returns its existing short URL with `existing: true`.",
    request_body = CreateLinkRequest,
    responses(
        (status = 200, description = "Short URL issued or reused", body = CreateLinkResponse),
        (status = 400, description = "Invalid URL or custom id", body = ErrorResponse),
        (status = 409, description = "Custom id already in use", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_link(
    State(state): State<AppState>,
    body: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ShortenerError> {
    let Json(req) = body.map_err(|e| ShortenerError::InvalidInput(e.body_text()))?;

    let link = state
        .link_service
        .create_link(&req.url, req.custom_id.as_deref())
        .await?;

    Ok(Json(CreateLinkResponse::from(link)))
}

/// `GET /{id}`: Follow a short link.
///
/// # Errors
///
/// Returns [`ShortenerError::NotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Links",
    summary = "Follow a short link",
    description = "Records a click with the request metadata, then redirects to the destination with 302 Found.",
    params(
        ("id" = String, Path, description = "Short id"),
    ),
    responses(
        (status = 302, description = "Redirect to the destination"),
        (status = 404, description = "Unknown short id", body = ErrorResponse),
    )
)]
pub async fn redirect(
    State(state): State<AppState>,
    Path(id): Path<String>,
    meta: ClickMetadata,
) -> Result<impl IntoResponse, ShortenerError> {
    let target = state.link_service.record_click(&id, &meta).await?;
    Ok((StatusCode::FOUND, [(LOCATION, target)]))
}

/// Link routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_link))
        .route("/{id}", get(redirect))
}
