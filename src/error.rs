//! Service error types with HTTP status code mapping.
//!
//! [`ShortenerError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "short id already in use: docs",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`ShortenerError::error_code`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                  |
/// |-----------|--------------------|------------------------------|
/// | 1000–1999 | Validation / Auth  | 400 Bad Request / 401        |
/// | 2000–2999 | State / Not Found  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server             | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum ShortenerError {
    /// Malformed or missing input (bad URL, bad custom id, empty purge list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or incorrect analytics credential.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested short id is already taken.
    #[error("short id already in use: {0}")]
    Conflict(String),

    /// No short link exists for the given id.
    #[error("short link not found: {0}")]
    NotFound(String),

    /// Underlying store failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShortenerError {
    /// Wraps a storage-layer failure as [`ShortenerError::Internal`].
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::Unauthorized => 1401,
            Self::NotFound(_) => 2001,
            Self::Conflict(_) => 2002,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the caller.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ShortenerError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "request failed on storage error");
        }
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
