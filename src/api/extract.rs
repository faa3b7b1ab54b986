//! Request extractors: analytics credential check and click metadata.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::ClickMetadata;
use crate::error::ShortenerError;

/// Header carrying the analytics secret as an alternative to `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request presented the configured analytics secret.
///
/// Accepts `Authorization: Bearer <key>` or `X-API-Key: <key>`. The key must
/// match exactly; an empty configured key rejects every request.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ShortenerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.api_key.is_empty() {
            tracing::warn!("analytics request rejected: no API key configured");
            return Err(ShortenerError::Unauthorized);
        }

        match presented_key(&parts.headers) {
            Some(key) if key == &*state.api_key => Ok(Self),
            Some(_) => {
                tracing::info!("analytics request rejected: key mismatch");
                Err(ShortenerError::Unauthorized)
            }
            None => Err(ShortenerError::Unauthorized),
        }
    }
}

/// Returns the credential from `Authorization: Bearer` or `X-API-Key`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()))
}

impl<S> FromRequestParts<S> for ClickMetadata
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_headers(&parts.headers, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_read() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        assert_eq!(presented_key(&headers), Some("s3cret"));
    }

    #[test]
    fn api_key_header_is_read() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("s3cret"));
        assert_eq!(presented_key(&headers), Some("s3cret"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert_eq!(presented_key(&headers), None);
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }
}
