//! Request metadata captured for each recorded redirect.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Client metadata stored with a click event.
///
/// Every field is an empty string when the request does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickMetadata {
    /// Client IP address.
    pub ip: String,
    /// `User-Agent` header.
    pub user_agent: String,
    /// `Referer` header.
    pub referrer: String,
    /// Two-letter country code supplied by the edge proxy.
    pub country_code: String,
}

impl ClickMetadata {
    /// Extracts click metadata from request headers.
    ///
    /// The client IP prefers `CF-Connecting-IP`, then the first
    /// `X-Forwarded-For` hop, then `X-Real-IP`, then `peer`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let ip = header_str(headers, "cf-connecting-ip")
            .or_else(|| {
                header_str(headers, "x-forwarded-for")
                    .and_then(|v| v.split(',').next())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
            })
            .or_else(|| header_str(headers, "x-real-ip"))
            .map(str::to_string)
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_default();

        let country_code = header_str(headers, "cf-ipcountry")
            .or_else(|| header_str(headers, "x-country-code"))
            .unwrap_or_default()
            .to_string();

        Self {
            ip,
            user_agent: header_str(headers, "user-agent")
                .unwrap_or_default()
                .to_string(),
            referrer: header_str(headers, "referer")
                .unwrap_or_default()
                .to_string(),
            country_code,
        }
    }
}

/// Returns a header as trimmed UTF-8, skipping empty or non-UTF-8 values.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn empty_request_yields_empty_strings() {
        let meta = ClickMetadata::from_headers(&HeaderMap::new(), None);
        assert_eq!(meta, ClickMetadata::default());
    }

    #[test]
    fn reads_standard_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.5"));
        headers.insert("referer", HeaderValue::from_static("https://news.site/"));
        headers.insert("cf-ipcountry", HeaderValue::from_static("DE"));
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.9"));

        let meta = ClickMetadata::from_headers(&headers, None);
        assert_eq!(meta.user_agent, "curl/8.5");
        assert_eq!(meta.referrer, "https://news.site/");
        assert_eq!(meta.country_code, "DE");
        assert_eq!(meta.ip, "203.0.113.9");
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        let meta = ClickMetadata::from_headers(&headers, None);
        assert_eq!(meta.ip, "198.51.100.7");
    }

    #[test]
    fn peer_address_is_last_resort() {
        let peer = SocketAddr::from(([192, 0, 2, 1], 55000));
        let meta = ClickMetadata::from_headers(&HeaderMap::new(), Some(peer));
        assert_eq!(meta.ip, "192.0.2.1");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        let meta = ClickMetadata::from_headers(&headers, Some(peer));
        assert_eq!(meta.ip, "10.0.0.2");
    }
}
