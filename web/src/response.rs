//! Response descriptors.
//!
//! The dispatcher never writes to an output stream. Each route returns a
//! [`DispatchResponse`] describing status, content type, caching and body,
//! and the host converts it into an HTTP response.

use crate::assets::StaticAsset;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::borrow::Cow;

/// Content type of the mutation result envelope.
pub const ENVELOPE_CONTENT_TYPE: &str = "text/javascript";

/// Content type of the JSON record listing.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of rendered pages and plain-text rejections.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Caching directive for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Leave caching to the host.
    #[default]
    Default,
    /// Suppress caching entirely (`no-cache, no-store`).
    NoStore,
}

/// Structured response produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Caching directive.
    pub cache: CachePolicy,
    /// Response body.
    pub body: Cow<'static, str>,
}

impl DispatchResponse {
    /// Create a 200 response with the given content type and body.
    #[must_use]
    pub fn new(content_type: &'static str, body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            cache: CachePolicy::Default,
            body: body.into(),
        }
    }

    /// Mutation result envelope: exactly `{"result":true}` or `{"result":false}`.
    #[must_use]
    pub fn envelope(result: bool) -> Self {
        let body = if result {
            r#"{"result":true}"#
        } else {
            r#"{"result":false}"#
        };
        Self::new(ENVELOPE_CONTENT_TYPE, body)
    }

    /// Serialized JSON body.
    #[must_use]
    pub fn json(body: String) -> Self {
        Self::new(JSON_CONTENT_TYPE, body)
    }

    /// Rendered page markup.
    #[must_use]
    pub fn page(markup: String) -> Self {
        Self::new(HTML_CONTENT_TYPE, markup)
    }

    /// Literal text served with the default `text/html` content type.
    #[must_use]
    pub fn text(body: impl Into<Cow<'static, str>>) -> Self {
        Self::new(HTML_CONTENT_TYPE, body)
    }

    /// Bundled asset served with its declared MIME type.
    #[must_use]
    pub fn asset(asset: &StaticAsset) -> Self {
        Self::new(asset.mime_type, asset.content)
    }

    /// Suppress caching of this response.
    #[must_use]
    pub const fn no_store(mut self) -> Self {
        self.cache = CachePolicy::NoStore;
        self
    }
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body.into_owned(),
        )
            .into_response();

        if self.cache == CachePolicy::NoStore {
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::assets::BUNDLE_CSS;

    #[test]
    fn test_envelope_shape() {
        assert_eq!(DispatchResponse::envelope(true).body, r#"{"result":true}"#);
        assert_eq!(DispatchResponse::envelope(false).body, r#"{"result":false}"#);
        assert_eq!(
            DispatchResponse::envelope(true).content_type,
            ENVELOPE_CONTENT_TYPE
        );
    }

    #[test]
    fn test_envelope_is_valid_json() {
        let value: serde_json::Value =
            serde_json::from_str(&DispatchResponse::envelope(true).body).expect("valid json");
        assert_eq!(value, serde_json::json!({"result": true}));
    }

    #[test]
    fn test_asset_uses_declared_mime() {
        let response = DispatchResponse::asset(&BUNDLE_CSS);
        assert_eq!(response.content_type, BUNDLE_CSS.mime_type);
        assert_eq!(response.body, BUNDLE_CSS.content);
    }

    #[test]
    fn test_no_store_headers() {
        let response = DispatchResponse::page("<html></html>".to_string())
            .no_store()
            .into_response();

        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store");
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::CONTENT_TYPE], HTML_CONTENT_TYPE);
    }

    #[test]
    fn test_default_cache_has_no_headers() {
        let response = DispatchResponse::text("Invalid POST Request").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }
}
