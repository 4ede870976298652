//! Request dispatch.
//!
//! The dispatcher is a pure dispatch table over `(method, resource)`. Each
//! request is independent: the dispatcher holds no per-request state, takes
//! its store by injection, and returns a [`DispatchResponse`] for the host to
//! write.
//!
//! # Routes
//!
//! ## `POST`
//! - `delete` - delete the record in form field `guid`
//! - `delete-all` - delete every unprotected record
//! - `delete-list` - delete the records in form field `ids`
//! - `protect` - protect the record in form field `guid`
//! - `protect-list` - protect the records in form field `ids`
//! - anything else - plain text `Invalid POST Request`
//!
//! ## `GET`
//! - `info` - detail page for query `guid`
//! - `json` - record listing, optionally filtered by query `since`
//! - `css`, `js` - bundled assets
//! - `test` - deliberate fault
//! - anything else - dashboard list page, never cached
//!
//! Every other method is rejected with plain text and touches no store.

use crate::assets::{StaticAsset, BUNDLE_CSS, BUNDLE_JS};
use crate::error::DispatchError;
use crate::DispatchResult;
use crate::pages::{DetailPage, HtmlPages, ListPage, PageRenderer};
use crate::resource::Resource;
use crate::response::DispatchResponse;
use axum::http::{Method, Uri};
use chrono::{DateTime, Utc};
use exceptional_core::{parse_ids_lenient, ErrorId, ErrorStore};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Tracing target for dispatch operations.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Plain-text body returned for unknown `POST` resources.
pub const INVALID_POST_BODY: &str = "Invalid POST Request";

/// A decoded inbound request.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
}

impl DispatchRequest {
    /// Create a request with no parameters.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            form: HashMap::new(),
        }
    }

    /// Decode a request from its method, URI and body.
    ///
    /// The query string is always decoded. The body is decoded as an
    /// url-encoded form for `POST` regardless of `Content-Type`; a body that
    /// does not decode yields no form fields.
    #[must_use]
    pub fn from_parts(method: Method, uri: &Uri, body: &[u8]) -> Self {
        let query = decode_pairs(uri.query().unwrap_or_default().as_bytes());
        let form = if method == Method::POST {
            decode_pairs(body)
        } else {
            HashMap::new()
        };

        Self {
            method,
            path: uri.path().to_string(),
            query,
            form,
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a form field.
    #[must_use]
    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameter value.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Form field value.
    #[must_use]
    pub fn form(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }
}

/// Decode url-encoded pairs; the first occurrence of a key wins.
fn decode_pairs(raw: &[u8]) -> HashMap<String, String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(raw).unwrap_or_else(|error| {
        debug!(target: DISPATCH_TARGET, error = %error, "Ignoring undecodable parameters");
        Vec::new()
    });

    let mut decoded = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        decoded.entry(key).or_insert(value);
    }
    decoded
}

/// Parse a `since` value as whole seconds since the Unix epoch (UTC).
///
/// Negative and non-numeric values yield `None`, which is treated exactly
/// like an absent parameter. Values past the representable range clamp to
/// [`DateTime::<Utc>::MAX_UTC`] so the filter still applies.
#[must_use]
pub fn parse_since(raw: &str) -> Option<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds >= 0)
        .map(|seconds| DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::MAX_UTC))
}

/// Strip a trailing `/info` (and a single trailing slash) from a detail path.
fn detail_base_path(path: &str) -> &str {
    let path = path.strip_suffix('/').unwrap_or(path);
    let split = path.len().saturating_sub("/info".len());
    match (path.get(..split), path.get(split..)) {
        (Some(base), Some(suffix)) if suffix.eq_ignore_ascii_case("/info") => base,
        _ => path,
    }
}

/// Routes requests to error store operations.
///
/// # Example
///
/// ```ignore
/// let dispatcher = Dispatcher::new(MemoryErrorStore::new(), "/admin/errors");
/// let request = DispatchRequest::new(Method::POST, "/admin/errors/delete-all");
/// let response = dispatcher.dispatch(&request).await?;
/// assert_eq!(response.body, r#"{"result":true}"#);
/// ```
#[derive(Debug)]
pub struct Dispatcher<S, P = HtmlPages> {
    store: S,
    pages: P,
    base_path: String,
}

impl<S: ErrorStore> Dispatcher<S> {
    /// Create a dispatcher with the default page renderer.
    #[must_use]
    pub fn new(store: S, base_path: impl Into<String>) -> Self {
        Self::with_pages(store, HtmlPages, base_path)
    }
}

impl<S: ErrorStore, P: PageRenderer> Dispatcher<S, P> {
    /// Create a dispatcher with a custom page renderer.
    #[must_use]
    pub fn with_pages(store: S, pages: P, base_path: impl Into<String>) -> Self {
        Self {
            store,
            pages,
            base_path: normalize_base_path(&base_path.into()),
        }
    }

    /// The injected store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mount path used for dashboard self-links.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Dispatch one request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InjectedFault`] for `GET test`, and
    /// propagates store and serialization failures. Malformed client input
    /// is never an error.
    pub async fn dispatch(&self, request: &DispatchRequest) -> DispatchResult<DispatchResponse> {
        let resource = Resource::from_path(request.path());

        debug!(
            target: DISPATCH_TARGET,
            method = %request.method(),
            resource = resource.as_str(),
            "routing request"
        );
        metrics::counter!(
            "exceptional.dispatch.requests",
            "method" => request.method().to_string(),
            "resource" => resource.as_str()
        )
        .increment(1);

        if *request.method() == Method::POST {
            self.route_post(request, resource).await
        } else if *request.method() == Method::GET {
            self.route_get(request, resource).await
        } else {
            warn!(
                target: DISPATCH_TARGET,
                method = %request.method(),
                "rejecting unsupported request method"
            );
            Ok(DispatchResponse::text(format!(
                "Unsupported request method: {}",
                request.method()
            )))
        }
    }

    async fn route_post(
        &self,
        request: &DispatchRequest,
        resource: Resource,
    ) -> DispatchResult<DispatchResponse> {
        let guid = || ErrorId::parse_or_nil(request.form("guid").unwrap_or_default());
        let ids = || parse_ids_lenient(request.form("ids"));

        let result = match resource {
            Resource::Delete => self.store.delete(guid()).await?,
            Resource::DeleteAll => self.store.delete_all().await?,
            Resource::DeleteList => self.store.delete_many(ids()).await?,
            Resource::Protect => self.store.protect(guid()).await?,
            Resource::ProtectList => self.store.protect_many(ids()).await?,
            Resource::Info
            | Resource::Json
            | Resource::Css
            | Resource::Js
            | Resource::Test
            | Resource::Other => {
                warn!(
                    target: DISPATCH_TARGET,
                    path = request.path(),
                    "rejecting unknown POST resource"
                );
                return Ok(DispatchResponse::text(INVALID_POST_BODY));
            }
        };

        info!(
            target: DISPATCH_TARGET,
            resource = resource.as_str(),
            result,
            "store mutation completed"
        );
        Ok(DispatchResponse::envelope(result))
    }

    async fn route_get(
        &self,
        request: &DispatchRequest,
        resource: Resource,
    ) -> DispatchResult<DispatchResponse> {
        match resource {
            Resource::Info => self.info(request).await,
            Resource::Json => self.json(request).await,
            Resource::Css => Ok(Self::asset(&BUNDLE_CSS)),
            Resource::Js => Ok(Self::asset(&BUNDLE_JS)),
            Resource::Test => Err(DispatchError::InjectedFault),
            Resource::Delete
            | Resource::DeleteAll
            | Resource::DeleteList
            | Resource::Protect
            | Resource::ProtectList
            | Resource::Other => self.dashboard().await,
        }
    }

    async fn info(&self, request: &DispatchRequest) -> DispatchResult<DispatchResponse> {
        let raw = request.query("guid").unwrap_or_default();
        let id = ErrorId::parse_or_nil(raw);
        let record = if raw.is_empty() {
            None
        } else {
            self.store.get(id).await?
        };

        let markup = self.pages.render_detail(&DetailPage {
            record: record.as_ref(),
            store_name: self.store.name(),
            base_path: detail_base_path(request.path()),
            id,
        });
        Ok(DispatchResponse::page(markup))
    }

    async fn json(&self, request: &DispatchRequest) -> DispatchResult<DispatchResponse> {
        let records = match request.query("since").and_then(parse_since) {
            Some(since) => self.store.get_all_since(since).await?,
            None => self.store.get_all().await?,
        };

        Ok(DispatchResponse::json(serde_json::to_string(&records)?))
    }

    fn asset(asset: &StaticAsset) -> DispatchResponse {
        DispatchResponse::asset(asset)
    }

    async fn dashboard(&self) -> DispatchResult<DispatchResponse> {
        let records = self.store.get_all().await?;
        let markup = self.pages.render_list(&ListPage {
            store_name: self.store.name(),
            base_path: &self.base_path,
            records: &records,
        });
        Ok(DispatchResponse::page(markup).no_store())
    }
}

/// Ensure a leading slash and no trailing slash (`""` for the root).
#[must_use]
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::error::TEST_FAULT_MESSAGE;
    use crate::response::{CachePolicy, ENVELOPE_CONTENT_TYPE, HTML_CONTENT_TYPE};
    use exceptional_core::{ErrorRecord, MemoryErrorStore};
    use metrics::{
        Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use std::fmt::Write as _;
    use std::sync::{Arc, Mutex};

    /// Records every counter increment as `name label=value ...`.
    #[derive(Default)]
    struct CapturingRecorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    struct CapturedCounter {
        key: String,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl CounterFn for CapturedCounter {
        fn increment(&self, _value: u64) {
            self.seen.lock().unwrap().push(self.key.clone());
        }

        fn absolute(&self, _value: u64) {}
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let mut rendered = key.name().to_string();
            for label in key.labels() {
                let _ = write!(rendered, " {}={}", label.key(), label.value());
            }
            Counter::from_arc(Arc::new(CapturedCounter {
                key: rendered,
                seen: Arc::clone(&self.seen),
            }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn dispatcher() -> Dispatcher<MemoryErrorStore> {
        Dispatcher::new(MemoryErrorStore::new(), "/admin/errors")
    }

    #[test]
    fn test_parse_since() {
        assert_eq!(parse_since("0"), DateTime::from_timestamp(0, 0));
        assert_eq!(parse_since(" 60 "), DateTime::from_timestamp(60, 0));
        assert_eq!(parse_since("-1"), None);
        assert_eq!(parse_since("soon"), None);
        assert_eq!(parse_since(""), None);
        assert_eq!(parse_since("1.5"), None);
        assert_eq!(parse_since("99999999999999"), Some(DateTime::<Utc>::MAX_UTC));
        assert_eq!(parse_since(&i64::MAX.to_string()), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_detail_base_path() {
        assert_eq!(detail_base_path("/admin/errors/info"), "/admin/errors");
        assert_eq!(detail_base_path("/admin/errors/INFO/"), "/admin/errors");
        assert_eq!(detail_base_path("/admin/errors"), "/admin/errors");
        assert_eq!(detail_base_path("/info"), "");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("admin/errors/"), "/admin/errors");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn test_from_parts_decodes_query_and_form() {
        let uri: Uri = "/admin/errors/info?guid=abc&guid=def".parse().expect("valid uri");
        let request = DispatchRequest::from_parts(Method::POST, &uri, b"ids=a%2Cb&guid=x");
        assert_eq!(request.path(), "/admin/errors/info");
        assert_eq!(request.query("guid"), Some("abc"));
        assert_eq!(request.form("ids"), Some("a,b"));
        assert_eq!(request.form("guid"), Some("x"));
    }

    #[test]
    fn test_from_parts_ignores_get_body() {
        let uri: Uri = "/admin/errors".parse().expect("valid uri");
        let request = DispatchRequest::from_parts(Method::GET, &uri, b"guid=x");
        assert_eq!(request.form("guid"), None);
    }

    #[tokio::test]
    async fn test_unknown_post_is_rejected() {
        let response = dispatcher()
            .dispatch(&DispatchRequest::new(Method::POST, "/Admin/Errors/Foo/"))
            .await
            .expect("dispatch");
        assert_eq!(response.body, INVALID_POST_BODY);
        assert_eq!(response.content_type, HTML_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_unsupported_method_touches_nothing() {
        let dispatcher = dispatcher();
        dispatcher.store().log(ErrorRecord::new("E", "m")).await;

        let response = dispatcher
            .dispatch(&DispatchRequest::new(Method::DELETE, "/admin/errors/delete-all"))
            .await
            .expect("dispatch");
        assert_eq!(response.body, "Unsupported request method: DELETE");
        assert_eq!(dispatcher.store().len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_with_bad_guid_reports_false() {
        let dispatcher = dispatcher();
        dispatcher.store().log(ErrorRecord::new("E", "m")).await;

        let request = DispatchRequest::new(Method::POST, "/admin/errors/delete")
            .with_form("guid", "not-a-guid");
        let response = dispatcher.dispatch(&request).await.expect("dispatch");
        assert_eq!(response.body, r#"{"result":false}"#);
        assert_eq!(response.content_type, ENVELOPE_CONTENT_TYPE);
        assert_eq!(dispatcher.store().len().await, 1);
    }

    #[tokio::test]
    async fn test_get_mutation_resource_is_dashboard() {
        let response = dispatcher()
            .dispatch(&DispatchRequest::new(Method::GET, "/admin/errors/delete-all"))
            .await
            .expect("dispatch");
        assert_eq!(response.cache, CachePolicy::NoStore);
    }

    #[tokio::test]
    async fn test_test_resource_faults() {
        let result = dispatcher()
            .dispatch(&DispatchRequest::new(Method::GET, "/admin/errors/TEST"))
            .await;
        let err = result.expect_err("test route must fault");
        assert!(matches!(err, DispatchError::InjectedFault));
        assert_eq!(err.to_string(), TEST_FAULT_MESSAGE);
    }

    #[test]
    fn test_dispatch_counts_requests() {
        let recorder = CapturingRecorder::default();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let dispatcher = dispatcher();
                dispatcher
                    .dispatch(&DispatchRequest::new(Method::GET, "/admin/errors/json"))
                    .await
                    .unwrap();
                dispatcher
                    .dispatch(&DispatchRequest::new(Method::POST, "/admin/errors/delete-all"))
                    .await
                    .unwrap();
            });
        });

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "exceptional.dispatch.requests method=GET resource=json".to_string(),
                "exceptional.dispatch.requests method=POST resource=delete-all".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_post_test_resource_is_rejected_not_faulted() {
        let response = dispatcher()
            .dispatch(&DispatchRequest::new(Method::POST, "/admin/errors/test"))
            .await
            .expect("dispatch");
        assert_eq!(response.body, INVALID_POST_BODY);
    }
}
