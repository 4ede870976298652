//! Axum entry point for the dispatcher.

use crate::dispatcher::{DispatchRequest, Dispatcher};
use crate::pages::PageRenderer;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use exceptional_core::ErrorStore;
use std::sync::Arc;

/// Decode an HTTP request and dispatch it.
///
/// Requests outside the dispatcher's base path get `404 Not Found`.
/// Dispatch faults are converted by [`DispatchError`]'s `IntoResponse`,
/// which logs them.
///
/// [`DispatchError`]: crate::DispatchError
///
/// # Endpoint
///
/// ```text
/// ANY {base_path}
/// ANY {base_path}/{resource}
/// ```
pub async fn dispatch_request<S, P>(
    State(dispatcher): State<Arc<Dispatcher<S, P>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response
where
    S: ErrorStore + 'static,
    P: PageRenderer + 'static,
{
    if !is_mounted(dispatcher.base_path(), uri.path()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let request = DispatchRequest::from_parts(method, &uri, &body);
    match dispatcher.dispatch(&request).await {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

/// Whether `path` is the base path or below it (ASCII case-insensitive).
fn is_mounted(base: &str, path: &str) -> bool {
    if base.is_empty() {
        return true;
    }

    path.get(..base.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(base))
        && matches!(path.as_bytes().get(base.len()), None | Some(b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mounted() {
        assert!(is_mounted("/admin/errors", "/admin/errors"));
        assert!(is_mounted("/admin/errors", "/admin/errors/"));
        assert!(is_mounted("/admin/errors", "/Admin/Errors/json"));
        assert!(!is_mounted("/admin/errors", "/admin/errorsx"));
        assert!(!is_mounted("/admin/errors", "/admin"));
        assert!(is_mounted("", "/anything"));
    }
}
