//! Router composition.

use crate::dispatcher::Dispatcher;
use crate::handlers::dispatch_request;
use crate::pages::PageRenderer;
use axum::Router;
use exceptional_core::ErrorStore;
use std::sync::Arc;

/// Create a router that sends every request under the dispatcher's base
/// path through [`Dispatcher::dispatch`].
///
/// The dispatcher is installed as the fallback so the trailing resource can
/// be any path segment; unknown segments still reach the dashboard.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Arc::new(Dispatcher::new(MemoryErrorStore::new(), "/admin/errors"));
///
/// let app = exceptional_router(dispatcher)
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn exceptional_router<S, P>(dispatcher: Arc<Dispatcher<S, P>>) -> Router
where
    S: ErrorStore + 'static,
    P: PageRenderer + 'static,
{
    Router::new()
        .fallback(dispatch_request::<S, P>)
        .with_state(dispatcher)
}
