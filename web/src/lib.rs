//! Request dispatch for the Exceptional error dashboard.
//!
//! A single entry point routes browser page loads and programmatic calls to
//! operations against an injected [`ErrorStore`](exceptional_core::ErrorStore),
//! then describes the result as HTML, JSON or a static asset.
//!
//! # Request Flow
//!
//! ```text
//! HTTP request
//!   → resource::resolve        (trailing path token, lowercased)
//!   → Dispatcher::dispatch     (method × resource → one store operation)
//!   → DispatchResponse         (status, content type, cache policy, body)
//!   → axum Response
//! ```
//!
//! # Example
//!
//! ```ignore
//! use exceptional_core::MemoryErrorStore;
//! use exceptional_web::{exceptional_router, Dispatcher};
//! use std::sync::Arc;
//!
//! let dispatcher = Arc::new(Dispatcher::new(MemoryErrorStore::new(), "/admin/errors"));
//! let app = exceptional_router(dispatcher);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod resource;
pub mod response;
pub mod router;

// Re-export key types for convenience
pub use dispatcher::{DispatchRequest, Dispatcher};
pub use error::DispatchError;
pub use pages::{DetailPage, HtmlPages, ListPage, PageRenderer};
pub use resource::{resolve, Resource};
pub use response::{CachePolicy, DispatchResponse};
pub use router::exceptional_router;

/// Result type alias for dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;
