//! HTTP request handlers.

pub mod dispatch;

pub use dispatch::dispatch_request;
