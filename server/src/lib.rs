//! Standalone HTTP server for the Exceptional error dashboard.
//!
//! Serves an in-memory error store through the request dispatcher.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod config;

pub use config::ServerConfig;
