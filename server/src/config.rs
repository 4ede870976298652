//! Configuration management for the dashboard server.
//!
//! Loads configuration from environment variables with sensible defaults.

use exceptional_core::DEFAULT_MAX_RECORDS;
use exceptional_web::dispatcher::normalize_base_path;
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Mount path of the dashboard (leading slash, no trailing slash)
    pub base_path: String,
    /// Display name of the error store
    pub store_name: String,
    /// Maximum number of records retained in memory
    pub max_records: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/admin/errors".to_string(),
            store_name: "Memory".to_string(),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// - `EXCEPTIONAL_HOST` (default `0.0.0.0`)
    /// - `EXCEPTIONAL_PORT` (default `8080`)
    /// - `EXCEPTIONAL_BASE_PATH` (default `/admin/errors`)
    /// - `EXCEPTIONAL_STORE_NAME` (default `Memory`)
    /// - `EXCEPTIONAL_MAX_RECORDS` (default `200`)
    ///
    /// Unparsable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("EXCEPTIONAL_HOST").unwrap_or(defaults.host),
            port: lookup("EXCEPTIONAL_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            base_path: lookup("EXCEPTIONAL_BASE_PATH")
                .map_or(defaults.base_path, |s| normalize_base_path(&s)),
            store_name: lookup("EXCEPTIONAL_STORE_NAME").unwrap_or(defaults.store_name),
            max_records: lookup("EXCEPTIONAL_MAX_RECORDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_records),
        }
    }

    /// Socket address string to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
