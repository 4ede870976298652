//! Captured error records.

use crate::id::ErrorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single captured error.
///
/// Records are owned by an [`ErrorStore`](crate::ErrorStore). Request
/// handling never mutates them directly; it only invokes store operations.
/// JSON field names follow the `PascalCase` wire format consumed by existing
/// dashboard clients, with the identifier exposed as `GUID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorRecord {
    /// Unique identifier.
    #[serde(rename = "GUID")]
    pub id: ErrorId,

    /// Application that raised the error.
    pub application_name: String,

    /// Host machine that raised the error.
    pub machine_name: String,

    /// When the error was captured (UTC).
    pub creation_date: DateTime<Utc>,

    /// Error type name (e.g. `std::io::Error`).
    #[serde(rename = "Type")]
    pub type_name: String,

    /// Short human-readable message.
    pub message: String,

    /// Full detail, typically a backtrace.
    pub detail: Option<String>,

    /// Component or module that raised the error.
    pub source: Option<String>,

    /// Request host header, when captured during a request.
    pub host: Option<String>,

    /// Request URL, when captured during a request.
    pub url: Option<String>,

    /// Request HTTP method, when captured during a request.
    #[serde(rename = "HTTPMethod")]
    pub http_method: Option<String>,

    /// Client address, when captured during a request.
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,

    /// HTTP status code returned to the client, if any.
    pub status_code: Option<u16>,

    /// Number of identical errors rolled up into this record.
    pub duplicate_count: u32,

    /// Protected records are excluded from bulk and automatic deletion.
    pub is_protected: bool,
}

impl ErrorRecord {
    /// Create a record captured now with a fresh identifier.
    #[must_use]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: ErrorId::new(),
            application_name: String::new(),
            machine_name: String::new(),
            creation_date: Utc::now(),
            type_name: type_name.into(),
            message: message.into(),
            detail: None,
            source: None,
            host: None,
            url: None,
            http_method: None,
            ip_address: None,
            status_code: None,
            duplicate_count: 1,
            is_protected: false,
        }
    }

    /// Set the identifier.
    #[must_use]
    pub const fn with_id(mut self, id: ErrorId) -> Self {
        self.id = id;
        self
    }

    /// Set the capture timestamp.
    #[must_use]
    pub const fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = creation_date;
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn with_application(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = application_name.into();
        self
    }

    /// Set the machine name.
    #[must_use]
    pub fn with_machine(mut self, machine_name: impl Into<String>) -> Self {
        self.machine_name = machine_name.into();
        self
    }

    /// Set the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach request context.
    #[must_use]
    pub fn with_request(
        mut self,
        http_method: impl Into<String>,
        url: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        self.http_method = Some(http_method.into());
        self.url = Some(url.into());
        self.status_code = status_code;
        self
    }

    /// Set the protected flag.
    #[must_use]
    pub const fn protected(mut self, is_protected: bool) -> Self {
        self.is_protected = is_protected;
        self
    }
}
