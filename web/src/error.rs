//! Error types for request dispatch.
//!
//! Malformed client input never becomes an error; it degrades to a nil
//! identifier, an empty identifier list, or a plain-text rejection. The only
//! failures that leave the dispatcher are store faults, serialization
//! faults, and the deliberate fault raised by the `test` resource.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use exceptional_core::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Message carried by the deliberate `test` fault.
pub const TEST_FAULT_MESSAGE: &str =
    "This is a test. Please disregard. If this were a real emergency, it'd have a different message.";

/// Faults that propagate out of the dispatcher to the host.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Deliberate fault used to verify the host's error pipeline end to end.
    #[error("{}", TEST_FAULT_MESSAGE)]
    InjectedFault,

    /// The error store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Record listing could not be serialized.
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DispatchError {
    /// HTTP status reported to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InjectedFault | Self::Store(_) | Self::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error code for clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InjectedFault => "TEST_FAULT",
            Self::Store(_) => "STORE_ERROR",
            Self::Serialize(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::error!(
            status = %status,
            code = self.code(),
            error = %self,
            "Unhandled dispatch fault"
        );

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
