//! Error identifiers and lenient identifier parsing.
//!
//! Clients send identifiers as loosely formatted text: a single `guid` form
//! or query field, or a comma-separated `ids` list. Parsing never fails a
//! request. A single identifier that does not parse degrades to
//! [`ErrorId::nil`], and an identifier list is all-or-nothing: one bad token
//! discards the whole batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier of an [`ErrorRecord`](crate::ErrorRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorId(pub Uuid);

impl ErrorId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero identifier used when client input does not parse.
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns `true` for the all-zero identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parse an identifier, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IdParseError::Empty`] for blank input and
    /// [`IdParseError::Invalid`] when the text is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, IdParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdParseError::Empty);
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|source| IdParseError::Invalid {
                token: trimmed.to_string(),
                source,
            })
    }

    /// Parse an identifier, degrading to [`ErrorId::nil`] on any failure.
    ///
    /// The store is expected to answer "not found" for the nil identifier,
    /// so a malformed id never rejects the request early.
    #[must_use]
    pub fn parse_or_nil(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|_| Self::nil())
    }
}

impl Default for ErrorId {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ErrorId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ErrorId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Failure to parse client-supplied identifier text.
#[derive(Debug, Error)]
pub enum IdParseError {
    /// Token was empty or whitespace only.
    #[error("empty identifier")]
    Empty,

    /// Token is not a valid UUID.
    #[error("invalid identifier '{token}'")]
    Invalid {
        /// Offending token (trimmed)
        token: String,
        /// Underlying UUID parse failure
        #[source]
        source: uuid::Error,
    },
}

/// Parse a comma-separated identifier list.
///
/// Order is preserved. Every token must parse; the first failure is returned
/// and no partial list is produced.
///
/// # Errors
///
/// Returns the [`IdParseError`] of the first token that does not parse,
/// including empty tokens such as those produced by a trailing comma.
pub fn parse_ids(raw: &str) -> Result<Vec<ErrorId>, IdParseError> {
    raw.split(',').map(ErrorId::parse).collect()
}

/// Parse an optional identifier list, treating failure as "no identifiers".
///
/// Absent input, empty input and malformed input all yield an empty vector,
/// which callers turn into a no-op bulk operation.
#[must_use]
pub fn parse_ids_lenient(raw: Option<&str>) -> Vec<ErrorId> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match parse_ids(raw) {
        Ok(ids) => ids,
        Err(error) => {
            tracing::debug!(error = %error, "Discarding malformed identifier list");
            Vec::new()
        }
    }
}
