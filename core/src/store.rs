//! Error store trait.

use crate::id::ErrorId;
use crate::record::ErrorRecord;
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by an [`ErrorStore`].
///
/// Request handling does not retry or recover these; they surface to the
/// host as server errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage could not be reached.
    #[error("Error store unavailable: {0}")]
    Unavailable(String),

    /// Storage rejected or failed the operation.
    #[error("Error store operation failed: {0}")]
    OperationFailed(String),

    /// Internal error (e.g. lock poisoned).
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Error store.
///
/// This trait abstracts over error persistence (memory, SQL, ...). The
/// dispatcher receives an implementation at construction and never reaches
/// into process-wide state.
///
/// # Implementation Notes
///
/// - All operations are asynchronous and must not block a worker thread
/// - Implementations own their concurrency safety; concurrent deletes and
///   protects against the same record may arrive in any order
/// - Unknown identifiers (including [`ErrorId::nil`]) report `false` or
///   `None`, never an error
pub trait ErrorStore: Send + Sync {
    /// Display name shown on rendered pages.
    fn name(&self) -> &str;

    /// Get one record.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn get(&self, id: ErrorId) -> impl Future<Output = Result<Option<ErrorRecord>>> + Send;

    /// Get all records, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ErrorRecord>>> + Send;

    /// Get all records created at or after `since`, newest first.
    ///
    /// The default filters [`get_all`](Self::get_all); stores with an index
    /// on creation date should override it.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn get_all_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<ErrorRecord>>> + Send {
        async move {
            let records = self.get_all().await?;
            Ok(records
                .into_iter()
                .filter(|record| record.creation_date >= since)
                .collect())
        }
    }

    /// Delete one record.
    ///
    /// # Returns
    ///
    /// `true` if a record was deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn delete(&self, id: ErrorId) -> impl Future<Output = Result<bool>> + Send;

    /// Delete many records.
    ///
    /// # Returns
    ///
    /// `true` if at least one record was deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn delete_many(&self, ids: Vec<ErrorId>) -> impl Future<Output = Result<bool>> + Send;

    /// Delete every unprotected record.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn delete_all(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Mark one record protected.
    ///
    /// # Returns
    ///
    /// `true` if the record exists.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn protect(&self, id: ErrorId) -> impl Future<Output = Result<bool>> + Send;

    /// Mark many records protected.
    ///
    /// # Returns
    ///
    /// `true` if at least one record exists.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage fails.
    fn protect_many(&self, ids: Vec<ErrorId>) -> impl Future<Output = Result<bool>> + Send;
}
