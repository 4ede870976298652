//! In-memory error store.

use crate::id::ErrorId;
use crate::record::ErrorRecord;
use crate::store::{ErrorStore, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default number of records retained.
pub const DEFAULT_MAX_RECORDS: usize = 200;

/// In-memory error store.
///
/// Records are kept newest first. When more than `max_records` are logged the
/// oldest unprotected records are evicted; protected records are never
/// evicted. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryErrorStore {
    name: String,
    max_records: usize,
    records: Arc<RwLock<Vec<ErrorRecord>>>,
}

impl MemoryErrorStore {
    /// Create an empty store with the default retention.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity("Memory", DEFAULT_MAX_RECORDS)
    }

    /// Create an empty store with a display name and retention cap.
    #[must_use]
    pub fn with_capacity(name: impl Into<String>, max_records: usize) -> Self {
        Self {
            name: name.into(),
            max_records,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Store a record.
    ///
    /// Records are ordered by creation date, newest first.
    pub async fn log(&self, record: ErrorRecord) {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|existing| existing.creation_date <= record.creation_date)
            .unwrap_or(records.len());
        tracing::debug!(id = %record.id, type_name = %record.type_name, "Logging error record");
        records.insert(position, record);

        let mut excess = records.len().saturating_sub(self.max_records);
        while excess > 0 {
            let Some(oldest) = records.iter().rposition(|r| !r.is_protected) else {
                break;
            };
            records.remove(oldest);
            excess -= 1;
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryErrorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorStore for MemoryErrorStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, id: ErrorId) -> impl Future<Output = Result<Option<ErrorRecord>>> + Send {
        let records = Arc::clone(&self.records);

        async move {
            let records = records.read().await;
            Ok(records.iter().find(|r| r.id == id).cloned())
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ErrorRecord>>> + Send {
        let records = Arc::clone(&self.records);

        async move { Ok(records.read().await.clone()) }
    }

    fn delete(&self, id: ErrorId) -> impl Future<Output = Result<bool>> + Send {
        let records = Arc::clone(&self.records);

        async move {
            let mut records = records.write().await;
            let before = records.len();
            records.retain(|r| r.id != id);
            Ok(records.len() < before)
        }
    }

    fn delete_many(&self, ids: Vec<ErrorId>) -> impl Future<Output = Result<bool>> + Send {
        let records = Arc::clone(&self.records);

        async move {
            if ids.is_empty() {
                return Ok(false);
            }
            let mut records = records.write().await;
            let before = records.len();
            records.retain(|r| !ids.contains(&r.id));
            Ok(records.len() < before)
        }
    }

    fn delete_all(&self) -> impl Future<Output = Result<bool>> + Send {
        let records = Arc::clone(&self.records);

        async move {
            records.write().await.retain(|r| r.is_protected);
            Ok(true)
        }
    }

    fn protect(&self, id: ErrorId) -> impl Future<Output = Result<bool>> + Send {
        self.protect_many(vec![id])
    }

    fn protect_many(&self, ids: Vec<ErrorId>) -> impl Future<Output = Result<bool>> + Send {
        let records = Arc::clone(&self.records);

        async move {
            let mut records = records.write().await;
            let mut found = false;
            for record in records.iter_mut().filter(|r| ids.contains(&r.id)) {
                record.is_protected = true;
                found = true;
            }
            Ok(found)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record_at(minutes_ago: i64) -> ErrorRecord {
        ErrorRecord::new("TestError", "boom")
            .with_creation_date(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_get_all_newest_first() {
        let store = MemoryErrorStore::new();
        let old = record_at(10);
        let new = record_at(1);
        store.log(old.clone()).await;
        store.log(new.clone()).await;

        let all = store.get_all().await.expect("get_all");
        assert_eq!(all, vec![new, old]);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = MemoryErrorStore::new();
        store.log(record_at(0)).await;
        assert!(store.get(ErrorId::nil()).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_get_all_since_is_inclusive() {
        let store = MemoryErrorStore::new();
        let boundary = record_at(5);
        store.log(record_at(10)).await;
        store.log(boundary.clone()).await;
        store.log(record_at(1)).await;

        let since = store
            .get_all_since(boundary.creation_date)
            .await
            .expect("get_all_since");
        assert_eq!(since.len(), 2);
        assert!(since.iter().any(|r| r.id == boundary.id));
    }

    #[tokio::test]
    async fn test_delete_reports_outcome() {
        let store = MemoryErrorStore::new();
        let record = record_at(0);
        store.log(record.clone()).await;

        assert!(store.delete(record.id).await.expect("delete"));
        assert!(!store.delete(record.id).await.expect("delete again"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_many_empty_is_false() {
        let store = MemoryErrorStore::new();
        store.log(record_at(0)).await;
        assert!(!store.delete_many(Vec::new()).await.expect("delete_many"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_all_keeps_protected() {
        let store = MemoryErrorStore::new();
        let keep = record_at(0).protected(true);
        store.log(keep.clone()).await;
        store.log(record_at(1)).await;

        assert!(store.delete_all().await.expect("delete_all"));
        let remaining = store.get_all().await.expect("get_all");
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn test_protect_many() {
        let store = MemoryErrorStore::new();
        let a = record_at(0);
        let b = record_at(1);
        store.log(a.clone()).await;
        store.log(b.clone()).await;

        assert!(store.protect_many(vec![a.id, ErrorId::new()]).await.expect("protect"));
        assert!(store.get(a.id).await.expect("get").expect("exists").is_protected);
        assert!(!store.get(b.id).await.expect("get").expect("exists").is_protected);
        assert!(!store.protect(ErrorId::nil()).await.expect("protect nil"));
    }

    #[tokio::test]
    async fn test_retention_evicts_oldest_unprotected() {
        let store = MemoryErrorStore::with_capacity("Memory", 2);
        let oldest = record_at(30).protected(true);
        let middle = record_at(20);
        store.log(oldest.clone()).await;
        store.log(middle.clone()).await;
        store.log(record_at(10)).await;

        let all = store.get_all().await.expect("get_all");
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|r| r.id == oldest.id));
        assert!(all.iter().all(|r| r.id != middle.id));
    }

    #[tokio::test]
    async fn test_concurrent_protect_and_delete() {
        let store = MemoryErrorStore::new();
        let record = record_at(0);
        store.log(record.clone()).await;

        let (protected, deleted) = tokio::join!(store.protect(record.id), store.delete(record.id));
        assert!(deleted.expect("delete"));
        protected.expect("protect");
        assert!(store.is_empty().await);
    }
}
