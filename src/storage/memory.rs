//! In-memory store backend
//!
//! Keeps the record behind a shared handle so tests (and callers that
//! spawned a directory) can inspect what was persisted or inject write
//! failures. Clones share the same record.

use std::sync::{Arc, Mutex};

use super::{DirectoryRecord, DirectoryStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    record: DirectoryRecord,
    saves: u64,
    fail_writes: bool,
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a record
    pub fn with_record(record: DirectoryRecord) -> Self {
        let store = Self::new();
        store.lock().record = record;
        store
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Get a copy of the last persisted record
    pub fn record(&self) -> DirectoryRecord {
        self.lock().record.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

impl DirectoryStore for MemoryStore {
    async fn load(&mut self) -> Result<DirectoryRecord, StorageError> {
        Ok(self.record())
    }

    async fn save(&mut self, record: &DirectoryRecord) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("write failure injected".into()));
        }

        inner.record = record.clone();
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Item;

    #[tokio::test]
    async fn test_roundtrip() {
        let mut store = MemoryStore::new();

        let record = DirectoryRecord {
            counter: 4,
            feed: vec![Item::new("a", 0)],
        };
        store.save(&record).await.unwrap();

        assert_eq!(store.load().await.unwrap(), record);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mut store = MemoryStore::new();
        let observer_side = store.clone();

        store
            .save(&DirectoryRecord {
                counter: 9,
                feed: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(observer_side.record().counter, 9);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);

        let result = store.save(&DirectoryRecord::default()).await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(store.save_count(), 0);

        store.set_fail_writes(false);
        store.save(&DirectoryRecord::default()).await.unwrap();
        assert_eq!(store.save_count(), 1);
    }
}
