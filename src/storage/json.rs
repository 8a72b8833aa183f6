//! JSON-file store backend
//!
//! Persists the two directory records as separate files in one directory:
//! `feed.json` (ordered item array) and `counter.json` (bare integer).
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write leaves the previous record intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::directory::Item;

use super::{DirectoryRecord, DirectoryStore, StorageError};

const FEED_FILE: &str = "feed.json";
const COUNTER_FILE: &str = "counter.json";

/// File-backed store keeping one directory instance's records
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created on first `load`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the store's root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn feed_path(&self) -> PathBuf {
        self.dir.join(FEED_FILE)
    }

    fn counter_path(&self) -> PathBuf {
        self.dir.join(COUNTER_FILE)
    }

    async fn read_or_default<T>(path: &Path, default: T) -> Result<T, StorageError>
    where
        T: serde::de::DeserializeOwned,
    {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(default),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<(), StorageError> {
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

impl DirectoryStore for JsonFileStore {
    async fn load(&mut self) -> Result<DirectoryRecord, StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let feed: Vec<Item> = Self::read_or_default(&self.feed_path(), Vec::new()).await?;
        let counter: u32 = Self::read_or_default(&self.counter_path(), 0).await?;

        Ok(DirectoryRecord { counter, feed })
    }

    async fn save(&mut self, record: &DirectoryRecord) -> Result<(), StorageError> {
        Self::write_atomic(&self.feed_path(), serde_json::to_vec(&record.feed)?).await?;
        Self::write_atomic(&self.counter_path(), serde_json::to_vec(&record.counter)?).await?;
        Ok(())
    }
}
