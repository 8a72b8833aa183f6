//! Durable storage for directory state
//!
//! The directory's durable state is exactly two named records: the recent
//! feed (bounded, ordered) and the live counter (single integer). They are
//! loaded once when a directory is spawned and written after each
//! successful mutation, before any broadcast goes out. The observer
//! registry is deliberately not part of the record — it is volatile and
//! rebuilt by live replicas re-registering.
//!
//! Backends implement [`DirectoryStore`]; [`JsonFileStore`] persists to
//! JSON files on disk, [`MemoryStore`] keeps the record in memory for
//! tests and ephemeral deployments.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::directory::Item;

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// The durable records of one directory instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Live client counter
    pub counter: u32,
    /// Recent feed items, oldest first
    pub feed: Vec<Item>,
}

/// Load/save interface for the directory's durable records
///
/// Implementations are free to pick a layout as long as a `save` followed
/// by a `load` round-trips the record. `load` on a backend with no prior
/// state returns the default (empty) record, not an error.
pub trait DirectoryStore: Send + Sync + 'static {
    /// Load the durable record
    fn load(&mut self) -> impl Future<Output = Result<DirectoryRecord, StorageError>> + Send;

    /// Write the durable record
    fn save(
        &mut self,
        record: &DirectoryRecord,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Error type for store operations
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem error
    Io(std::io::Error),
    /// Record (de)serialization error
    Serde(serde_json::Error),
    /// Backend rejected the operation
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
            StorageError::Serde(e) => write!(f, "Record serialization error: {}", e),
            StorageError::Unavailable(reason) => write!(f, "Store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serde(e) => Some(e),
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serde(e)
    }
}
