//! Crate-level error types
//!
//! Errors surfaced by directory operations. Storage failures carry the
//! underlying store error so an at-least-once caller can decide to retry.

use crate::storage::StorageError;

/// Convenience alias for directory operation results
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Error type for directory operations
#[derive(Debug)]
pub enum DirectoryError {
    /// The directory task has shut down and can no longer accept operations
    Closed,
    /// The durable store rejected a read or write
    Storage(StorageError),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Closed => write!(f, "Directory is closed"),
            DirectoryError::Storage(e) => write!(f, "Durable store failed: {}", e),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Closed => None,
            DirectoryError::Storage(e) => Some(e),
        }
    }
}

impl From<StorageError> for DirectoryError {
    fn from(e: StorageError) -> Self {
        DirectoryError::Storage(e)
    }
}
