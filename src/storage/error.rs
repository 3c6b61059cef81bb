//! Key/value storage error types
//!
//! Defines all errors that can occur while reading or writing persisted
//! client state.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in a key/value store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store file exists but does not hold a string map
    #[error("Corrupt store file {path:?}: {reason}")]
    Corruption { path: PathBuf, reason: String },

    /// Store is not reachable at all (used by stores without a backing medium)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
