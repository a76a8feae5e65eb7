//! Error types for role definition persistence
//!
//! Only failures that would lose administrator edits surface through these
//! types. Corrupt stored data and backend read failures are recovered inside
//! the store.

use thiserror::Error;

/// Key-value backend error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error from a file-backed store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be represented by the backend
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for key-value backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Role definition store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key-value backend failed
    #[error("Persistence failure: {0}")]
    Storage(#[from] StorageError),

    /// Definitions could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored definitions changed since they were loaded
    #[error("Role definitions changed since load (expected revision {expected}, found {actual})")]
    Conflict {
        /// Revision the caller loaded.
        expected: u64,
        /// Revision currently persisted.
        actual: u64,
    },
}

/// Result type for role definition store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Check if retrying after a fresh load can succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Storage(_) => "PERSISTENCE_FAILURE",
            StoreError::Serialization(_) => "SERIALIZATION_ERROR",
            StoreError::Conflict { .. } => "REVISION_CONFLICT",
        }
    }
}
