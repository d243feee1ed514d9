//! Storage-specific error types for the in-memory store.
//!
//! These errors are internal to the storage layer and are converted to
//! `papertrade_core::Error` before being returned to callers.

use papertrade_core::errors::{DatabaseError, Error};
use std::sync::PoisonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Snapshot is inconsistent: {0}")]
    InconsistentSnapshot(String),
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(err: PoisonError<T>) -> Self {
        StorageError::LockPoisoned(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::SerializationError(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::InconsistentSnapshot(e) => {
                Error::Database(DatabaseError::Internal(format!("inconsistent snapshot: {}", e)))
            }
        }
    }
}
