//! Error types for buckets.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The main error type for bucket operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The database file could not be opened or created
    #[error("couldn't open {}: {source}", .path.display())]
    Open {
        /// Path of the database file
        path: PathBuf,
        /// Engine error reported while opening
        #[source]
        source: redb::DatabaseError,
    },

    /// Another handle kept the database file locked for longer than the timeout
    #[error("couldn't open {}: file still locked after {timeout:?}", .path.display())]
    LockTimeout {
        /// Path of the database file
        path: PathBuf,
        /// How long the open waited
        timeout: Duration,
    },

    /// Storage engine error
    #[error("storage error: {0}")]
    Storage(#[source] redb::Error),

    /// The named bucket does not exist
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Invalid input (key, value or bucket name)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The database has been closed
    #[error("database is closed")]
    Closed,

    /// The global log subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// A lock was poisoned (internal error)
    #[error("lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns true when the error came from opening the database file.
    pub fn is_open_error(&self) -> bool {
        matches!(self, Error::Open { .. } | Error::LockTimeout { .. })
    }

    /// Returns true when the error reports a missing bucket.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::BucketNotFound(_))
    }
}

impl From<redb::Error> for Error {
    fn from(err: redb::Error) -> Self {
        match err {
            redb::Error::TableDoesNotExist(name) => Error::BucketNotFound(name),
            other => Error::Storage(other),
        }
    }
}

impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        match err {
            redb::TableError::TableDoesNotExist(name) => Error::BucketNotFound(name),
            other => Error::Storage(other.into()),
        }
    }
}

impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Error::Storage(err.into())
    }
}

/// A specialized `Result` type for bucket operations.
pub type Result<T> = std::result::Result<T, Error>;
