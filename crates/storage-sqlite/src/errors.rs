//! Storage-specific error types for SQLite operations.
//!
//! These wrap Diesel, r2d2 and csv errors and convert them to the
//! database-agnostic types defined in `qfinance_core`.

use diesel::result::Error as DieselError;
use thiserror::Error;

use qfinance_core::errors::{DatabaseError, Error};

/// Storage-specific errors.
///
/// Internal to the storage layer; converted to `qfinance_core::Error`
/// before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Stored value is corrupt: {0}")]
    CorruptRecord(String),

    #[error("Cache file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let db_error = match err {
            StorageError::ConnectionFailed(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::PoolError(e) => DatabaseError::PoolCreationFailed(e.to_string()),
            StorageError::QueryFailed(e) => DatabaseError::QueryFailed(e.to_string()),
            StorageError::CorruptRecord(e) => DatabaseError::Internal(e),
            StorageError::Csv(e) => DatabaseError::FileFailed(e.to_string()),
            StorageError::Io(e) => DatabaseError::FileFailed(e.to_string()),
        };
        Error::Database(db_error)
    }
}

/// Extension trait for converting storage results to core results.
///
/// Provides `.into_core()` on any `Result<T, E>` whose error converts into
/// [`StorageError`].
pub trait IntoCore<T> {
    fn into_core(self) -> qfinance_core::Result<T>;
}

impl<T, E> IntoCore<T> for std::result::Result<T, E>
where
    E: Into<StorageError>,
{
    fn into_core(self) -> qfinance_core::Result<T> {
        self.map_err(|e| Error::from(e.into()))
    }
}
