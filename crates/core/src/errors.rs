//! Core error types for QFinance.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use qfinance_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for QFinance.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for cache operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, csv, io) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Import or export of the flat-file cache failed.
    #[error("Cache file operation failed: {0}")]
    FileFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for the inputs of a query.
///
/// The display strings are what a spreadsheet cell shows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid ticker symbol")]
    InvalidSymbol,

    #[error("Invalid category")]
    InvalidCategory(String),

    /// The date matched none of the accepted shapes, or normalized to no date.
    #[error("Invalid date")]
    InvalidDate(String),

    /// The date value is of a type that can never be a date.
    #[error("Invalid date type or format")]
    InvalidDateFormat { value: String, kind: &'static str },

    #[error("Date must be in the past")]
    DateMustBeInPast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::InvalidSymbol.to_string(),
            "Invalid ticker symbol"
        );
        assert_eq!(
            ValidationError::InvalidCategory("bond".into()).to_string(),
            "Invalid category"
        );
        assert_eq!(
            ValidationError::InvalidDate("2018/30/11".into()).to_string(),
            "Invalid date"
        );
        assert_eq!(
            ValidationError::DateMustBeInPast.to_string(),
            "Date must be in the past"
        );
    }

    #[test]
    fn test_root_error_display() {
        // Validation errors surface their own message unchanged
        let err: Error = ValidationError::DateMustBeInPast.into();
        assert_eq!(err.to_string(), "Date must be in the past");

        let err: Error = DatabaseError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(
            err.to_string(),
            "Database operation failed: Database query failed: disk I/O error"
        );
    }
}
