//! SQLite storage for the QFinance cache.
//!
//! Implements the `CacheStore` trait from `qfinance-core` for both record
//! families. This is the only crate with Diesel dependencies.
//!
//! ```text
//! core (lookup) ──CacheStore──▶ storage-sqlite ──▶ qfinance.db
//!                                     │
//!                                     └──▶ symbol_date.csv / ttmdividends.csv
//! ```

pub mod cache;
pub mod db;
pub mod errors;
pub mod schema;

pub use cache::{CacheStats, DividendCacheRepository, PriceCacheRepository, SqliteCache};
pub use db::{create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool};
pub use errors::{IntoCore, StorageError};

pub use qfinance_core::errors::{DatabaseError, Error, Result};
