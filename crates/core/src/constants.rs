/// Cell text when no data source has a value
pub const NOT_AVAILABLE: &str = "N/A";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the SQLite cache inside the cache directory
pub const CACHE_DB_FILE_NAME: &str = "qfinance.db";
