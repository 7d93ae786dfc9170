//! QFinance Core - cached historical price and dividend lookups.
//!
//! This crate holds the lookup logic and the query surface a spreadsheet
//! host calls into. It is storage-agnostic: the cache is reached through
//! [`quotes::CacheStore`], implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod query;
pub mod quotes;
pub mod settings;
pub mod utils;

pub use query::{CellValue, QueryService};
pub use quotes::{build_registry, LookupService};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
