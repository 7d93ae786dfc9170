//! Quotes module: cached price and dividend lookups.
//!
//! - [`model`]: cached record shapes and the compound cache key
//! - [`store`]: the storage trait implemented by the SQLite crate
//! - [`category`]: category tag normalization
//! - [`sources`]: the per-category provider priority table
//! - [`client`]: provider registry bootstrap from settings
//! - [`lookup`]: cache-then-providers orchestration

pub mod category;
pub mod client;
pub mod lookup;
pub mod model;
pub mod sources;
pub mod store;

#[cfg(test)]
mod lookup_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use category::{normalize_category, SourceCategory};
pub use client::build_registry;
pub use lookup::LookupService;
pub use model::{CacheKey, CacheRecord, DividendRecord, PriceField, PriceRecord};
pub use sources::SourcePriorityTable;
pub use store::{CacheStore, DividendCacheStore, PriceCacheStore};
