//! Cache storage traits.
//!
//! The lookup layer talks to the persistent cache only through
//! [`CacheStore`], so the SQLite backend can be swapped for an in-memory
//! fake in tests. One store instance exists per record family.

use super::model::{CacheKey, CacheRecord, DividendRecord, PriceRecord};
use crate::errors::Result;

// =============================================================================
// Cache Store
// =============================================================================

/// Storage interface for one family of cached records.
///
/// Implementations load their full contents at open time, so `get` is a
/// memory read. `put` must be durable once it returns.
///
/// # Duplicate Keys
///
/// A second `put` for a key that is already present overwrites the stored
/// record (last write wins).
pub trait CacheStore<R: CacheRecord>: Send + Sync {
    /// Returns the record stored under `key`, or `None` when absent.
    fn get(&self, key: &CacheKey) -> Result<Option<R>>;

    /// Inserts or replaces the record under its own key.
    fn put(&self, record: R) -> Result<()>;

    /// Number of records currently held.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every record, ordered by key.
    fn records(&self) -> Result<Vec<R>>;
}

/// Store for daily price records.
pub type PriceCacheStore = dyn CacheStore<PriceRecord>;

/// Store for trailing dividend totals.
pub type DividendCacheStore = dyn CacheStore<DividendRecord>;
