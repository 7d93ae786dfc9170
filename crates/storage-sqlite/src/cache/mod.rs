//! Cache repositories and maintenance.

mod csv_io;
mod dividend_repository;
mod memory;
mod model;
mod price_repository;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::Serialize;

use qfinance_core::quotes::CacheStore;
use qfinance_core::Result;

pub use csv_io::{DIVIDEND_FILE_NAME, IMPORT_SOURCE, PRICE_FILE_NAME};
pub use dividend_repository::DividendCacheRepository;
pub use model::{DividendCacheDB, PriceCacheDB};
pub use price_repository::PriceCacheRepository;

use crate::db;
use crate::errors::IntoCore;

/// Record counts per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub prices: usize,
    pub dividends: usize,
}

/// Both cache stores over one database.
pub struct SqliteCache {
    pub prices: Arc<PriceCacheRepository>,
    pub dividends: Arc<DividendCacheRepository>,
}

impl SqliteCache {
    /// Open (creating and migrating if needed) the cache in `cache_dir`.
    pub fn open(cache_dir: &Path) -> Result<Self> {
        let pool = db::open(cache_dir)?;
        let prices = PriceCacheRepository::open(pool.clone())?;
        let dividends = DividendCacheRepository::open(pool)?;
        Ok(Self {
            prices: Arc::new(prices),
            dividends: Arc::new(dividends),
        })
    }

    pub fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            prices: self.prices.len()?,
            dividends: self.dividends.len()?,
        })
    }

    /// Write both families to `dir` in the flat-file layout.
    pub fn export_csv(&self, dir: &Path) -> Result<CacheStats> {
        fs::create_dir_all(dir).into_core()?;
        let prices = csv_io::write_prices(dir, &self.prices.records()?).into_core()?;
        let dividends = csv_io::write_dividends(dir, &self.dividends.records()?).into_core()?;
        Ok(CacheStats { prices, dividends })
    }

    /// Load flat-file caches from `dir`, overwriting matching keys.
    pub fn import_csv(&self, dir: &Path) -> Result<CacheStats> {
        let prices = csv_io::read_prices(dir).into_core()?;
        let dividends = csv_io::read_dividends(dir).into_core()?;
        let stats = CacheStats {
            prices: self.prices.put_many(prices)?,
            dividends: self.dividends.put_many(dividends)?,
        };
        info!(
            "Imported {} price and {} dividend records from {}",
            stats.prices,
            stats.dividends,
            dir.display()
        );
        Ok(stats)
    }
}
