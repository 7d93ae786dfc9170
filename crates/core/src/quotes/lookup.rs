//! Lookup orchestration: cache first, then the provider scan.
//!
//! ```text
//! normalize ──▶ cache get ──hit──▶ return
//!                   │
//!                  miss
//!                   ▼
//!           registry scan (priority list) ──exhausted──▶ None ("N/A")
//!                   │
//!                success
//!                   ▼
//!              cache put ──▶ return
//! ```
//!
//! A cache hit is decided by key presence alone. Nothing here invalidates
//! a stored record.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use qfinance_market_data::{AssetCategory, DividendPeriod, ProviderRegistry};

use super::category::{normalize_category, SourceCategory};
use super::model::{CacheKey, DividendRecord, PriceField, PriceRecord};
use super::sources::SourcePriorityTable;
use super::store::{DividendCacheStore, PriceCacheStore};
use crate::errors::{Result, ValidationError};
use crate::utils::dates::{normalize_date, DateInput};

/// Resolves price and dividend lookups against the cache and the providers.
///
/// Holds no state of its own beyond its collaborators.
pub struct LookupService {
    prices: Arc<PriceCacheStore>,
    dividends: Arc<DividendCacheStore>,
    registry: Arc<ProviderRegistry>,
    sources: SourcePriorityTable,
}

impl LookupService {
    pub fn new(
        prices: Arc<PriceCacheStore>,
        dividends: Arc<DividendCacheStore>,
        registry: Arc<ProviderRegistry>,
        sources: SourcePriorityTable,
    ) -> Self {
        Self {
            prices,
            dividends,
            registry,
            sources,
        }
    }

    pub fn sources(&self) -> &SourcePriorityTable {
        &self.sources
    }

    /// Price record for `symbol` on `date`.
    ///
    /// Returns `Ok(None)` when every configured source came up empty. Cache
    /// failures are errors.
    pub async fn price_record(
        &self,
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceRecord>> {
        let symbol = symbol.trim().to_uppercase();
        let key = CacheKey::new(symbol.as_str(), date);

        if let Some(record) = self.prices.get(&key)? {
            debug!("Cache hit for {}", key);
            return Ok(Some(record));
        }
        debug!("Cache miss for {}", key);

        let sources = self.sources.sources_for(SourceCategory::from(category));
        let hit = match self
            .registry
            .fetch_price(sources, &symbol, category, date)
            .await
        {
            Ok(hit) => hit,
            Err(e) => {
                if !e.is_exhausted() {
                    warn!("Price lookup for {} failed: {}", key, e);
                }
                return Ok(None);
            }
        };

        let record = PriceRecord::from_bar(&symbol, date, hit.data, &hit.provider_id);
        self.prices.put(record.clone())?;
        debug!("Cached {} from '{}'", key, hit.provider_id);
        Ok(Some(record))
    }

    /// Trailing-twelve-month dividend total for `symbol` ending at `date`.
    pub async fn ttm_dividend_record(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<DividendRecord>> {
        let symbol = symbol.trim().to_uppercase();
        let key = CacheKey::new(symbol.as_str(), date);

        if let Some(record) = self.dividends.get(&key)? {
            debug!("Dividend cache hit for {}", key);
            return Ok(Some(record));
        }
        debug!("Dividend cache miss for {}", key);

        let sources = self.sources.sources_for(SourceCategory::Dividend);
        let hit = match self
            .registry
            .fetch_dividends(sources, &symbol, date, DividendPeriod::OneYear)
            .await
        {
            Ok(hit) => hit,
            Err(e) => {
                if !e.is_exhausted() {
                    warn!("Dividend lookup for {} failed: {}", key, e);
                }
                return Ok(None);
            }
        };

        let record = DividendRecord::from_distributions(&symbol, date, &hit.data, &hit.provider_id);
        self.dividends.put(record.clone())?;
        debug!(
            "Cached dividend {} = {} from '{}'",
            key, record.amount, hit.provider_id
        );
        Ok(Some(record))
    }

    /// Normalize raw inputs and resolve one price field.
    ///
    /// Normalization failures are errors. `Ok(None)` means no source had data.
    pub async fn resolve_price(
        &self,
        symbol: &str,
        category: &str,
        date: &DateInput,
        field: PriceField,
    ) -> Result<Option<Decimal>> {
        let category = normalize_category(category)?;
        let date = require_date(date)?;
        let record = self.price_record(symbol, category, date).await?;
        Ok(record.map(|r| r.value(field)))
    }

    /// Normalize raw inputs and resolve the trailing dividend total.
    pub async fn resolve_ttm_dividend(
        &self,
        symbol: &str,
        date: &DateInput,
    ) -> Result<Option<Decimal>> {
        let date = require_date(date)?;
        let record = self.ttm_dividend_record(symbol, date).await?;
        Ok(record.map(|r| r.amount))
    }
}

/// A lookup needs a concrete date; an empty input is invalid here.
fn require_date(input: &DateInput) -> Result<NaiveDate> {
    match normalize_date(input)? {
        Some(date) => Ok(date),
        None => Err(ValidationError::InvalidDate(input.to_string()).into()),
    }
}
