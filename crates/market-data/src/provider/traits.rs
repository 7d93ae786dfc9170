//! Market data provider trait definitions.
//!
//! This module defines the `MarketDataProvider` trait that every data
//! source adapter implements.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, Distribution, DividendPeriod, PriceBar};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new data source. Providers are
/// looked up by [`id`](MarketDataProvider::id) from the per-category source
/// lists, so the id must be a stable lowercase name.
///
/// Results follow one convention across every adapter:
/// - `Ok(Some(bar))` / non-empty `Vec`: data found
/// - `Ok(None)` / empty `Vec`: the source has nothing for this query
/// - `Err(_)`: operational failure (network, parse, rejected category)
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use qfinance_market_data::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "mine"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             categories: &[AssetCategory::Stock],
///             supports_prices: true,
///             supports_dividends: false,
///         }
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement get_price
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique lowercase name for this provider ("yahoo", "tiingo", ...).
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Pacing that the registry applies before each call.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the daily price bar for `symbol` on `date`.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        let _ = (symbol, category, date);
        Err(MarketDataError::NotSupported {
            operation: "prices".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the distributions paid in `period` ending at `date`.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_dividends(
        &self,
        symbol: &str,
        date: NaiveDate,
        period: DividendPeriod,
    ) -> Result<Vec<Distribution>, MarketDataError> {
        let _ = (symbol, date, period);
        Err(MarketDataError::NotSupported {
            operation: "dividends".to_string(),
            provider: self.id().to_string(),
        })
    }
}
