//! Provider capabilities and request pacing configuration.
//!
//! This module defines structures for describing what a market data provider
//! can do and how often it may be called.

use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::AssetCategory;

/// Describes the capabilities of a market data provider.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Asset categories the price lookup accepts.
    pub categories: &'static [AssetCategory],

    /// Whether the provider answers daily price lookups.
    pub supports_prices: bool,

    /// Whether the provider answers dividend lookups.
    pub supports_dividends: bool,
}

impl ProviderCapabilities {
    /// Every category, prices and dividends.
    pub const ALL_CATEGORIES: &'static [AssetCategory] = &[
        AssetCategory::Unspecified,
        AssetCategory::Stock,
        AssetCategory::Etf,
        AssetCategory::MutualFund,
        AssetCategory::Index,
    ];

    pub fn supports_category(&self, category: AssetCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Reject a category the provider does not handle.
    ///
    /// An unsupported category is an operational failure, never an empty result.
    pub fn ensure_category(
        &self,
        provider: &str,
        category: AssetCategory,
    ) -> Result<(), MarketDataError> {
        if self.supports_category(category) {
            Ok(())
        } else {
            Err(MarketDataError::UnsupportedCategory {
                provider: provider.to_string(),
                category: category.to_string(),
            })
        }
    }
}

/// Request pacing for a provider.
///
/// The registry turns this into a token bucket so that outbound calls to a
/// single provider are spaced out.
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Requests that may be issued back to back before pacing kicks in.
    pub burst: u32,
}

impl RateLimit {
    /// Derive a limit from a minimum interval between requests.
    ///
    /// A zero interval means the provider is not paced.
    pub fn from_pacing(interval: Duration) -> Self {
        let secs = interval.as_secs_f64();
        if secs <= 0.0 {
            return Self::unpaced();
        }
        let per_minute = (60.0 / secs).round().clamp(1.0, u32::MAX as f64) as u32;
        Self {
            requests_per_minute: per_minute,
            burst: 1,
        }
    }

    pub fn unpaced() -> Self {
        Self {
            requests_per_minute: 6000,
            burst: 100,
        }
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst: 5,
        }
    }
}
