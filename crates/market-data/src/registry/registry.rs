//! Provider registry for orchestrating market data providers.
//!
//! The registry owns every configured adapter under its lowercase name and
//! walks a caller-supplied source list in order:
//! - Names with no adapter are skipped
//! - Adapters that cannot serve the request are skipped without a call
//! - Errors and empty results fall through to the next name
//! - The first non-empty result wins, nothing is merged

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error, info, warn};

use super::{FetchDiagnostics, RateLimiter, SkipReason};
use crate::errors::MarketDataError;
use crate::models::{AssetCategory, Distribution, DividendPeriod, PriceBar, ProviderId};
use crate::provider::MarketDataProvider;

/// A successful scan: the winning provider, its data and the attempt log.
#[derive(Clone, Debug)]
pub struct ProviderHit<T> {
    pub provider_id: ProviderId,
    pub data: T,
    pub diagnostics: FetchDiagnostics,
}

/// Provider registry for orchestrating market data fetching.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn MarketDataProvider>>,
    rate_limiter: RateLimiter,
}

impl ProviderRegistry {
    /// Create a registry from a set of providers.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
            rate_limiter: RateLimiter::new(),
        };
        for provider in providers {
            registry.register(provider);
        }
        registry
    }

    /// Add a provider, replacing any provider registered under the same id.
    pub fn register(&mut self, provider: Arc<dyn MarketDataProvider>) {
        let id = provider.id();
        self.rate_limiter
            .configure(&Cow::Borrowed(id), provider.rate_limit());
        if self.providers.insert(id, provider).is_some() {
            warn!("Provider '{}' registered twice, keeping the last one", id);
        }
    }

    /// Look up a provider by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MarketDataProvider>> {
        self.providers.get(name.trim().to_lowercase().as_str())
    }

    /// Registered provider names, sorted.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.providers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve a source name, recording a skip for unknown names.
    fn resolve(
        &self,
        name: &str,
        diagnostics: &mut FetchDiagnostics,
    ) -> Option<(ProviderId, &Arc<dyn MarketDataProvider>)> {
        match self.get(name) {
            Some(provider) => Some((Cow::Borrowed(provider.id()), provider)),
            None => {
                warn!("Unrecognized data source name {}", name);
                diagnostics.record_skip(Cow::Owned(name.to_string()), SkipReason::UnknownProvider);
                None
            }
        }
    }

    /// Fetch the price bar for `symbol` on `date`, trying `sources` in order.
    pub async fn fetch_price(
        &self,
        sources: &[String],
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<ProviderHit<PriceBar>, MarketDataError> {
        if sources.is_empty() {
            warn!("No data sources configured for category '{}'", category);
            return Err(MarketDataError::NoProvidersConfigured);
        }

        let mut diagnostics = FetchDiagnostics::new();

        for name in sources {
            let Some((provider_id, provider)) = self.resolve(name, &mut diagnostics) else {
                continue;
            };

            let capabilities = provider.capabilities();
            if !capabilities.supports_prices {
                debug!("Provider '{}' has no price data, skipping", provider_id);
                diagnostics.record_skip(provider_id, SkipReason::PricesNotSupported);
                continue;
            }
            if !capabilities.supports_category(category) {
                debug!(
                    "Provider '{}' does not support category '{}', skipping",
                    provider_id, category
                );
                diagnostics.record_skip(
                    provider_id,
                    SkipReason::CategoryNotSupported {
                        category: category.to_string(),
                    },
                );
                continue;
            }

            info!(
                "Fetching {} ({}) for {} from '{}'",
                symbol, category, date, provider_id
            );
            self.rate_limiter.acquire(&provider_id).await;

            match provider.get_price(symbol, category, date).await {
                Ok(Some(bar)) => {
                    diagnostics.record_success(provider_id.clone());
                    info!("Price for {} on {} found at '{}'", symbol, date, provider_id);
                    return Ok(ProviderHit {
                        provider_id,
                        data: bar,
                        diagnostics,
                    });
                }
                Ok(None) => {
                    info!("'{}' has no data for {} on {}", provider_id, symbol, date);
                    diagnostics.record_no_data(provider_id);
                }
                Err(e) => {
                    warn!(
                        "Provider '{}' failed for {} on {}: {}",
                        provider_id, symbol, date, e
                    );
                    diagnostics.record_error(provider_id, e.to_string());
                }
            }
        }

        error!(
            "No data source returned a price for {} on {}: {}",
            symbol,
            date,
            diagnostics.summary()
        );
        Err(MarketDataError::AllProvidersFailed)
    }

    /// Fetch the distributions for `symbol` in `period` ending at `date`,
    /// trying `sources` in order.
    pub async fn fetch_dividends(
        &self,
        sources: &[String],
        symbol: &str,
        date: NaiveDate,
        period: DividendPeriod,
    ) -> Result<ProviderHit<Vec<Distribution>>, MarketDataError> {
        if sources.is_empty() {
            warn!("No data sources configured for dividends");
            return Err(MarketDataError::NoProvidersConfigured);
        }

        let mut diagnostics = FetchDiagnostics::new();

        for name in sources {
            let Some((provider_id, provider)) = self.resolve(name, &mut diagnostics) else {
                continue;
            };

            if !provider.capabilities().supports_dividends {
                debug!("Provider '{}' has no dividend data, skipping", provider_id);
                diagnostics.record_skip(provider_id, SkipReason::DividendsNotSupported);
                continue;
            }

            info!(
                "Fetching {} dividends for {} ending {} from '{}'",
                period.as_str(),
                symbol,
                date,
                provider_id
            );
            self.rate_limiter.acquire(&provider_id).await;

            match provider.get_dividends(symbol, date, period).await {
                Ok(distributions) if !distributions.is_empty() => {
                    diagnostics.record_success(provider_id.clone());
                    return Ok(ProviderHit {
                        provider_id,
                        data: distributions,
                        diagnostics,
                    });
                }
                Ok(_) => {
                    info!("'{}' has no dividends for {} ending {}", provider_id, symbol, date);
                    diagnostics.record_no_data(provider_id);
                }
                Err(e) => {
                    warn!(
                        "Provider '{}' failed for {} dividends ending {}: {}",
                        provider_id, symbol, date, e
                    );
                    diagnostics.record_error(provider_id, e.to_string());
                }
            }
        }

        error!(
            "No data source for dividend returned a result for {} on {}: {}",
            symbol,
            date,
            diagnostics.summary()
        );
        Err(MarketDataError::AllProvidersFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderCapabilities, RateLimit};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Data,
        Empty,
        Fail,
    }

    struct MockProvider {
        id: &'static str,
        behavior: Behavior,
        categories: &'static [AssetCategory],
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(id: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior,
                categories: ProviderCapabilities::ALL_CATEGORIES,
                call_count: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                categories: self.categories,
                supports_prices: true,
                supports_dividends: true,
            }
        }

        fn rate_limit(&self) -> RateLimit {
            RateLimit::unpaced()
        }

        async fn get_price(
            &self,
            _symbol: &str,
            _category: AssetCategory,
            date: NaiveDate,
        ) -> Result<Option<PriceBar>, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Data => Ok(Some(PriceBar::new(date, dec!(102)))),
                Behavior::Empty => Ok(None),
                Behavior::Fail => Err(MarketDataError::provider(self.id, "Mock failure")),
            }
        }

        async fn get_dividends(
            &self,
            _symbol: &str,
            date: NaiveDate,
            _period: DividendPeriod,
        ) -> Result<Vec<Distribution>, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Data => Ok(vec![Distribution::new(Some(date), dec!(0.5))]),
                Behavior::Empty => Ok(Vec::new()),
                Behavior::Fail => Err(MarketDataError::provider(self.id, "Mock failure")),
            }
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 11, 30).unwrap()
    }

    fn registry(providers: Vec<Arc<MockProvider>>) -> ProviderRegistry {
        ProviderRegistry::new(
            providers
                .into_iter()
                .map(|p| p as Arc<dyn MarketDataProvider>)
                .collect(),
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_first_success_wins_and_stops_scan() {
        let a = MockProvider::new("a", Behavior::Fail);
        let b = MockProvider::new("b", Behavior::Data);
        let c = MockProvider::new("c", Behavior::Data);
        let registry = registry(vec![a.clone(), b.clone(), c.clone()]);

        let hit = registry
            .fetch_price(&names(&["a", "b", "c"]), "IBM", AssetCategory::Stock, date())
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "b");
        assert_eq!(hit.data.close, dec!(102));
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 0));
        assert_eq!(hit.diagnostics.summary(), "a: ERROR (Provider error: a - Mock failure) -> b: SUCCESS");
    }

    #[tokio::test]
    async fn test_empty_result_falls_through() {
        let a = MockProvider::new("a", Behavior::Empty);
        let b = MockProvider::new("b", Behavior::Data);
        let registry = registry(vec![a.clone(), b.clone()]);

        let hit = registry
            .fetch_price(&names(&["a", "b"]), "IBM", AssetCategory::Etf, date())
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "b");
        assert_eq!(a.calls(), 1);
    }

    #[tokio::test]
    async fn test_source_list_order_is_respected() {
        let a = MockProvider::new("a", Behavior::Data);
        let b = MockProvider::new("b", Behavior::Data);
        let registry = registry(vec![a.clone(), b.clone()]);

        let hit = registry
            .fetch_price(&names(&["b", "a"]), "IBM", AssetCategory::Stock, date())
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "b");
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_names_are_skipped() {
        let a = MockProvider::new("a", Behavior::Data);
        let registry = registry(vec![a.clone()]);

        let hit = registry
            .fetch_price(&names(&["iex", "A"]), "IBM", AssetCategory::Stock, date())
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "a");
        assert_eq!(
            hit.diagnostics.attempts[0].outcome,
            crate::registry::AttemptOutcome::Skipped(SkipReason::UnknownProvider)
        );
    }

    #[tokio::test]
    async fn test_unsupported_category_is_not_called() {
        let limited = Arc::new(MockProvider {
            id: "limited",
            behavior: Behavior::Data,
            categories: &[AssetCategory::Stock],
            call_count: AtomicUsize::new(0),
        });
        let fallback = MockProvider::new("fallback", Behavior::Data);
        let registry = registry(vec![limited.clone(), fallback.clone()]);

        let hit = registry
            .fetch_price(
                &names(&["limited", "fallback"]),
                "SPX",
                AssetCategory::Index,
                date(),
            )
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "fallback");
        assert_eq!(limited.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_providers_exhausted() {
        let a = MockProvider::new("a", Behavior::Fail);
        let b = MockProvider::new("b", Behavior::Empty);
        let registry = registry(vec![a.clone(), b.clone()]);

        let err = registry
            .fetch_price(&names(&["a", "b"]), "IBM", AssetCategory::Stock, date())
            .await
            .unwrap_err();

        assert!(matches!(err, MarketDataError::AllProvidersFailed));
        assert_eq!((a.calls(), b.calls()), (1, 1));
    }

    #[tokio::test]
    async fn test_empty_source_list() {
        let registry = ProviderRegistry::new(Vec::new());
        let err = registry
            .fetch_price(&[], "IBM", AssetCategory::Stock, date())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::NoProvidersConfigured));
    }

    #[tokio::test]
    async fn test_dividends_fallback() {
        let a = MockProvider::new("a", Behavior::Empty);
        let b = MockProvider::new("b", Behavior::Data);
        let registry = registry(vec![a.clone(), b.clone()]);

        let hit = registry
            .fetch_dividends(&names(&["a", "b"]), "VYM", date(), DividendPeriod::OneYear)
            .await
            .unwrap();

        assert_eq!(hit.provider_id, "b");
        assert_eq!(hit.data.len(), 1);
        assert_eq!(a.calls(), 1);
    }

    #[test]
    fn test_provider_ids_and_lookup() {
        let registry = registry(vec![
            MockProvider::new("wsj", Behavior::Data),
            MockProvider::new("yahoo", Behavior::Data),
        ]);

        assert_eq!(registry.provider_ids(), vec!["wsj", "yahoo"]);
        assert!(registry.get("Yahoo").is_some());
        assert!(registry.get("iex").is_none());
    }
}
