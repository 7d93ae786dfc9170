//! Fakes shared by the lookup and query tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use qfinance_market_data::{
    AssetCategory, Distribution, DividendPeriod, MarketDataError, MarketDataProvider, PriceBar,
    ProviderCapabilities, ProviderRegistry, RateLimit,
};

use super::model::{CacheKey, CacheRecord};
use super::store::CacheStore;
use super::{LookupService, SourcePriorityTable};
use crate::errors::{DatabaseError, Result};
use crate::quotes::{DividendRecord, PriceRecord};

// =========================================================================
// Mock CacheStore
// =========================================================================

#[derive(Clone)]
pub struct MockCacheStore<R> {
    records: Arc<Mutex<HashMap<CacheKey, R>>>,
    fail: Arc<Mutex<bool>>,
    puts: Arc<AtomicUsize>,
}

impl<R> Default for MockCacheStore<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            fail: Arc::new(Mutex::new(false)),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<R: CacheRecord> MockCacheStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: R) {
        self.records.lock().unwrap().insert(record.key(), record);
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn get_record(&self, key: &CacheKey) -> Option<R> {
        self.records.lock().unwrap().get(key).cloned()
    }

    fn check(&self) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        Ok(())
    }
}

impl<R: CacheRecord> CacheStore<R> for MockCacheStore<R> {
    fn get(&self, key: &CacheKey) -> Result<Option<R>> {
        self.check()?;
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    fn put(&self, record: R) -> Result<()> {
        self.check()?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().insert(record.key(), record);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.lock().unwrap().len())
    }

    fn records(&self) -> Result<Vec<R>> {
        let records = self.records.lock().unwrap();
        let mut keys: Vec<_> = records.keys().cloned().collect();
        keys.sort();
        Ok(keys.iter().filter_map(|k| records.get(k).cloned()).collect())
    }
}

// =========================================================================
// Mock Provider
// =========================================================================

#[derive(Clone)]
pub enum Behavior {
    Price(PriceBar),
    Dividends(Vec<Distribution>),
    Empty,
    Fail,
}

pub struct MockProvider {
    id: &'static str,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(id: &'static str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            id,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            categories: ProviderCapabilities::ALL_CATEGORIES,
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
        _date: NaiveDate,
    ) -> std::result::Result<Option<PriceBar>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Price(bar) => Ok(Some(bar.clone())),
            Behavior::Fail => Err(MarketDataError::provider(self.id, "Mock failure")),
            _ => Ok(None),
        }
    }

    async fn get_dividends(
        &self,
        _symbol: &str,
        _date: NaiveDate,
        _period: DividendPeriod,
    ) -> std::result::Result<Vec<Distribution>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Dividends(list) => Ok(list.clone()),
            Behavior::Fail => Err(MarketDataError::provider(self.id, "Mock failure")),
            _ => Ok(Vec::new()),
        }
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn ibm_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 11, 30).unwrap()
}

/// The canonical stub bar: open 1, high 2, low 0.5, close 1.5, volume 1000.
pub fn ibm_bar() -> PriceBar {
    PriceBar::ohlcv(ibm_date(), dec!(1), dec!(2), dec!(0.5), dec!(1.5), 1000)
}

/// Every category and the dividend list point at the same names.
pub fn table(names: &[&str]) -> SourcePriorityTable {
    let list: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    SourcePriorityTable {
        stock: list.clone(),
        etf: list.clone(),
        mutf: list.clone(),
        index: list.clone(),
        dividend: list,
    }
}

pub struct Harness {
    pub prices: MockCacheStore<PriceRecord>,
    pub dividends: MockCacheStore<DividendRecord>,
    pub lookup: Arc<LookupService>,
}

/// Build a lookup service over fresh mock stores. Sources are tried in the
/// order the providers are given.
pub fn harness(providers: &[Arc<MockProvider>]) -> Harness {
    let names: Vec<&str> = providers.iter().map(|p| p.id).collect();
    let registry = ProviderRegistry::new(
        providers
            .iter()
            .map(|p| p.clone() as Arc<dyn MarketDataProvider>)
            .collect(),
    );
    let prices = MockCacheStore::<PriceRecord>::new();
    let dividends = MockCacheStore::<DividendRecord>::new();
    let lookup = LookupService::new(
        Arc::new(prices.clone()),
        Arc::new(dividends.clone()),
        Arc::new(registry),
        table(&names),
    );
    Harness {
        prices,
        dividends,
        lookup: Arc::new(lookup),
    }
}
