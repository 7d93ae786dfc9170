//! Cached record models.
//!
//! Two record families are cached, both keyed by `SYMBOL:YYYY-MM-DD`:
//! daily price records and trailing-twelve-month dividend totals.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use qfinance_market_data::{Distribution, PriceBar};

use crate::utils::dates::format_iso;

// =============================================================================
// Cache Key
// =============================================================================

/// Compound cache key. The symbol is compared exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub symbol: String,
    pub date: NaiveDate,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbol, format_iso(self.date))
    }
}

/// A record that can live in a cache store.
pub trait CacheRecord: Clone + Send + Sync {
    fn key(&self) -> CacheKey;
}

// =============================================================================
// Price Record
// =============================================================================

/// The price fields a query can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
    AdjClose,
}

impl PriceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
            PriceField::AdjClose => "adj_close",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cached trading day.
///
/// Every numeric field is present. Fields the provider did not supply are
/// stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    /// Uppercased ticker
    pub symbol: String,
    /// The requested date
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    pub adj_close: Decimal,
    /// Name of the provider that produced the record
    pub source: String,
}

impl PriceRecord {
    /// Build the canonical record from a provider bar, zero-filling gaps.
    ///
    /// The record is keyed by `date`, the date that was asked for.
    pub fn from_bar(symbol: &str, date: NaiveDate, bar: PriceBar, source: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            date,
            open: bar.open.unwrap_or(Decimal::ZERO),
            high: bar.high.unwrap_or(Decimal::ZERO),
            low: bar.low.unwrap_or(Decimal::ZERO),
            close: bar.close,
            volume: bar.volume.unwrap_or(0),
            adj_close: bar.adj_close.unwrap_or(Decimal::ZERO),
            source: source.to_string(),
        }
    }

    pub fn value(&self, field: PriceField) -> Decimal {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => Decimal::from(self.volume),
            PriceField::AdjClose => self.adj_close,
        }
    }
}

impl CacheRecord for PriceRecord {
    fn key(&self) -> CacheKey {
        CacheKey::new(self.symbol.clone(), self.date)
    }
}

// =============================================================================
// Dividend Record
// =============================================================================

/// Trailing-twelve-month dividend total for a symbol as of `calc_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendRecord {
    pub symbol: String,
    /// End of the trailing window
    pub calc_date: NaiveDate,
    /// Sum of every distribution in the window
    pub amount: Decimal,
    pub source: String,
}

impl DividendRecord {
    /// Sum `distributions` into a single trailing total.
    pub fn from_distributions(
        symbol: &str,
        calc_date: NaiveDate,
        distributions: &[Distribution],
        source: &str,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            calc_date,
            amount: distributions.iter().map(|d| d.amount).sum(),
            source: source.to_string(),
        }
    }
}

impl CacheRecord for DividendRecord {
    fn key(&self) -> CacheKey {
        CacheKey::new(self.symbol.clone(), self.calc_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 11, 30).unwrap()
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(CacheKey::new("IBM", date()).to_string(), "IBM:2018-11-30");
        assert_ne!(CacheKey::new("IBM", date()), CacheKey::new("ibm", date()));
    }

    #[test]
    fn test_price_record_zero_fills_missing_fields() {
        // An index bar: no volume, no adjusted close
        let bar = PriceBar {
            date: date(),
            open: Some(dec!(25269.4)),
            high: None,
            low: None,
            close: dec!(25538.46),
            volume: None,
            adj_close: None,
        };
        let record = PriceRecord::from_bar("^DJI", date(), bar, "stooq");

        assert_eq!(record.open, dec!(25269.4));
        assert_eq!(record.high, Decimal::ZERO);
        assert_eq!(record.volume, 0);
        assert_eq!(record.adj_close, Decimal::ZERO);
        assert_eq!(record.source, "stooq");
        assert_eq!(record.key().to_string(), "^DJI:2018-11-30");
    }

    #[test]
    fn test_price_record_keyed_by_requested_date() {
        let provider_date = NaiveDate::from_ymd_opt(2018, 11, 29).unwrap();
        let record = PriceRecord::from_bar("IBM", date(), PriceBar::new(provider_date, dec!(1)), "wsj");
        assert_eq!(record.date, date());
    }

    #[test]
    fn test_price_record_value() {
        let bar = PriceBar::ohlcv(date(), dec!(1), dec!(2), dec!(0.5), dec!(1.5), 1000);
        let record = PriceRecord::from_bar("IBM", date(), bar, "yahoo");

        assert_eq!(record.value(PriceField::Open), dec!(1));
        assert_eq!(record.value(PriceField::High), dec!(2));
        assert_eq!(record.value(PriceField::Low), dec!(0.5));
        assert_eq!(record.value(PriceField::Close), dec!(1.5));
        assert_eq!(record.value(PriceField::Volume), dec!(1000));
    }

    #[test]
    fn test_dividend_record_sums_distributions() {
        let distributions = vec![
            Distribution::new(None, dec!(0.5)),
            Distribution::new(None, dec!(0.3)),
        ];
        let record = DividendRecord::from_distributions("VYM", date(), &distributions, "yahoo");
        assert_eq!(record.amount, dec!(0.8));
    }
}
