use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day as reported by a provider.
///
/// Only the close is mandatory. Fields a provider does not publish
/// (volume for indices, adjusted close for most CSV sources) stay `None`
/// and are zero-filled by the caller before caching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date the provider reported for the bar
    pub date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing price (required)
    pub close: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<Decimal>,
}

impl PriceBar {
    /// Create a bar with only a closing price
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
            adj_close: None,
        }
    }

    /// Create a full OHLCV bar
    pub fn ohlcv(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: i64,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
            adj_close: None,
        }
    }

    pub fn with_adj_close(mut self, adj_close: Decimal) -> Self {
        self.adj_close = Some(adj_close);
        self
    }
}
