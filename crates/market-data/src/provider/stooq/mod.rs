//! Stooq provider implementation.
//!
//! Stooq publishes daily bars as CSV. The category is ignored: US listings
//! are addressed with a ticker postfix (`.us` by default) and the common
//! indices have their own `^` tickers.
//!
//! # API Endpoints
//!
//! - Daily bars: `https://stooq.com/q/d/l/?s={ticker}&d1={yyyymmdd}&d2={yyyymmdd}&i=d`
//!
//! A body of `No data` means the source has nothing for the query.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, PriceBar};
use crate::provider::http::{build_client, fetch_text};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const BASE_URL: &str = "https://stooq.com/q/d/l/";
pub const PROVIDER_ID: &str = "stooq";

/// Postfix appended to plain US tickers
pub const DEFAULT_TICKER_POSTFIX: &str = ".us";

const INDEX_MAP: &[(&str, &str)] = &[("djia", "^dji"), ("spx", "^spx"), ("nasdaq", "^ndq")];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StooqRow {
    date: NaiveDate,
    open: Option<Decimal>,
    high: Option<Decimal>,
    low: Option<Decimal>,
    close: Decimal,
    #[serde(default)]
    volume: Option<f64>,
}

/// Stooq daily CSV provider.
pub struct StooqProvider {
    client: Client,
    ticker_postfix: String,
}

impl StooqProvider {
    pub fn new(ticker_postfix: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            ticker_postfix: ticker_postfix.into(),
        }
    }

    /// Map a symbol onto a Stooq ticker.
    fn map_symbol(&self, symbol: &str) -> String {
        let lower = symbol.to_lowercase();
        if let Some((_, ticker)) = INDEX_MAP.iter().find(|(alias, _)| *alias == lower) {
            return ticker.to_string();
        }
        // Already qualified or an index ticker
        if lower.starts_with('^') || lower.contains('.') {
            return lower;
        }
        format!("{}{}", lower, self.ticker_postfix)
    }
}

impl Default for StooqProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TICKER_POSTFIX)
    }
}

/// Parse a Stooq CSV body into the bar for `date`.
fn parse_csv(body: &str, date: NaiveDate) -> Result<Option<PriceBar>, MarketDataError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("no data") {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(trimmed.as_bytes());

    for row in reader.deserialize::<StooqRow>() {
        let row = row.map_err(|e| MarketDataError::invalid_response(PROVIDER_ID, e.to_string()))?;
        if row.date != date {
            continue;
        }
        return Ok(Some(PriceBar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.map(|v| v as i64),
            adj_close: None,
        }));
    }

    Ok(None)
}

#[async_trait]
impl MarketDataProvider for StooqProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            categories: ProviderCapabilities::ALL_CATEGORIES,
            supports_prices: true,
            supports_dividends: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_price(
        &self,
        symbol: &str,
        _category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        let ticker = self.map_symbol(symbol);
        let day = date.format("%Y%m%d").to_string();
        let url = format!(
            "{}?s={}&d1={}&d2={}&i=d",
            BASE_URL,
            urlencoding::encode(&ticker),
            day,
            day
        );

        let body = fetch_text(&self.client, PROVIDER_ID, &url, &url).await?;
        parse_csv(&body, date)
    }
}
