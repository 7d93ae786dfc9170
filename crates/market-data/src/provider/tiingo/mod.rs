//! Tiingo provider implementation.
//!
//! Tiingo's end-of-day API covers stocks, ETFs and mutual funds. Indices are
//! not available and are rejected. Every request needs an API token.
//!
//! # API Endpoints
//!
//! - Daily prices: `https://api.tiingo.com/tiingo/daily/{symbol}/prices?startDate={d}&endDate={d}&token={token}`
//!
//! The same endpoint over a one year range carries a `divCash` column that
//! is used for dividend lookups.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, Distribution, DividendPeriod, PriceBar};
use crate::provider::http::{build_client, fetch_text, mask};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const BASE_URL: &str = "https://api.tiingo.com/tiingo/daily";
pub const PROVIDER_ID: &str = "tiingo";

/// One row of the daily prices response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyPrice {
    /// ISO timestamp, e.g. "2018-11-30T00:00:00.000Z"
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: f64,
    volume: Option<i64>,
    adj_close: Option<f64>,
    #[serde(default)]
    div_cash: Option<f64>,
}

impl DailyPrice {
    fn trading_date(&self) -> Result<NaiveDate, MarketDataError> {
        DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .or_else(|_| {
                NaiveDate::parse_from_str(self.date.get(..10).unwrap_or(&self.date), "%Y-%m-%d")
            })
            .map_err(|e| {
                MarketDataError::invalid_response(
                    PROVIDER_ID,
                    format!("Bad date '{}': {}", self.date, e),
                )
            })
    }

    fn into_bar(self) -> Result<PriceBar, MarketDataError> {
        let date = self.trading_date()?;
        let close = Decimal::from_f64(self.close).ok_or_else(|| {
            MarketDataError::invalid_response(PROVIDER_ID, format!("Bad close {}", self.close))
        })?;

        Ok(PriceBar {
            date,
            open: self.open.and_then(Decimal::from_f64),
            high: self.high.and_then(Decimal::from_f64),
            low: self.low.and_then(Decimal::from_f64),
            close,
            volume: self.volume,
            adj_close: self.adj_close.and_then(Decimal::from_f64),
        })
    }
}

/// Tiingo end-of-day provider.
pub struct TiingoProvider {
    client: Client,
    api_token: String,
}

impl TiingoProvider {
    /// Create a new Tiingo provider with the given API token.
    pub fn new(api_token: String) -> Self {
        Self {
            client: build_client(),
            api_token,
        }
    }

    fn prices_url(symbol: &str, start: NaiveDate, end: NaiveDate, token: &str) -> String {
        format!(
            "{}/{}/prices?startDate={}&endDate={}&token={}",
            BASE_URL,
            urlencoding::encode(&symbol.to_uppercase()),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            token
        )
    }

    async fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPrice>, MarketDataError> {
        if self.api_token.is_empty() {
            return Err(MarketDataError::MissingCredentials {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let url = Self::prices_url(symbol, start, end, &self.api_token);
        let masked = Self::prices_url(symbol, start, end, &mask(&self.api_token));
        let body = fetch_text(&self.client, PROVIDER_ID, &url, &masked).await?;

        parse_prices(&body)
    }
}

fn parse_prices(body: &str) -> Result<Vec<DailyPrice>, MarketDataError> {
    serde_json::from_str(body)
        .map_err(|e| MarketDataError::invalid_response(PROVIDER_ID, e.to_string()))
}

#[async_trait]
impl MarketDataProvider for TiingoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            categories: &[
                AssetCategory::Unspecified,
                AssetCategory::Stock,
                AssetCategory::Etf,
                AssetCategory::MutualFund,
            ],
            supports_prices: true,
            supports_dividends: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn get_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        self.capabilities().ensure_category(PROVIDER_ID, category)?;

        let rows = self.fetch_prices(symbol, date, date).await?;
        match rows.into_iter().next() {
            Some(row) => row.into_bar().map(Some),
            None => {
                debug!("Tiingo has no data for {} on {}", symbol, date);
                Ok(None)
            }
        }
    }

    async fn get_dividends(
        &self,
        symbol: &str,
        date: NaiveDate,
        period: DividendPeriod,
    ) -> Result<Vec<Distribution>, MarketDataError> {
        let start = period.first_day(date).ok_or_else(|| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Date {} is out of range for a {} window", date, period.as_str()),
            )
        })?;
        let rows = self.fetch_prices(symbol, start, date).await?;
        dividends_from_rows(rows, date, period)
    }
}

fn dividends_from_rows(
    rows: Vec<DailyPrice>,
    date: NaiveDate,
    period: DividendPeriod,
) -> Result<Vec<Distribution>, MarketDataError> {
    let mut distributions = Vec::new();
    for row in rows {
        let Some(cash) = row.div_cash.filter(|c| *c > 0.0) else {
            continue;
        };
        let ex_date = row.trading_date()?;
        if !period.contains(date, ex_date) {
            continue;
        }
        if let Some(amount) = Decimal::from_f64(cash) {
            distributions.push(Distribution::new(Some(ex_date), amount));
        }
    }
    Ok(distributions)
}
