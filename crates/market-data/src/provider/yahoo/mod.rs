//! Yahoo Finance market data provider.
//!
//! This provider uses the Yahoo Finance chart API (through `yahoo_finance_api`)
//! to fetch daily bars for stocks, ETFs, mutual funds and indices, and the
//! dividend events attached to the same chart series.
//!
//! The common index names `djia`, `spx` and `nasdaq` are translated to the
//! Yahoo tickers `^DJI`, `^GSPC` and `^IXIC`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{debug, warn};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, Distribution, DividendPeriod, PriceBar};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

pub const PROVIDER_ID: &str = "yahoo";

/// Default minimum interval between Yahoo requests
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

const INDEX_MAP: &[(&str, &str)] = &[("djia", "^DJI"), ("spx", "^GSPC"), ("nasdaq", "^IXIC")];

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    pacing: Duration,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider paced at `pacing` between requests.
    pub fn new(pacing: Duration) -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector, pacing })
    }

    /// Translate well-known index names to Yahoo tickers.
    fn map_symbol(symbol: &str) -> String {
        let lower = symbol.to_lowercase();
        INDEX_MAP
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, ticker)| ticker.to_string())
            .unwrap_or_else(|| symbol.to_uppercase())
    }

    /// Midnight UTC at the start of `date` as an OffsetDateTime.
    fn start_of_day(date: NaiveDate) -> Result<OffsetDateTime, MarketDataError> {
        let timestamp = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, format!("Invalid date {}", date)))?;
        OffsetDateTime::from_unix_timestamp(timestamp)
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))
    }

    fn timestamp_to_date(timestamp: i64) -> Option<NaiveDate> {
        Utc.timestamp_opt(timestamp, 0)
            .single()
            .map(|dt: DateTime<Utc>| dt.date_naive())
    }

    /// Convert a Yahoo quote to a price bar.
    fn yahoo_quote_to_bar(quote: &yahoo::Quote) -> Result<PriceBar, MarketDataError> {
        let date = Self::timestamp_to_date(quote.timestamp as i64).ok_or_else(|| {
            MarketDataError::invalid_response(
                PROVIDER_ID,
                format!("Invalid timestamp: {}", quote.timestamp),
            )
        })?;

        // Close price is required
        let close = Decimal::from_f64(quote.close).ok_or_else(|| {
            MarketDataError::invalid_response(
                PROVIDER_ID,
                format!("Failed to convert close price {} to Decimal", quote.close),
            )
        })?;

        Ok(PriceBar {
            date,
            open: Decimal::from_f64(quote.open),
            high: Decimal::from_f64(quote.high),
            low: Decimal::from_f64(quote.low),
            close,
            volume: i64::try_from(quote.volume).ok(),
            adj_close: Decimal::from_f64(quote.adjclose),
        })
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<yahoo::YResponse>, MarketDataError> {
        let start_time = Self::start_of_day(start)?;
        // The chart API treats period2 as exclusive
        let end_time = Self::start_of_day(end + chrono::Duration::days(1))?;

        debug!(
            "Fetching Yahoo history for {} from {} to {}",
            symbol, start, end
        );

        match self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
        {
            Ok(response) => Ok(Some(response)),
            Err(yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) => Ok(None),
            Err(e) => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            categories: ProviderCapabilities::ALL_CATEGORIES,
            supports_prices: true,
            supports_dividends: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::from_pacing(self.pacing)
    }

    async fn get_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        self.capabilities().ensure_category(PROVIDER_ID, category)?;
        let ticker = Self::map_symbol(symbol);

        let Some(response) = self.fetch_history(&ticker, date, date).await? else {
            return Ok(None);
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(yahoo::YahooError::NoQuotes) => {
                warn!("No Yahoo quotes returned for '{}' on {}", ticker, date);
                return Ok(None);
            }
            Err(e) => return Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        };

        for quote in &quotes {
            match Self::yahoo_quote_to_bar(quote) {
                Ok(bar) if bar.date == date => return Ok(Some(bar)),
                Ok(bar) => debug!("Skipping Yahoo bar for {} dated {}", ticker, bar.date),
                Err(e) => warn!("Skipping quote due to conversion error: {:?}", e),
            }
        }

        Ok(None)
    }

    async fn get_dividends(
        &self,
        symbol: &str,
        date: NaiveDate,
        period: DividendPeriod,
    ) -> Result<Vec<Distribution>, MarketDataError> {
        let ticker = Self::map_symbol(symbol);
        let start = period.first_day(date).ok_or_else(|| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Date {} is out of range for a {} window", date, period.as_str()),
            )
        })?;

        let Some(response) = self.fetch_history(&ticker, start, date).await? else {
            return Ok(Vec::new());
        };

        let dividends = response
            .dividends()
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;

        let distributions = dividends
            .iter()
            .filter_map(|d| {
                let ex_date = Self::timestamp_to_date(d.date as i64)?;
                if !period.contains(date, ex_date) {
                    return None;
                }
                Decimal::from_f64(d.amount).map(|amount| Distribution::new(Some(ex_date), amount))
            })
            .collect::<Vec<_>>();

        debug!(
            "Yahoo returned {} distributions for {} in the {} window ending {}",
            distributions.len(),
            ticker,
            period.as_str(),
            date
        );

        Ok(distributions)
    }
}
