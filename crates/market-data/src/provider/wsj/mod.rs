//! Wall Street Journal provider implementation.
//!
//! WSJ offers a CSV download of historical prices. The URL path carries the
//! asset class (`etf`, `mutualfund`, `index`; plain stocks have no segment).
//! The download has no volume column and its dates are `mm/dd/yy`.
//!
//! # API Endpoints
//!
//! - `https://quotes.wsj.com/[{category}/]{ticker}/historical-prices/download?MOD_VIEW=page&num_rows=3&range_days=3&startDate={d}&endDate={d+1}`

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, PriceBar};
use crate::provider::http::{build_client, fetch_text};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const BASE_URL: &str = "https://quotes.wsj.com";
pub const PROVIDER_ID: &str = "wsj";

/// Default minimum interval between WSJ requests
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

const INDEX_MAP: &[(&str, &str)] = &[("djia", "djia"), ("spx", "spx"), ("nasdaq", "comp")];

#[derive(Debug, Deserialize)]
struct WsjRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Option<Decimal>,
    #[serde(rename = "High")]
    high: Option<Decimal>,
    #[serde(rename = "Low")]
    low: Option<Decimal>,
    #[serde(rename = "Close")]
    close: Decimal,
}

/// WSJ historical prices provider.
pub struct WsjProvider {
    client: Client,
    pacing: Duration,
}

impl WsjProvider {
    pub fn new(pacing: Duration) -> Self {
        Self {
            client: build_client(),
            pacing,
        }
    }

    fn map_symbol(symbol: &str) -> String {
        let lower = symbol.to_lowercase();
        INDEX_MAP
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, ticker)| ticker.to_string())
            .unwrap_or(lower)
    }

    /// URL path segment for a category. Stocks have none.
    fn category_segment(category: AssetCategory) -> Option<&'static str> {
        match category {
            AssetCategory::Unspecified | AssetCategory::Stock => None,
            AssetCategory::Etf => Some("etf"),
            AssetCategory::MutualFund => Some("mutualfund"),
            AssetCategory::Index => Some("index"),
        }
    }

    fn download_url(symbol: &str, category: AssetCategory, date: NaiveDate) -> String {
        let ticker = Self::map_symbol(symbol);
        let end = date + chrono::Duration::days(1);
        let path = match Self::category_segment(category) {
            Some(segment) => format!("{}/{}", segment, urlencoding::encode(&ticker)),
            None => urlencoding::encode(&ticker).into_owned(),
        };
        format!(
            "{}/{}/historical-prices/download?MOD_VIEW=page&num_rows=3&range_days=3&startDate={}&endDate={}",
            BASE_URL,
            path,
            date.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }
}

/// Parse the WSJ CSV download into the bar for `date`.
fn parse_csv(body: &str, date: NaiveDate) -> Result<Option<PriceBar>, MarketDataError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    for row in reader.deserialize::<WsjRow>() {
        let row = row.map_err(|e| MarketDataError::invalid_response(PROVIDER_ID, e.to_string()))?;
        let row_date = NaiveDate::parse_from_str(&row.date, "%m/%d/%y").map_err(|e| {
            MarketDataError::invalid_response(PROVIDER_ID, format!("Bad date '{}': {}", row.date, e))
        })?;
        if row_date != date {
            continue;
        }
        return Ok(Some(PriceBar {
            date: row_date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: None,
            adj_close: None,
        }));
    }

    Ok(None)
}

#[async_trait]
impl MarketDataProvider for WsjProvider {
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
        RateLimit::from_pacing(self.pacing)
    }

    async fn get_price(
        &self,
        symbol: &str,
        category: AssetCategory,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        let url = Self::download_url(symbol, category, date);
        let body = fetch_text(&self.client, PROVIDER_ID, &url, &url).await?;
        parse_csv(&body, date)
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
    fn test_download_url() {
        assert_eq!(
            WsjProvider::download_url("USSBX", AssetCategory::MutualFund, date()),
            "https://quotes.wsj.com/mutualfund/ussbx/historical-prices/download?MOD_VIEW=page&num_rows=3&range_days=3&startDate=2018-11-30&endDate=2018-12-01"
        );
        assert_eq!(
            WsjProvider::download_url("AAPL", AssetCategory::Stock, date()),
            "https://quotes.wsj.com/aapl/historical-prices/download?MOD_VIEW=page&num_rows=3&range_days=3&startDate=2018-11-30&endDate=2018-12-01"
        );
        assert!(WsjProvider::download_url("nasdaq", AssetCategory::Index, date())
            .starts_with("https://quotes.wsj.com/index/comp/"));
    }

    #[test]
    fn test_parse_csv_picks_requested_day() {
        let body = "Date, Open, High, Low, Close\n12/03/18, 10.16, 10.16, 10.16, 10.16\n11/30/18, 10.14, 10.15, 10.13, 10.14\n";
        let bar = parse_csv(body, date()).unwrap().unwrap();

        assert_eq!(bar.date, date());
        assert_eq!(bar.open, Some(dec!(10.14)));
        assert_eq!(bar.high, Some(dec!(10.15)));
        assert_eq!(bar.close, dec!(10.14));
        assert_eq!(bar.volume, None);
    }

    #[test]
    fn test_parse_csv_missing_day() {
        let body = "Date, Open, High, Low, Close\n12/03/18, 10.16, 10.16, 10.16, 10.16\n";
        assert_eq!(parse_csv(body, date()).unwrap(), None);
        assert_eq!(parse_csv("", date()).unwrap(), None);
    }
}
