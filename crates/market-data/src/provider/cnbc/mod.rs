//! CNBC provider implementation.
//!
//! CNBC only exposes the current trailing twelve month dividend, embedded as
//! JSON in the quote page (`var symbolInfo = {...};`). It can therefore only
//! answer dividend requests for dates close to today. It has no price data.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{Distribution, DividendPeriod};
use crate::provider::http::{build_client, fetch_text};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const QUOTE_URL: &str = "https://www.cnbc.com/quotes/?symbol=";
pub const PROVIDER_ID: &str = "cnbc";

/// Default minimum interval between CNBC requests
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

/// How far back a request date may be and still be answered with today's figure
const MAX_AGE_DAYS: i64 = 30;

lazy_static! {
    static ref SYMBOL_INFO: Regex =
        Regex::new(r"(?s)var\s+symbolInfo\s*=\s*(\{.+?\}+?);").expect("valid symbolInfo pattern");
}

/// CNBC quote page scraper.
pub struct CnbcProvider {
    client: Client,
    pacing: Duration,
}

impl CnbcProvider {
    pub fn new(pacing: Duration) -> Self {
        Self {
            client: build_client(),
            pacing,
        }
    }
}

fn check_window(date: NaiveDate, today: NaiveDate) -> Result<(), MarketDataError> {
    if (today - date).num_days() > MAX_AGE_DAYS {
        return Err(MarketDataError::provider(
            PROVIDER_ID,
            format!(
                "only the trailing dividend of the most recent {} days is available",
                MAX_AGE_DAYS
            ),
        ));
    }
    Ok(())
}

/// Pull `FundamentalData.dividend` out of the quote page.
fn parse_dividend(page: &str) -> Result<Option<Decimal>, MarketDataError> {
    let payload = SYMBOL_INFO
        .captures(page)
        .and_then(|c| c.get(1))
        .ok_or_else(|| MarketDataError::invalid_response(PROVIDER_ID, "symbolInfo not found"))?;

    let info: Value = serde_json::from_str(payload.as_str())
        .map_err(|e| MarketDataError::invalid_response(PROVIDER_ID, e.to_string()))?;

    let dividend = info
        .get("FundamentalData")
        .and_then(|f| f.get("dividend"))
        .ok_or_else(|| {
            MarketDataError::invalid_response(PROVIDER_ID, "FundamentalData.dividend missing")
        })?;

    let amount = match dividend {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(amount)
}

#[async_trait]
impl MarketDataProvider for CnbcProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            categories: &[],
            supports_prices: false,
            supports_dividends: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::from_pacing(self.pacing)
    }

    async fn get_dividends(
        &self,
        symbol: &str,
        date: NaiveDate,
        _period: DividendPeriod,
    ) -> Result<Vec<Distribution>, MarketDataError> {
        check_window(date, Local::now().date_naive())?;

        let url = format!("{}{}", QUOTE_URL, urlencoding::encode(symbol));
        let page = fetch_text(&self.client, PROVIDER_ID, &url, &url).await?;

        match parse_dividend(&page)? {
            Some(amount) => Ok(vec![Distribution::new(None, amount)]),
            None => {
                debug!("CNBC reports no dividend for {}", symbol);
                Ok(Vec::new())
            }
        }
    }
}
