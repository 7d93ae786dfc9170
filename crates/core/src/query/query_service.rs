//! Public query functions.
//!
//! Each query validates its arguments before touching the cache or the
//! network, then delegates to [`LookupService`]. Arguments are checked in a
//! fixed order: symbol, category, date format, then the past-date rule.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::debug;

use qfinance_market_data::AssetCategory;

use super::CellValue;
use crate::constants::VERSION;
use crate::errors::{Error, Result, ValidationError};
use crate::quotes::{normalize_category, LookupService, PriceField};
use crate::utils::dates::{normalize_date, DateInput};

/// Source of "today" for the past-date rule.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct QueryService {
    lookup: Arc<LookupService>,
    today: Clock,
}

impl QueryService {
    pub fn new(lookup: Arc<LookupService>) -> Self {
        Self {
            lookup,
            today: local_today,
        }
    }

    /// Replace the clock used for the past-date rule.
    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    pub fn get_version(&self) -> String {
        VERSION.to_string()
    }

    /// Ordered provider names for a category. Unknown categories get the
    /// stock list.
    pub fn get_configured_sources(&self, category: &str) -> Vec<String> {
        self.lookup.sources().lookup(category).to_vec()
    }

    pub async fn get_closing_price(&self, symbol: &str, category: &str, date: &DateInput) -> CellValue {
        self.price(symbol, category, date, PriceField::Close).await
    }

    pub async fn get_opening_price(&self, symbol: &str, category: &str, date: &DateInput) -> CellValue {
        self.price(symbol, category, date, PriceField::Open).await
    }

    pub async fn get_high_price(&self, symbol: &str, category: &str, date: &DateInput) -> CellValue {
        self.price(symbol, category, date, PriceField::High).await
    }

    pub async fn get_low_price(&self, symbol: &str, category: &str, date: &DateInput) -> CellValue {
        self.price(symbol, category, date, PriceField::Low).await
    }

    pub async fn get_day_volume(&self, symbol: &str, category: &str, date: &DateInput) -> CellValue {
        self.price(symbol, category, date, PriceField::Volume).await
    }

    pub async fn get_ttm_dividend(&self, symbol: &str, date: &DateInput) -> CellValue {
        let date = match self
            .validate_symbol(symbol)
            .and_then(|_| self.validate_date(date))
        {
            Ok(date) => date,
            Err(e) => return self.rejected(symbol, e),
        };
        match self.lookup.ttm_dividend_record(symbol, date).await {
            Ok(record) => record.map(|r| r.amount).into(),
            Err(e) => e.into(),
        }
    }

    async fn price(
        &self,
        symbol: &str,
        category: &str,
        date: &DateInput,
        field: PriceField,
    ) -> CellValue {
        let (category, date) = match self.validate_price_args(symbol, category, date) {
            Ok(args) => args,
            Err(e) => return self.rejected(symbol, e),
        };
        match self.lookup.price_record(symbol, category, date).await {
            Ok(record) => record.map(|r| r.value(field)).into(),
            Err(e) => e.into(),
        }
    }

    fn rejected(&self, symbol: &str, error: Error) -> CellValue {
        debug!("Rejected query for '{}': {}", symbol, error);
        error.into()
    }

    fn validate_price_args(
        &self,
        symbol: &str,
        category: &str,
        date: &DateInput,
    ) -> Result<(AssetCategory, NaiveDate)> {
        self.validate_symbol(symbol)?;
        let category = normalize_category(category)?;
        let date = self.validate_date(date)?;
        Ok((category, date))
    }

    fn validate_symbol(&self, symbol: &str) -> Result<()> {
        if symbol.trim().is_empty() {
            return Err(ValidationError::InvalidSymbol.into());
        }
        Ok(())
    }

    fn validate_date(&self, input: &DateInput) -> Result<NaiveDate> {
        let date = normalize_date(input)?
            .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))?;
        if date >= (self.today)() {
            return Err(ValidationError::DateMustBeInPast.into());
        }
        Ok(date)
    }
}
