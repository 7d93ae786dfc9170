//! Database models for the cache tables.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use qfinance_core::quotes::{DividendRecord, PriceRecord};
use qfinance_core::utils::dates::{format_iso, ISO_DATE_FORMAT};

use crate::errors::StorageError;

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| StorageError::CorruptRecord(format!("{} '{}': {}", column, value, e)))
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .map_err(|e| StorageError::CorruptRecord(format!("{} '{}': {}", column, value, e)))
}

/// Row of `price_cache`. Decimals are stored as TEXT.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::price_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceCacheDB {
    pub symbol: String,
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
    pub adj_close: String,
    pub source: String,
    pub created_at: String,
}

impl From<&PriceRecord> for PriceCacheDB {
    fn from(record: &PriceRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            date: format_iso(record.date),
            open: record.open.to_string(),
            high: record.high.to_string(),
            low: record.low.to_string(),
            close: record.close.to_string(),
            volume: record.volume,
            adj_close: record.adj_close.to_string(),
            source: record.source.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl TryFrom<PriceCacheDB> for PriceRecord {
    type Error = StorageError;

    fn try_from(row: PriceCacheDB) -> Result<Self, Self::Error> {
        Ok(PriceRecord {
            date: parse_date("date", &row.date)?,
            open: parse_decimal("open", &row.open)?,
            high: parse_decimal("high", &row.high)?,
            low: parse_decimal("low", &row.low)?,
            close: parse_decimal("close", &row.close)?,
            volume: row.volume,
            adj_close: parse_decimal("adj_close", &row.adj_close)?,
            symbol: row.symbol,
            source: row.source,
        })
    }
}

/// Row of `ttm_dividend_cache`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::ttm_dividend_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DividendCacheDB {
    pub symbol: String,
    pub calc_date: String,
    pub amount: String,
    pub source: String,
    pub created_at: String,
}

impl From<&DividendRecord> for DividendCacheDB {
    fn from(record: &DividendRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            calc_date: format_iso(record.calc_date),
            amount: record.amount.to_string(),
            source: record.source.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl TryFrom<DividendCacheDB> for DividendRecord {
    type Error = StorageError;

    fn try_from(row: DividendCacheDB) -> Result<Self, Self::Error> {
        Ok(DividendRecord {
            calc_date: parse_date("calc_date", &row.calc_date)?,
            amount: parse_decimal("amount", &row.amount)?,
            symbol: row.symbol,
            source: row.source,
        })
    }
}
