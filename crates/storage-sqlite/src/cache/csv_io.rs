//! Flat-file cache layout.
//!
//! `symbol_date.csv` holds prices and `ttmdividends.csv` holds trailing
//! dividend totals. The files carry no source column; imported records are
//! tagged [`IMPORT_SOURCE`].

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use qfinance_core::quotes::{DividendRecord, PriceRecord};
use qfinance_core::utils::dates::{format_iso, parse_date_text};

use crate::errors::StorageError;

pub const PRICE_FILE_NAME: &str = "symbol_date.csv";
pub const DIVIDEND_FILE_NAME: &str = "ttmdividends.csv";
pub const IMPORT_SOURCE: &str = "csv";

#[derive(Debug, Serialize, Deserialize)]
struct PriceRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open", default)]
    open: String,
    #[serde(rename = "High", default)]
    high: String,
    #[serde(rename = "Low", default)]
    low: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Volume", default)]
    volume: String,
    #[serde(rename = "Adj_Close", default)]
    adj_close: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DividendRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "CalcDate")]
    calc_date: String,
    #[serde(rename = "Amount")]
    amount: String,
}

/// Blank cells read as zero.
fn number(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn volume(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v as i64))
}

fn date(value: &str) -> Option<NaiveDate> {
    parse_date_text(value)
}

impl PriceRow {
    fn into_record(self) -> Option<PriceRecord> {
        Some(PriceRecord {
            date: date(&self.date)?,
            open: number(&self.open)?,
            high: number(&self.high)?,
            low: number(&self.low)?,
            close: number(&self.close)?,
            volume: volume(&self.volume)?,
            adj_close: number(&self.adj_close)?,
            symbol: self.symbol,
            source: IMPORT_SOURCE.to_string(),
        })
    }
}

impl From<&PriceRecord> for PriceRow {
    fn from(record: &PriceRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            date: format_iso(record.date),
            open: record.open.to_string(),
            high: record.high.to_string(),
            low: record.low.to_string(),
            close: record.close.to_string(),
            volume: record.volume.to_string(),
            adj_close: record.adj_close.to_string(),
        }
    }
}

impl DividendRow {
    fn into_record(self) -> Option<DividendRecord> {
        Some(DividendRecord {
            calc_date: date(&self.calc_date)?,
            amount: number(&self.amount)?,
            symbol: self.symbol,
            source: IMPORT_SOURCE.to_string(),
        })
    }
}

impl From<&DividendRecord> for DividendRow {
    fn from(record: &DividendRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            calc_date: format_iso(record.calc_date),
            amount: record.amount.to_string(),
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<usize, StorageError> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", count, path.display());
    Ok(count)
}

pub fn write_prices(dir: &Path, records: &[PriceRecord]) -> Result<usize, StorageError> {
    write_rows(&dir.join(PRICE_FILE_NAME), records.iter().map(PriceRow::from))
}

pub fn write_dividends(dir: &Path, records: &[DividendRecord]) -> Result<usize, StorageError> {
    write_rows(&dir.join(DIVIDEND_FILE_NAME), records.iter().map(DividendRow::from))
}

/// Read a legacy file. A missing file yields no rows; unreadable rows are
/// logged and skipped.
fn read_rows<T, R>(path: &Path, convert: impl Fn(T) -> Option<R>) -> Result<Vec<R>, StorageError>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        info!("{} not found, nothing to import", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<T>().enumerate() {
        match row.map(&convert) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => warn!("{}: row {} has an unreadable value", path.display(), line + 2),
            Err(e) => warn!("{}: row {}: {}", path.display(), line + 2, e),
        }
    }
    Ok(records)
}

pub fn read_prices(dir: &Path) -> Result<Vec<PriceRecord>, StorageError> {
    read_rows(&dir.join(PRICE_FILE_NAME), PriceRow::into_record)
}

pub fn read_dividends(dir: &Path) -> Result<Vec<DividendRecord>, StorageError> {
    read_rows(&dir.join(DIVIDEND_FILE_NAME), DividendRow::into_record)
}
