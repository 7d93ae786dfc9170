//! Date normalization for spreadsheet inputs.
//!
//! A spreadsheet hands dates over in several shapes: a serial number
//! (days since 1899-12-30, with an optional time-of-day fraction), an ISO
//! `YYYY-MM-DD` string, a US `M/D/YY` string, or an empty cell. Everything
//! past this module works with `NaiveDate`.

use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::errors::ValidationError;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
pub const SERIAL_UNIX_EPOCH_OFFSET: i64 = 25569;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const US_DATE_FORMAT: &str = "%m/%d/%y";

/// Two-digit years at or above this pivot belong to the 1900s ("69" is 1969).
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

/// Range of calendar years a date argument may fall in.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

/// A date argument as received from the host.
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    /// Spreadsheet serial date
    Serial(f64),
    /// Text cell
    Text(String),
    /// Boolean cell
    Boolean(bool),
    /// Empty cell
    Empty,
}

impl DateInput {
    /// Interpret a command-line argument: numbers are serials, anything else is text.
    pub fn from_arg(arg: &str) -> Self {
        match arg.trim().parse::<f64>() {
            Ok(serial) => DateInput::Serial(serial),
            Err(_) => DateInput::Text(arg.to_string()),
        }
    }

    /// Name of the input's type, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DateInput::Serial(_) => "serial",
            DateInput::Text(_) => "text",
            DateInput::Boolean(_) => "boolean",
            DateInput::Empty => "empty",
        }
    }
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateInput::Serial(v) => write!(f, "{}", v),
            DateInput::Text(s) => f.write_str(s),
            DateInput::Boolean(b) => write!(f, "{}", b),
            DateInput::Empty => Ok(()),
        }
    }
}

impl From<f64> for DateInput {
    fn from(serial: f64) -> Self {
        DateInput::Serial(serial)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Text(format_iso(date))
    }
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Convert a spreadsheet serial to a calendar date. The fraction is ignored.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor() as i64 - SERIAL_UNIX_EPOCH_OFFSET;
    unix_epoch().checked_add_signed(Duration::try_days(days)?)
}

/// Convert a calendar date to its whole-day spreadsheet serial.
pub fn date_to_serial(date: NaiveDate) -> f64 {
    ((date - unix_epoch()).num_days() + SERIAL_UNIX_EPOCH_OFFSET) as f64
}

/// Today's serial in the host's local time zone.
pub fn today_serial() -> f64 {
    date_to_serial(Local::now().date_naive())
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse an ISO or US-format date string.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, ISO_DATE_FORMAT) {
        return Some(date);
    }
    let date = NaiveDate::parse_from_str(text, US_DATE_FORMAT).ok()?;
    // chrono reads "69".."99" as 2069..2099
    if date.year() >= 2000 + TWO_DIGIT_YEAR_PIVOT {
        date.with_year(date.year() - 100)
    } else {
        Some(date)
    }
}

fn in_range(date: NaiveDate) -> Option<NaiveDate> {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(date)
}

/// Normalize a host date argument.
///
/// Returns `Ok(None)` for "no date": a serial of exactly 0, empty text or
/// an empty cell. Text in neither accepted format, or any date outside
/// `MIN_YEAR..=MAX_YEAR`, fails with `InvalidDate`; any other kind of value
/// fails with `InvalidDateFormat`.
pub fn normalize_date(input: &DateInput) -> Result<Option<NaiveDate>, ValidationError> {
    match input {
        DateInput::Serial(serial) if *serial == 0.0 => Ok(None),
        DateInput::Serial(serial) => serial_to_date(*serial)
            .and_then(in_range)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidDate(serial.to_string())),
        DateInput::Text(text) if text.trim().is_empty() => Ok(None),
        DateInput::Text(text) => parse_date_text(text)
            .and_then(in_range)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidDate(text.clone())),
        DateInput::Empty => Ok(None),
        DateInput::Boolean(_) => Err(ValidationError::InvalidDateFormat {
            value: input.to_string(),
            kind: input.kind(),
        }),
    }
}
