use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single dividend distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Ex-dividend date, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_date: Option<NaiveDate>,

    /// Cash amount per share
    pub amount: Decimal,
}

impl Distribution {
    pub fn new(ex_date: Option<NaiveDate>, amount: Decimal) -> Self {
        Self { ex_date, amount }
    }
}

/// Lookback window for a dividend request, ending at the requested date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DividendPeriod {
    /// Trailing twelve months ("1y")
    #[default]
    #[serde(rename = "1y")]
    OneYear,
}

impl DividendPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DividendPeriod::OneYear => "1y",
        }
    }

    /// First day of the window (exclusive) for a window ending on `end`.
    /// `None` when the window would start before the earliest representable date.
    pub fn window_start(&self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            DividendPeriod::OneYear => end.checked_sub_signed(Duration::days(365)),
        }
    }

    /// First day inside the window ending on `end`.
    pub fn first_day(&self, end: NaiveDate) -> Option<NaiveDate> {
        self.window_start(end).and_then(|start| start.succ_opt())
    }

    /// True if `date` falls inside the window `(end - period, end]`.
    pub fn contains(&self, end: NaiveDate, date: NaiveDate) -> bool {
        self.window_start(end).is_some_and(|start| date > start) && date <= end
    }
}
