use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::constants::NOT_AVAILABLE;
use crate::errors::Error;

/// The value handed back to a spreadsheet cell.
///
/// Every query produces one of these. Failures are values too.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(Decimal),
    /// No configured source had data
    NotAvailable,
    /// Validation or storage failure, as a short message
    Error(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

impl From<Error> for CellValue {
    fn from(error: Error) -> Self {
        CellValue::Error(error.to_string())
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(CellValue::NotAvailable, CellValue::Number)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{}", value.normalize()),
            CellValue::NotAvailable => f.write_str(NOT_AVAILABLE),
            CellValue::Error(message) => f.write_str(message),
        }
    }
}

// Numbers serialize as JSON numbers, everything else as its display text.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(value) => Serialize::serialize(value, serializer),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(dec!(1.50)).to_string(), "1.5");
        assert_eq!(CellValue::Number(dec!(1000)).to_string(), "1000");
        assert_eq!(CellValue::NotAvailable.to_string(), "N/A");
        assert_eq!(
            CellValue::from(Error::from(ValidationError::InvalidSymbol)).to_string(),
            "Invalid ticker symbol"
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None), CellValue::NotAvailable);
        assert_eq!(
            CellValue::from(Some(dec!(2))).as_number(),
            Some(dec!(2))
        );
    }

    #[test]
    fn test_serialize_json() {
        assert_eq!(
            serde_json::to_string(&CellValue::Number(dec!(1.5))).unwrap(),
            "1.5"
        );
        assert_eq!(
            serde_json::to_string(&CellValue::NotAvailable).unwrap(),
            "\"N/A\""
        );
        assert_eq!(
            serde_json::to_string(&CellValue::Error("Invalid category".to_string())).unwrap(),
            "\"Invalid category\""
        );
    }
}
