//! Category normalization.

use std::fmt;

use qfinance_market_data::AssetCategory;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Parse a user-supplied category tag.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// `mutf` and `mutualfund` name the same category.
pub fn normalize_category(input: &str) -> Result<AssetCategory, ValidationError> {
    match input.trim().to_lowercase().as_str() {
        "" => Ok(AssetCategory::Unspecified),
        "stock" => Ok(AssetCategory::Stock),
        "etf" => Ok(AssetCategory::Etf),
        "mutf" | "mutualfund" => Ok(AssetCategory::MutualFund),
        "index" => Ok(AssetCategory::Index),
        _ => Err(ValidationError::InvalidCategory(input.to_string())),
    }
}

/// Key into the source priority table.
///
/// The price categories plus the dividend lookup, which has its own list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    Stock,
    Etf,
    #[serde(rename = "mutf", alias = "mutualfund")]
    MutualFund,
    Index,
    Dividend,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Stock => "stock",
            SourceCategory::Etf => "etf",
            SourceCategory::MutualFund => "mutf",
            SourceCategory::Index => "index",
            SourceCategory::Dividend => "dividend",
        }
    }

    /// Parse a table key. Unknown names yield `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "stock" => Some(SourceCategory::Stock),
            "etf" => Some(SourceCategory::Etf),
            "mutf" | "mutualfund" => Some(SourceCategory::MutualFund),
            "index" => Some(SourceCategory::Index),
            "dividend" => Some(SourceCategory::Dividend),
            _ => None,
        }
    }
}

impl From<AssetCategory> for SourceCategory {
    fn from(category: AssetCategory) -> Self {
        match category {
            AssetCategory::Unspecified | AssetCategory::Stock => SourceCategory::Stock,
            AssetCategory::Etf => SourceCategory::Etf,
            AssetCategory::MutualFund => SourceCategory::MutualFund,
            AssetCategory::Index => SourceCategory::Index,
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category_accepts_known_tags() {
        assert_eq!(normalize_category("").unwrap(), AssetCategory::Unspecified);
        assert_eq!(normalize_category("Stock").unwrap(), AssetCategory::Stock);
        assert_eq!(normalize_category("ETF").unwrap(), AssetCategory::Etf);
        assert_eq!(normalize_category("index").unwrap(), AssetCategory::Index);
    }

    #[test]
    fn test_mutf_aliases_are_one_category() {
        assert_eq!(
            normalize_category("mutf").unwrap(),
            normalize_category("MutualFund").unwrap()
        );
    }

    #[test]
    fn test_normalize_category_rejects_unknown() {
        assert_eq!(
            normalize_category("bond"),
            Err(ValidationError::InvalidCategory("bond".to_string()))
        );
    }

    #[test]
    fn test_unspecified_uses_stock_sources() {
        assert_eq!(SourceCategory::from(AssetCategory::Unspecified), SourceCategory::Stock);
        assert_eq!(SourceCategory::parse("mutualfund"), Some(SourceCategory::MutualFund));
        assert_eq!(SourceCategory::parse("crypto"), None);
    }
}
