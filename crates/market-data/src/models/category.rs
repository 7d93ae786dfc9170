use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset class of a price request.
///
/// Providers use it to pick an endpoint or to reject the request.
/// `Unspecified` is what an empty category string normalizes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Unspecified,
    Stock,
    Etf,
    #[serde(rename = "mutf")]
    MutualFund,
    Index,
}

impl AssetCategory {
    /// Canonical tag used in settings and logs. `Unspecified` is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Unspecified => "",
            AssetCategory::Stock => "stock",
            AssetCategory::Etf => "etf",
            AssetCategory::MutualFund => "mutf",
            AssetCategory::Index => "index",
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, AssetCategory::Index)
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
