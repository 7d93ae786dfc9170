//! Source priority table.
//!
//! Maps each category to the ordered provider names the lookup layer tries
//! on a cache miss. Earlier names are tried first.

use serde::{Deserialize, Serialize};

use super::category::SourceCategory;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn default_stock() -> Vec<String> {
    names(&["yahoo", "tiingo", "stooq", "wsj"])
}

fn default_etf() -> Vec<String> {
    names(&["yahoo", "tiingo", "wsj"])
}

fn default_mutf() -> Vec<String> {
    names(&["yahoo", "tiingo", "wsj"])
}

fn default_index() -> Vec<String> {
    names(&["yahoo", "stooq", "wsj"])
}

fn default_dividend() -> Vec<String> {
    names(&["yahoo", "tiingo", "cnbc"])
}

/// Per-category provider priority lists.
///
/// Keys missing from the settings file fall back to the built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePriorityTable {
    #[serde(default = "default_stock")]
    pub stock: Vec<String>,
    #[serde(default = "default_etf")]
    pub etf: Vec<String>,
    #[serde(default = "default_mutf", alias = "mutualfund")]
    pub mutf: Vec<String>,
    #[serde(default = "default_index")]
    pub index: Vec<String>,
    #[serde(default = "default_dividend")]
    pub dividend: Vec<String>,
}

impl Default for SourcePriorityTable {
    fn default() -> Self {
        Self {
            stock: default_stock(),
            etf: default_etf(),
            mutf: default_mutf(),
            index: default_index(),
            dividend: default_dividend(),
        }
    }
}

impl SourcePriorityTable {
    pub fn sources_for(&self, category: SourceCategory) -> &[String] {
        match category {
            SourceCategory::Stock => &self.stock,
            SourceCategory::Etf => &self.etf,
            SourceCategory::MutualFund => &self.mutf,
            SourceCategory::Index => &self.index,
            SourceCategory::Dividend => &self.dividend,
        }
    }

    /// Look up by a free-form category name. Unknown names get the stock list.
    pub fn lookup(&self, category: &str) -> &[String] {
        let category = SourceCategory::parse(category).unwrap_or(SourceCategory::Stock);
        self.sources_for(category)
    }
}
