use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::quotes::SourcePriorityTable;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_YAHOO_PACING_SECS: f64 = 0.2;
pub const DEFAULT_CNBC_PACING_SECS: f64 = 0.2;
pub const DEFAULT_WSJ_PACING_SECS: f64 = 0.2;
pub const DEFAULT_STOOQ_TICKER_POSTFIX: &str = ".us";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_yahoo_pacing() -> f64 {
    DEFAULT_YAHOO_PACING_SECS
}

fn default_cnbc_pacing() -> f64 {
    DEFAULT_CNBC_PACING_SECS
}

fn default_wsj_pacing() -> f64 {
    DEFAULT_WSJ_PACING_SECS
}

fn default_ticker_postfix() -> String {
    DEFAULT_STOOQ_TICKER_POSTFIX.to_string()
}

/// Convert a pacing value from the settings file. Negative or non-finite
/// values mean no pacing.
fn pacing(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// Contents of `qf.conf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding the cache database. `None` means the home directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    #[serde(default)]
    pub data_sources: SourcePriorityTable,
    #[serde(default)]
    pub tiingo: TiingoSettings,
    #[serde(default)]
    pub yahoo: YahooSettings,
    #[serde(default)]
    pub cnbc: CnbcSettings,
    #[serde(default)]
    pub stooq: StooqSettings,
    #[serde(default)]
    pub wsj: WsjSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cache_dir: None,
            data_sources: SourcePriorityTable::default(),
            tiingo: TiingoSettings::default(),
            yahoo: YahooSettings::default(),
            cnbc: CnbcSettings::default(),
            stooq: StooqSettings::default(),
            wsj: WsjSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TiingoSettings {
    #[serde(default)]
    pub api_token: String,
}

impl TiingoSettings {
    pub fn has_token(&self) -> bool {
        !self.api_token.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YahooSettings {
    #[serde(default = "default_yahoo_pacing")]
    pub pacing_secs: f64,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            pacing_secs: DEFAULT_YAHOO_PACING_SECS,
        }
    }
}

impl YahooSettings {
    pub fn pacing(&self) -> Duration {
        pacing(self.pacing_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnbcSettings {
    #[serde(default = "default_cnbc_pacing")]
    pub pacing_secs: f64,
}

impl Default for CnbcSettings {
    fn default() -> Self {
        Self {
            pacing_secs: DEFAULT_CNBC_PACING_SECS,
        }
    }
}

impl CnbcSettings {
    pub fn pacing(&self) -> Duration {
        pacing(self.pacing_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsjSettings {
    #[serde(default = "default_wsj_pacing")]
    pub pacing_secs: f64,
}

impl Default for WsjSettings {
    fn default() -> Self {
        Self {
            pacing_secs: DEFAULT_WSJ_PACING_SECS,
        }
    }
}

impl WsjSettings {
    pub fn pacing(&self) -> Duration {
        pacing(self.pacing_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StooqSettings {
    #[serde(default = "default_ticker_postfix")]
    pub ticker_postfix: String,
}

impl Default for StooqSettings {
    fn default() -> Self {
        Self {
            ticker_postfix: default_ticker_postfix(),
        }
    }
}

/// Partial update applied on top of loaded settings.
///
/// Used for environment overrides. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub log_level: Option<String>,
    pub cache_dir: Option<String>,
    pub tiingo_api_token: Option<String>,
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(level) = update.log_level {
            self.log_level = level;
        }
        if let Some(dir) = update.cache_dir {
            self.cache_dir = Some(dir);
        }
        if let Some(token) = update.tiingo_api_token {
            self.tiingo.api_token = token;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.stooq.ticker_postfix, ".us");
        assert!(!settings.tiingo.has_token());
    }

    #[test]
    fn test_partial_file() {
        let json = r#"{
            "log_level": "debug",
            "tiingo": { "api_token": "abc" },
            "yahoo": { "pacing_secs": 1.5 },
            "data_sources": { "index": ["stooq"] }
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.log_level, "debug");
        assert!(settings.tiingo.has_token());
        assert_eq!(settings.yahoo.pacing(), Duration::from_millis(1500));
        assert_eq!(settings.data_sources.index, vec!["stooq".to_string()]);
        assert_eq!(settings.data_sources.stock.len(), 4);
    }

    #[test]
    fn test_negative_pacing_is_zero() {
        let wsj = WsjSettings { pacing_secs: -1.0 };
        assert_eq!(wsj.pacing(), Duration::ZERO);
    }

    #[test]
    fn test_apply_update() {
        let mut settings = Settings::default();
        settings.apply(SettingsUpdate {
            log_level: Some("warn".to_string()),
            cache_dir: None,
            tiingo_api_token: Some("token".to_string()),
        });

        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.cache_dir, None);
        assert_eq!(settings.tiingo.api_token, "token");
    }
}
