use std::path::PathBuf;

use qfinance_core::settings::{home_dir, Settings, SettingsUpdate};

/// Process-level configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub home_dir: PathBuf,
    pub cache_dir: Option<String>,
    pub log_level: Option<String>,
    pub log_format: String,
    pub tiingo_api_token: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self {
            home_dir: home_dir()?,
            cache_dir: non_empty("QF_CACHE_DIR"),
            log_level: non_empty("QF_LOG_LEVEL"),
            log_format: non_empty("QF_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            tiingo_api_token: non_empty("QF_TIINGO_API_TOKEN"),
        })
    }

    /// Environment values that take precedence over `qf.conf`.
    pub fn overrides(&self) -> SettingsUpdate {
        SettingsUpdate {
            log_level: self.log_level.clone(),
            cache_dir: self.cache_dir.clone(),
            tiingo_api_token: self.tiingo_api_token.clone(),
        }
    }

    /// Where the cache database lives.
    pub fn cache_dir(&self, settings: &Settings) -> PathBuf {
        settings
            .cache_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.home_dir.clone())
    }
}
