use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qfinance_core::settings::{Settings, SettingsStore};
use qfinance_core::{build_registry, LookupService, QueryService};
use qfinance_storage_sqlite::SqliteCache;

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

pub fn load_settings(config: &Config) -> anyhow::Result<Settings> {
    let mut settings = SettingsStore::in_dir(&config.home_dir).load_or_create()?;
    settings.apply(config.overrides());
    Ok(settings)
}

pub struct AppState {
    pub cache: SqliteCache,
    pub queries: QueryService,
}

pub fn build_state(config: &Config, settings: &Settings) -> anyhow::Result<AppState> {
    let cache_dir = config.cache_dir(settings);
    let cache = SqliteCache::open(&cache_dir)?;
    tracing::info!("Cache directory in use: {}", cache_dir.display());

    let registry = build_registry(settings);
    let lookup = LookupService::new(
        cache.prices.clone(),
        cache.dividends.clone(),
        Arc::new(registry),
        settings.data_sources.clone(),
    );

    Ok(AppState {
        cache,
        queries: QueryService::new(Arc::new(lookup)),
    })
}
