//! Provider bootstrap.
//!
//! Builds the market-data [`ProviderRegistry`] from the loaded settings.
//!
//! ```text
//! Settings ──▶ build_registry ──▶ ProviderRegistry
//!                                   ├─ yahoo   (pacing)
//!                                   ├─ tiingo  (only with an API token)
//!                                   ├─ stooq   (ticker postfix)
//!                                   ├─ wsj     (pacing)
//!                                   └─ cnbc    (pacing)
//! ```

use std::sync::Arc;

use log::{info, warn};

use qfinance_market_data::{
    CnbcProvider, MarketDataProvider, ProviderRegistry, StooqProvider, TiingoProvider,
    WsjProvider, YahooProvider,
};

use crate::settings::Settings;

/// Create every provider the settings allow and register them.
///
/// A provider that fails to initialize is logged and left out, so lookups
/// fall through to the remaining sources.
pub fn build_registry(settings: &Settings) -> ProviderRegistry {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

    match YahooProvider::new(settings.yahoo.pacing()) {
        Ok(provider) => providers.push(Arc::new(provider)),
        Err(e) => warn!("Failed to initialize yahoo provider: {}", e),
    }

    if settings.tiingo.has_token() {
        providers.push(Arc::new(TiingoProvider::new(
            settings.tiingo.api_token.trim().to_string(),
        )));
    } else {
        info!("No tiingo API token configured, tiingo disabled");
    }

    providers.push(Arc::new(StooqProvider::new(
        settings.stooq.ticker_postfix.clone(),
    )));
    providers.push(Arc::new(WsjProvider::new(settings.wsj.pacing())));
    providers.push(Arc::new(CnbcProvider::new(settings.cnbc.pacing())));

    let registry = ProviderRegistry::new(providers);
    info!(
        "Initialized data sources: {}",
        registry.provider_ids().join(", ")
    );
    registry
}
