//! QFinance Market Data Crate
//!
//! This crate provides the data source adapters used to answer historical
//! price and dividend lookups, and the registry that walks a per-category
//! list of them.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Source list    |  ["yahoo", "tiingo", "stooq", "wsj"]
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ProviderRegistry |  (ordered scan, pacing, diagnostics)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (Yahoo, Tiingo, Stooq, WSJ, CNBC)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | PriceBar / Dist. |  (fixed shape, no provider field names)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`AssetCategory`] - Asset class of a price request
//! - [`PriceBar`] - One trading day as reported by a provider
//! - [`Distribution`] - One dividend payment
//! - [`MarketDataProvider`] - The adapter trait

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;

pub use models::{AssetCategory, Distribution, DividendPeriod, PriceBar, ProviderId};

pub use provider::cnbc::CnbcProvider;
pub use provider::stooq::StooqProvider;
pub use provider::tiingo::TiingoProvider;
pub use provider::wsj::WsjProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

pub use registry::{
    AttemptOutcome, FetchDiagnostics, ProviderAttempt, ProviderHit, ProviderRegistry, RateLimiter,
    SkipReason,
};
