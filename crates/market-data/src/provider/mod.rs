//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities and pacing configuration
//! - Concrete provider implementations (Yahoo, Tiingo, Stooq, WSJ, CNBC)
//!
//! Providers receive an already normalized request: an uppercase symbol, a
//! canonical [`AssetCategory`](crate::models::AssetCategory) and a calendar
//! date. Each one maps that onto its own endpoint and hands back a fixed
//! shape ([`PriceBar`](crate::models::PriceBar) or a list of
//! [`Distribution`](crate::models::Distribution)s).

mod capabilities;
mod http;
mod traits;

pub mod cnbc;
pub mod stooq;
pub mod tiingo;
pub mod wsj;
pub mod yahoo;

// Re-exports
pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::MarketDataProvider;
