//! Market data models
//!
//! This module contains the data types exchanged with providers:
//! - `types` - Type aliases for common identifiers (ProviderId)
//! - `category` - Asset category tags (AssetCategory)
//! - `price` - Daily price bar returned by a price lookup (PriceBar)
//! - `dividend` - Dividend distributions and the lookback period (Distribution, DividendPeriod)

mod category;
mod dividend;
mod price;
mod types;

pub use category::AssetCategory;
pub use dividend::{Distribution, DividendPeriod};
pub use price::PriceBar;
pub use types::ProviderId;
