//! Provider registry module.
//!
//! This module provides orchestration for market data providers:
//! - Registration by lowercase name
//! - Ordered scan over a source list with first-hit-wins fallback
//! - Request pacing per provider
//! - Per-scan attempt diagnostics

mod rate_limiter;
mod registry;
mod skip_reason;

pub use rate_limiter::RateLimiter;
pub use registry::{ProviderHit, ProviderRegistry};
pub use skip_reason::{AttemptOutcome, FetchDiagnostics, ProviderAttempt, SkipReason};
