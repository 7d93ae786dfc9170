//! Token bucket pacing for market data providers.
//!
//! Each provider gets its own bucket, sized from the provider's
//! [`RateLimit`]. A provider paced at one request every 0.2 s gets a bucket
//! of one token refilled 5 times per second.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::models::ProviderId;
use crate::provider::RateLimit;

/// Token bucket for a single provider.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Refill rate in tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn from_limit(limit: &RateLimit) -> Self {
        let capacity = f64::from(limit.burst.max(1));
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: f64::from(limit.requests_per_minute.max(1)) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

/// Per-provider request pacer.
///
/// Buckets are created on first use from the configured limit, or from
/// [`RateLimit::default`] for providers that were never configured.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    limits: Mutex<HashMap<String, RateLimit>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            limits: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the buckets mutex, recovering from poison if necessary.
    ///
    /// A poisoned pacer only risks slightly wrong spacing between requests.
    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter buckets mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_limits(&self) -> MutexGuard<'_, HashMap<String, RateLimit>> {
        self.limits.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter limits mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Set the limit for a provider, discarding any existing bucket.
    pub fn configure(&self, provider: &ProviderId, limit: RateLimit) {
        self.lock_limits().insert(provider.to_string(), limit);
        self.lock_buckets().remove(provider.as_ref());
    }

    /// Wait until the provider may be called.
    pub async fn acquire(&self, provider: &ProviderId) {
        loop {
            let wait_time = {
                let mut buckets = self.lock_buckets();
                let bucket = buckets
                    .entry(provider.to_string())
                    .or_insert_with(|| self.create_bucket(provider));

                if bucket.try_acquire() {
                    return;
                }
                bucket.time_until_available()
            };

            if wait_time > Duration::ZERO {
                debug!("Pacing {:?} before calling '{}'", wait_time, provider);
                tokio::time::sleep(wait_time).await;
            }
        }
    }

    /// Take a token without waiting. Returns false if the provider must wait.
    pub fn try_acquire(&self, provider: &ProviderId) -> bool {
        let mut buckets = self.lock_buckets();
        buckets
            .entry(provider.to_string())
            .or_insert_with(|| self.create_bucket(provider))
            .try_acquire()
    }

    fn create_bucket(&self, provider: &ProviderId) -> TokenBucket {
        let limits = self.lock_limits();
        match limits.get(provider.as_ref()) {
            Some(limit) => TokenBucket::from_limit(limit),
            None => TokenBucket::from_limit(&RateLimit::default()),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
