//! Fixed minimum spacing between remote calls using governor

use governor::{
    clock::QuantaClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::time::Duration;

/// Rate limiter using governor crate
pub type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, QuantaClock>;

/// Serializes callers so that permits are at least `spacing` apart
pub struct Throttle {
    limiter: Option<DirectRateLimiter>,
}

impl Throttle {
    /// A zero spacing disables throttling
    pub fn new(spacing: Duration) -> Self {
        // burst of one: every permit after the first waits a full period
        let limiter = Quota::with_period(spacing).map(RateLimiter::direct);

        Self { limiter }
    }

    /// Wait until the next call is allowed
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
