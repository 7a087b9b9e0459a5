//! Rate limiting middleware using Governor.
//!
//! Implements per-user rate limiting with a token bucket algorithm.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

use budget_types::UserRef;

/// A user's token bucket and the last time it was checked.
struct UserLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    last_seen: Instant,
}

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-user rate limiters
    limiters: DashMap<String, UserLimiter>,
    /// Quota for new users
    quota: Quota,
    /// Time for an untouched bucket to refill completely
    refill: Duration,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .map(|quota| quota.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_minute(burst));

        Self {
            limiters: DashMap::new(),
            quota,
            refill: quota.replenish_interval() * quota.burst_size().get(),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let mut entry = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| UserLimiter {
                limiter: RateLimiter::direct(self.quota),
                last_seen: Instant::now(),
            });

        entry.last_seen = Instant::now();
        entry.limiter.check().is_ok()
    }

    /// Drops the buckets of users idle long enough for a full refill.
    ///
    /// A dropped bucket is indistinguishable from a fresh one, so eviction
    /// never grants extra requests. Returns the number of buckets removed.
    pub fn evict_idle(&self) -> usize {
        let before = self.limiters.len();
        self.limiters
            .retain(|_, entry| entry.last_seen.elapsed() < self.refill);
        before.saturating_sub(self.limiters.len())
    }

    /// Number of users currently holding a bucket.
    pub fn tracked_users(&self) -> usize {
        self.limiters.len()
    }

    /// Interval at which [`Self::evict_idle`] is worth running.
    pub fn sweep_interval(&self) -> Duration {
        self.refill.max(Duration::from_secs(1))
    }
}

/// Rate limiting middleware.
/// Expects the auth middleware to have stored the caller's [`UserRef`] first.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<UserRef>()
        .map(|user| user.uid.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    if !limiter.check(&key) {
        tracing::warn!(user = %key, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
