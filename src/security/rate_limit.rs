//! Rate limiting middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn try_acquire(&mut self, now: Instant, capacity: f64, refill_rate: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Buckets plus the time of the last idle sweep.
#[derive(Debug)]
struct Buckets {
    by_key: HashMap<String, TokenBucket>,
    last_sweep: Instant,
}

/// Per-key token buckets.
///
/// A bucket left alone for `burst / rps` seconds has refilled completely and
/// behaves exactly like a fresh one, so it is dropped on the next sweep.
/// Memory stays proportional to the clients seen within that window.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<Buckets>,
    clock: Arc<dyn Clock>,
    rps: f64,
    burst: f64,
    idle_after: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let rps = config.requests_per_second as f64;
        let burst = config.burst_size.max(1) as f64;
        let idle_after = if rps > 0.0 {
            Duration::from_secs_f64(burst / rps)
        } else {
            Duration::MAX
        };

        Self {
            buckets: Mutex::new(Buckets {
                by_key: HashMap::new(),
                last_sweep: clock.instant(),
            }),
            clock,
            rps,
            burst,
            idle_after,
        }
    }

    /// Take one token for `key`. Returns false when the bucket is empty.
    pub fn check(&self, key: &str) -> bool {
        let now = self.clock.instant();
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());

        if now.saturating_duration_since(buckets.last_sweep) >= self.idle_after {
            let idle_after = self.idle_after;
            buckets
                .by_key
                .retain(|_, b| now.saturating_duration_since(b.last_update) < idle_after);
            buckets.last_sweep = now;
        }

        let bucket = buckets
            .by_key
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst, now));

        bucket.try_acquire(now, self.burst, self.rps)
    }

    /// Keys currently holding a bucket.
    pub fn tracked_keys(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .by_key
            .len()
    }
}

fn client_key(request: &Request<Body>) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        let forwarded = forwarded.trim();
        if !forwarded.is_empty() {
            return forwarded.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware function for per-client rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if limiter.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited();
        (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
    }
}
