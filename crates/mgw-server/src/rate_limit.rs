//! Per-client rate limiting
//!
//! Fixed window counters keyed by client address. A request that finds its
//! window expired starts a new one with a count of 1; otherwise the count is
//! incremented. Once the count passes the ceiling the client gets 429 until
//! the window ends. Expired buckets are pruned during calls, at most once per
//! window.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use mgw_domain::ports::SharedClock;
use mgw_infrastructure::config::RateLimitConfig;
use rocket::http::Status;
use tracing::{debug, warn};

use crate::constants::{
    RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
    RETRY_AFTER_HEADER,
};
use crate::rejection::Rejection;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    window_end: Instant,
}

/// Outcome of [`RateLimiter::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Limiting is disabled
    Unlimited,
    Allowed {
        limit: u32,
        remaining: u32,
        reset_secs: u64,
    },
    Limited {
        limit: u32,
        retry_after_secs: u64,
    },
}

impl RateDecision {
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }

    /// `X-RateLimit-*` headers for an admitted request
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Allowed {
                limit,
                remaining,
                reset_secs,
            } => vec![
                (RATE_LIMIT_LIMIT_HEADER, limit.to_string()),
                (RATE_LIMIT_REMAINING_HEADER, remaining.to_string()),
                (RATE_LIMIT_RESET_HEADER, reset_secs.to_string()),
            ],
            Self::Unlimited | Self::Limited { .. } => Vec::new(),
        }
    }

    /// Turn a limited decision into a 429 rejection
    pub fn into_result(self) -> Result<Self, Rejection> {
        match self {
            Self::Limited {
                limit,
                retry_after_secs,
            } => Err(Rejection::new(
                Status::TooManyRequests,
                "rate_limited",
                format!("Rate limit of {limit} requests exceeded, retry in {retry_after_secs}s"),
            )
            .with_detail("retryAfter", retry_after_secs)
            .with_header(RETRY_AFTER_HEADER, retry_after_secs.to_string())
            .with_header(RATE_LIMIT_LIMIT_HEADER, limit.to_string())
            .with_header(RATE_LIMIT_REMAINING_HEADER, "0")),
            other => Ok(other),
        }
    }
}

/// Fixed window limiter shared by every gateway route but `/health`
pub struct RateLimiter {
    enabled: bool,
    max_requests: u32,
    window: Duration,
    clock: SharedClock,
    buckets: DashMap<String, Bucket>,
    next_prune: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(enabled: bool, max_requests: u32, window: Duration, clock: SharedClock) -> Self {
        let next_prune = Mutex::new(clock.now() + window);
        Self {
            enabled,
            max_requests,
            window,
            clock,
            buckets: DashMap::new(),
            next_prune,
        }
    }

    pub fn from_config(config: &RateLimitConfig, clock: SharedClock) -> Self {
        Self::new(config.enabled, config.max_requests, config.window(), clock)
    }

    /// Count one request from `key`
    pub fn check(&self, key: &str) -> RateDecision {
        if !self.enabled {
            return RateDecision::Unlimited;
        }
        let now = self.clock.now();
        self.prune_expired(now);

        let bucket = {
            let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
                count: 0,
                window_end: now + self.window,
            });
            if now >= bucket.window_end {
                bucket.count = 1;
                bucket.window_end = now + self.window;
            } else {
                bucket.count = bucket.count.saturating_add(1);
            }
            *bucket
        };

        let reset_secs = ceil_secs(bucket.window_end.saturating_duration_since(now));
        if bucket.count > self.max_requests {
            warn!(client = key, count = bucket.count, "Rate limit exceeded");
            RateDecision::Limited {
                limit: self.max_requests,
                retry_after_secs: reset_secs.clamp(1, self.window.as_secs().max(1)),
            }
        } else {
            RateDecision::Allowed {
                limit: self.max_requests,
                remaining: self.max_requests - bucket.count,
                reset_secs,
            }
        }
    }

    /// Number of tracked clients
    pub fn tracked(&self) -> usize {
        self.buckets.len()
    }

    fn prune_expired(&self, now: Instant) {
        {
            let mut next = self.next_prune.lock().unwrap_or_else(PoisonError::into_inner);
            if now < *next {
                return;
            }
            *next = now + self.window;
        }
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| bucket.window_end > now);
        let pruned = before.saturating_sub(self.buckets.len());
        if pruned > 0 {
            debug!(pruned, "Pruned expired rate limit buckets");
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
