//! Tests for the fixed window rate limiter

use std::sync::Arc;
use std::time::Duration;

use mgw_domain::ports::{ManualClock, SharedClock};
use mgw_server::rate_limit::{RateDecision, RateLimiter};
use rocket::http::Status;

const WINDOW: Duration = Duration::from_secs(60);

fn limiter(max_requests: u32) -> (RateLimiter, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let shared: SharedClock = clock.clone();
    (RateLimiter::new(true, max_requests, WINDOW, shared), clock)
}

#[test]
fn test_request_past_ceiling_is_limited() {
    let (limiter, clock) = limiter(3);

    for expected_remaining in [2, 1, 0] {
        match limiter.check("10.0.0.1") {
            RateDecision::Allowed { remaining, limit, .. } => {
                assert_eq!(remaining, expected_remaining);
                assert_eq!(limit, 3);
            }
            other => panic!("expected allowed, got {other:?}"),
        }
    }

    clock.advance(Duration::from_secs(10));
    match limiter.check("10.0.0.1") {
        RateDecision::Limited {
            retry_after_secs, ..
        } => {
            assert!(retry_after_secs >= 1);
            assert!(retry_after_secs <= WINDOW.as_secs());
            assert_eq!(retry_after_secs, 50);
        }
        other => panic!("expected limited, got {other:?}"),
    }
}

#[test]
fn test_new_window_restores_quota() {
    let (limiter, clock) = limiter(1);
    assert!(!limiter.check("client").is_limited());
    assert!(limiter.check("client").is_limited());

    clock.advance(WINDOW);
    match limiter.check("client") {
        RateDecision::Allowed {
            remaining,
            reset_secs,
            ..
        } => {
            assert_eq!(remaining, 0);
            assert_eq!(reset_secs, WINDOW.as_secs());
        }
        other => panic!("expected allowed after window, got {other:?}"),
    }
}

#[test]
fn test_clients_are_counted_separately() {
    let (limiter, _clock) = limiter(1);
    assert!(!limiter.check("a").is_limited());
    assert!(!limiter.check("b").is_limited());
    assert!(limiter.check("a").is_limited());
}

#[test]
fn test_disabled_limiter_never_limits() {
    let limiter = RateLimiter::new(false, 1, WINDOW, Arc::new(ManualClock::new()));
    for _ in 0..10 {
        assert_eq!(limiter.check("client"), RateDecision::Unlimited);
    }
    assert_eq!(limiter.tracked(), 0);
}

#[test]
fn test_expired_buckets_are_pruned() {
    let (limiter, clock) = limiter(5);
    limiter.check("stale");
    assert_eq!(limiter.tracked(), 1);

    clock.advance(WINDOW + Duration::from_secs(1));
    limiter.check("fresh");
    assert_eq!(limiter.tracked(), 1);
}

#[test]
fn test_limited_decision_renders_429() {
    let (limiter, _clock) = limiter(0);
    let rejection = limiter.check("client").into_result().unwrap_err();

    assert_eq!(rejection.status, Status::TooManyRequests);
    assert_eq!(rejection.code, "rate_limited");
    assert_eq!(rejection.details["retryAfter"], 60);
    assert!(
        rejection
            .headers
            .iter()
            .any(|(name, value)| *name == "Retry-After" && value == "60")
    );
}

#[test]
fn test_allowed_decision_headers() {
    let (limiter, _clock) = limiter(10);
    let headers = limiter.check("client").headers();
    let names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        ["X-RateLimit-Limit", "X-RateLimit-Remaining", "X-RateLimit-Reset"]
    );
    assert_eq!(headers[1].1, "9");
}
