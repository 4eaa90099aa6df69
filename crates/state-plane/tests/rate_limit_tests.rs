use std::time::Duration;

use state_plane::{RateLimitConfig, SlidingWindowRateLimiter};

fn limiter(max_requests: u32) -> SlidingWindowRateLimiter {
    SlidingWindowRateLimiter::new(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(60),
    })
}

#[test]
fn admits_up_to_limit_within_window() {
    let limiter = limiter(30);
    for _ in 0..30 {
        assert!(limiter.allow_at("c1", 0));
    }
    assert!(!limiter.allow_at("c1", 0));
    assert!(limiter.allow_at("c1", 61_000));
}

#[test]
fn denied_attempts_are_not_recorded() {
    let limiter = limiter(1);
    assert!(limiter.allow_at("c1", 0));
    for offset in 1..100 {
        assert!(!limiter.allow_at("c1", offset));
    }
    // Only the admitted request occupies the window, so capacity frees up
    // exactly when it ages out.
    assert!(limiter.allow_at("c1", 60_000));
}

#[test]
fn window_slides_as_entries_age() {
    let limiter = limiter(2);
    assert!(limiter.allow_at("c1", 0));
    assert!(limiter.allow_at("c1", 30_000));
    assert!(!limiter.allow_at("c1", 40_000));
    assert!(limiter.allow_at("c1", 60_001));
    assert!(!limiter.allow_at("c1", 60_002));
}

#[test]
fn clients_are_limited_independently() {
    let limiter = limiter(1);
    assert!(limiter.allow_at("c1", 0));
    assert!(limiter.allow_at("c2", 0));
    assert!(!limiter.allow_at("c1", 1));
}

#[test]
fn evict_idle_drops_aged_windows() {
    let limiter = limiter(5);
    assert!(limiter.allow_at("c1", 0));
    assert!(limiter.allow_at("c2", 90_000));
    assert_eq!(limiter.tracked_clients(), 2);

    limiter.evict_idle_at(120_000);
    assert_eq!(limiter.tracked_clients(), 1);
}
