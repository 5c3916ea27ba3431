//! Adaptive caching behavior observed through a real source client.

use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use user_fanout::infrastructure::mocks::{MockClock, MockTransport};
use user_fanout::{
    MemoryCache, RateLimitBudget, ReqresClient, ReqresConfig, SourceClient,
};

fn reqres_body(id: i64) -> String {
    json!({
        "page": 1,
        "per_page": 1,
        "total": 12,
        "total_pages": 12,
        "data": [{"id": id, "email": "u@example.com", "first_name": "U",
                  "last_name": "Ser", "avatar": ""}]
    })
    .to_string()
}

fn client_with_budget(
    transport: Arc<MockTransport>,
    clock: Arc<MockClock>,
    budget: RateLimitBudget,
) -> ReqresClient {
    let config = ReqresConfig {
        rate_limit: budget,
        cache_duration: Duration::from_secs(3600),
        ..ReqresConfig::default()
    };
    ReqresClient::new(
        config,
        transport,
        Arc::new(MemoryCache::new(clock.clone())),
        clock,
    )
}

#[test]
fn test_repeat_fetch_within_lifetime_issues_one_transport_call() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_body(reqres_body(1));
    let clock = Arc::new(MockClock::new(Instant::now()));
    let client = client_with_budget(
        transport.clone(),
        clock,
        RateLimitBudget::new(60, Duration::from_secs(3600), 60),
    );

    let first = client.fetch_page(1, 1).unwrap();
    let second = client.fetch_page(1, 1).unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_expired_entry_triggers_a_refetch() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_body(reqres_body(1));
    transport.enqueue_body(reqres_body(2));
    let clock = Arc::new(MockClock::new(Instant::now()));
    let client = client_with_budget(
        transport.clone(),
        clock.clone(),
        RateLimitBudget::new(60, Duration::from_secs(3600), 60),
    );

    client.fetch_page(1, 1).unwrap();
    clock.advance(Duration::from_secs(3601));
    let refetched = client.fetch_page(1, 1).unwrap();

    assert_eq!(transport.call_count(), 2);
    assert_eq!(refetched.records()[0]["id"], 2);
}

#[test]
fn test_scarce_quota_doubles_the_lifetime() {
    // 5 of 60 remaining is under the reqres threshold of 0.2.
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_body(reqres_body(1));
    let clock = Arc::new(MockClock::new(Instant::now()));
    let client = client_with_budget(
        transport.clone(),
        clock.clone(),
        RateLimitBudget::new(60, Duration::from_secs(3600), 5),
    );

    client.fetch_page(1, 1).unwrap();

    // Past the base lifetime, inside the doubled one: still a cache hit.
    clock.advance(Duration::from_secs(3600 + 60));
    client.fetch_page(1, 1).unwrap();
    assert_eq!(transport.call_count(), 1);

    // Past the doubled lifetime: genuinely expired.
    clock.advance(Duration::from_secs(3600 + 60));
    transport.enqueue_body(reqres_body(2));
    client.fetch_page(1, 1).unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_plentiful_quota_keeps_the_base_lifetime() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_body(reqres_body(1));
    transport.enqueue_body(reqres_body(2));
    let clock = Arc::new(MockClock::new(Instant::now()));
    let client = client_with_budget(
        transport.clone(),
        clock.clone(),
        RateLimitBudget::new(60, Duration::from_secs(3600), 60),
    );

    client.fetch_page(1, 1).unwrap();
    clock.advance(Duration::from_secs(3600 + 60));
    client.fetch_page(1, 1).unwrap();

    // Base lifetime only: the second fetch went upstream.
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_lifetime_is_monotone_as_quota_shrinks() {
    let base = Duration::from_secs(3600);
    let threshold = 0.2;

    let mut previous = Duration::ZERO;
    for remaining in (0..=60u32).rev() {
        let lifetime =
            RateLimitBudget::new(60, base, remaining).cache_lifetime(base, threshold);
        assert!(
            lifetime >= previous,
            "lifetime shrank as remaining dropped to {}",
            remaining
        );
        previous = lifetime;
    }

    // And the doubling is exactly the documented one.
    let scarce = RateLimitBudget::new(60, base, 11).cache_lifetime(base, threshold);
    let plenty = RateLimitBudget::new(60, base, 12).cache_lifetime(base, threshold);
    assert_eq!(plenty, base);
    assert_eq!(scarce, base * 2);
}

#[test]
fn test_distinct_page_sizes_use_distinct_cache_keys() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_body(reqres_body(1));
    transport.enqueue_body(reqres_body(1));
    let clock = Arc::new(MockClock::new(Instant::now()));
    let client = client_with_budget(
        transport.clone(),
        clock,
        RateLimitBudget::new(60, Duration::from_secs(3600), 60),
    );

    client.fetch_page(1, 1).unwrap();
    client.fetch_page(1, 2).unwrap();

    assert_eq!(transport.call_count(), 2);
}
