use state_plane::MetricsAggregator;

#[test]
fn averages_cover_most_recent_samples() {
    let metrics = MetricsAggregator::new();
    for value in 0..150 {
        metrics.record_at("quiz", value as f64, 0);
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_today, 150);
    // Last 100 samples are 50..=149.
    let average = snapshot.avg_response_times["quiz"];
    assert!((average - 99.5).abs() < 1e-9);
}

#[test]
fn empty_endpoints_average_zero() {
    let metrics = MetricsAggregator::new();
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_today, 0);
    assert_eq!(snapshot.avg_response_times["chat"], 0.0);
    assert_eq!(snapshot.avg_response_times.len(), 5);
}

#[test]
fn unrecognized_endpoint_counts_but_is_not_sampled() {
    let metrics = MetricsAggregator::new();
    metrics.record_at("bogus", 5.0, 0);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_today, 1);
    assert!(!snapshot.avg_response_times.contains_key("bogus"));
}

#[test]
fn hour_buckets_accumulate() {
    let metrics = MetricsAggregator::new();
    metrics.record_at("chat", 1.0, 5);
    metrics.record_at("chat", 1.0, 5);
    metrics.record_at("chat", 1.0, 5);
    metrics.record_at("upload", 1.0, 23);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_per_hour.len(), 24);
    assert_eq!(snapshot.requests_per_hour["5"], 3);
    assert_eq!(snapshot.requests_per_hour["23"], 1);
    assert_eq!(snapshot.requests_per_hour["0"], 0);
}

#[test]
fn active_sessions_deduplicate() {
    let metrics = MetricsAggregator::new();
    metrics.track_session("a");
    metrics.track_session("a");
    metrics.track_session("b");

    assert_eq!(metrics.snapshot().active_sessions, 2);
}

#[test]
fn snapshot_serializes_wire_field_names() {
    let metrics = MetricsAggregator::new();
    metrics.record_at("chat", 2.0, 0);
    metrics.track_session("a");

    let payload = serde_json::to_value(metrics.snapshot()).expect("snapshot json");
    assert_eq!(payload["requests_today"], 1);
    assert_eq!(payload["active_sessions"], 1);
    assert!(payload["requests_per_hour"].is_object());
    assert!(payload["avg_response_times"]["chat"].as_f64().unwrap() > 1.0);
}
