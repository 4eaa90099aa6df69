use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::Serialize;

use crate::history::BoundedHistory;

/// Endpoints with tracked latency samples. `record` silently ignores sample
/// recording for anything else.
pub const TRACKED_ENDPOINTS: &[&str] = &["upload", "quiz", "study_guide", "graph", "chat"];

const MAX_LATENCY_SAMPLES: usize = 100;

/// Read-only view returned by `snapshot`. Field names are a wire contract:
/// the route layer serializes this verbatim.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests_today: u64,
    pub requests_per_hour: BTreeMap<String, u64>,
    pub avg_response_times: BTreeMap<String, f64>,
    pub active_sessions: usize,
}

struct MetricsState {
    total_requests: u64,
    // Hour-of-day buckets with no date dimension; counts accumulate across
    // days into the same 24 slots.
    requests_per_hour: [u64; 24],
    response_times: BTreeMap<&'static str, BoundedHistory<f64>>,
    active_sessions: HashSet<String>,
}

pub struct MetricsAggregator {
    state: Mutex<MetricsState>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        let mut response_times = BTreeMap::new();
        for endpoint in TRACKED_ENDPOINTS {
            response_times.insert(*endpoint, BoundedHistory::new(MAX_LATENCY_SAMPLES));
        }
        Self {
            state: Mutex::new(MetricsState {
                total_requests: 0,
                requests_per_hour: [0; 24],
                response_times,
                active_sessions: HashSet::new(),
            }),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn current_hour() -> usize {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        ((secs / 3600) % 24) as usize
    }

    pub fn record(&self, endpoint: &str, elapsed_ms: f64) {
        self.record_at(endpoint, elapsed_ms, Self::current_hour());
    }

    pub fn record_at(&self, endpoint: &str, elapsed_ms: f64, hour: usize) {
        let mut state = self.state.lock();
        state.total_requests += 1;
        state.requests_per_hour[hour % 24] += 1;
        if let Some(samples) = state.response_times.get_mut(endpoint) {
            samples.push(elapsed_ms);
        }
    }

    pub fn track_session(&self, session_id: &str) {
        self.state
            .lock()
            .active_sessions
            .insert(session_id.to_string());
    }

    /// Pure read; never mutates.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();
        let requests_per_hour = state
            .requests_per_hour
            .iter()
            .enumerate()
            .map(|(hour, count)| (hour.to_string(), *count))
            .collect();
        let avg_response_times = state
            .response_times
            .iter()
            .map(|(endpoint, samples)| {
                let mean = if samples.is_empty() {
                    0.0
                } else {
                    samples.iter().sum::<f64>() / samples.len() as f64
                };
                ((*endpoint).to_string(), mean)
            })
            .collect();
        MetricsSnapshot {
            requests_today: state.total_requests,
            requests_per_hour,
            avg_response_times,
            active_sessions: state.active_sessions.len(),
        }
    }
}
