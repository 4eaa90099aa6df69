use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

const SWEEP_EVERY: u64 = 512;

/// Sliding window of request timestamps per client identity. Windows self-heal
/// by age-based pruning; there is no reset API.
pub struct SlidingWindowRateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Vec<u64>>>,
    ops: AtomicU64,
}

impl SlidingWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
            ops: AtomicU64::new(0),
        }
    }

    pub fn shared(config: RateLimitConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    pub fn allow(&self, client_id: &str) -> bool {
        self.allow_at(client_id, Self::now_ms())
    }

    /// Prunes aged timestamps, then checks and records under one lock. A
    /// denied attempt is not recorded.
    pub fn allow_at(&self, client_id: &str, now_ms: u64) -> bool {
        let window_ms = self.config.window.as_millis() as u64;
        let allowed = {
            let mut windows = self.windows.lock();
            let timestamps = windows.entry(client_id.to_string()).or_default();
            timestamps.retain(|&t| now_ms.saturating_sub(t) < window_ms);
            if (timestamps.len() as u32) < self.config.max_requests {
                timestamps.push(now_ms);
                true
            } else {
                false
            }
        };
        self.maybe_sweep(now_ms);
        allowed
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }

    /// Drops client ids whose windows have fully aged out. Also runs
    /// opportunistically every `SWEEP_EVERY` checks.
    pub fn evict_idle(&self) {
        self.evict_idle_at(Self::now_ms());
    }

    pub fn evict_idle_at(&self, now_ms: u64) {
        let window_ms = self.config.window.as_millis() as u64;
        self.windows.lock().retain(|_, timestamps| {
            timestamps
                .iter()
                .any(|&t| now_ms.saturating_sub(t) < window_ms)
        });
    }

    fn maybe_sweep(&self, now_ms: u64) {
        if self.ops.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.evict_idle_at(now_ms);
        }
    }
}
