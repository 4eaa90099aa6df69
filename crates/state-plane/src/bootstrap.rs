use std::sync::Arc;
use std::time::Duration;

use crate::config::SystemConfig;
use crate::context::{ContextConfig, SessionContextStore};
use crate::metrics::MetricsAggregator;
use crate::rate_limit::{RateLimitConfig, SlidingWindowRateLimiter};
use crate::redis_store::{RedisDurableStore, RedisStoreConfig};
use crate::store::{DurableStore, StoreError};

/// Handles for the stateful layer, constructed once at startup and passed by
/// reference to request handlers.
pub struct CoreStores {
    pub contexts: Arc<SessionContextStore>,
    pub rate_limiter: Arc<SlidingWindowRateLimiter>,
    pub metrics: Arc<MetricsAggregator>,
}

impl CoreStores {
    pub fn in_memory() -> Self {
        Self {
            contexts: SessionContextStore::shared(None, ContextConfig::default()),
            rate_limiter: SlidingWindowRateLimiter::shared(RateLimitConfig::default()),
            metrics: MetricsAggregator::shared(),
        }
    }
}

impl Default for CoreStores {
    fn default() -> Self {
        Self::in_memory()
    }
}

pub fn from_system_config(config: &SystemConfig) -> Result<CoreStores, StoreError> {
    let context_config = ContextConfig {
        max_messages: config.get_number("context.max_messages").max(1) as usize,
        ttl: Duration::from_secs(config.get_number("context.ttl_hours").max(1) as u64 * 3600),
    };
    let rate_config = RateLimitConfig {
        max_requests: config.get_number("limits.requests_per_minute").max(1) as u32,
        window: Duration::from_secs(config.get_number("limits.window_seconds").max(1) as u64),
    };
    let durable = resolve_durable(config)?;
    Ok(CoreStores {
        contexts: SessionContextStore::shared(durable, context_config),
        rate_limiter: SlidingWindowRateLimiter::shared(rate_config),
        metrics: MetricsAggregator::shared(),
    })
}

fn resolve_durable(config: &SystemConfig) -> Result<Option<Arc<dyn DurableStore>>, StoreError> {
    let redis_url = config.get_string("cache.redis_url");
    if redis_url.trim().is_empty() {
        return Ok(None);
    }
    let store_config = RedisStoreConfig {
        key_prefix: config.get_string("cache.key_prefix"),
        connect_timeout_ms: config.get_number("cache.connect_timeout_ms").max(1) as u64,
        io_timeout_ms: config.get_number("cache.io_timeout_ms").max(1) as u64,
    };
    let store = RedisDurableStore::open(&redis_url, store_config)?;
    Ok(Some(Arc::new(store)))
}
