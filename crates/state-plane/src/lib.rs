pub mod bootstrap;
pub mod config;
pub mod context;
pub mod history;
pub mod metrics;
pub mod rate_limit;
pub mod redis_store;
pub mod static_config;
pub mod store;

pub use bootstrap::{from_system_config, CoreStores};
pub use config::{ConfigError, SystemConfig, SystemConfigLoader};
pub use context::{
    ContextConfig, ContextMessage, ContextStoreHealth, SessionContextStore, StoredMessage,
};
pub use history::BoundedHistory;
pub use metrics::{MetricsAggregator, MetricsSnapshot, TRACKED_ENDPOINTS};
pub use rate_limit::{RateLimitConfig, SlidingWindowRateLimiter};
pub use redis_store::{RedisDurableStore, RedisStoreConfig};
pub use store::{DurableStore, StoreError};
