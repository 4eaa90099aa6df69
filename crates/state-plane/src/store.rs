use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store operation failed: {0}")]
    Operation(String),
    #[error("store payload malformed: {0}")]
    Payload(String),
}

/// Key-value store with per-key expiry. Entirely absent when the cache is
/// unconfigured; callers must degrade to process memory on any error.
pub trait DurableStore: Send + Sync {
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
