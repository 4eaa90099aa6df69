use std::time::Duration;

use redis::Commands;

use crate::store::{DurableStore, StoreError};

#[derive(Clone, Debug)]
pub struct RedisStoreConfig {
    pub key_prefix: String,
    pub connect_timeout_ms: u64,
    pub io_timeout_ms: u64,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: "studyhall".to_string(),
            connect_timeout_ms: 1000,
            io_timeout_ms: 1000,
        }
    }
}

#[derive(Clone)]
pub struct RedisDurableStore {
    client: redis::Client,
    config: RedisStoreConfig,
}

impl RedisDurableStore {
    pub fn open(url: &str, config: RedisStoreConfig) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|err| StoreError::Connection(err.to_string()))?;
        Ok(Self { client, config })
    }

    // One connection per operation; socket timeouts keep a hung cache from
    // blocking a request beyond the configured bound.
    fn connection(&self) -> Result<redis::Connection, StoreError> {
        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms.max(1));
        let io_timeout = Duration::from_millis(self.config.io_timeout_ms.max(1));
        let conn = self
            .client
            .get_connection_with_timeout(connect_timeout)
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        conn.set_read_timeout(Some(io_timeout))
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        conn.set_write_timeout(Some(io_timeout))
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        Ok(conn)
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

impl DurableStore for RedisDurableStore {
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        redis::cmd("SETEX")
            .arg(self.prefixed(key))
            .arg(ttl.as_secs().max(1))
            .arg(value)
            .query::<()>(&mut conn)
            .map_err(|err| StoreError::Operation(err.to_string()))
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        conn.get(self.prefixed(key))
            .map_err(|err| StoreError::Operation(err.to_string()))
    }
}

fn _assert_send_sync<T: Send + Sync>() {}

#[allow(dead_code)]
fn _assert_redis_types() {
    _assert_send_sync::<RedisDurableStore>();
}
