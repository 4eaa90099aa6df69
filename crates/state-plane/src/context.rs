use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::history::BoundedHistory;
use crate::store::{DurableStore, StoreError};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

/// A context message plus the instant it was appended. Immutable once stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredMessage {
    pub message: ContextMessage,
    pub timestamp_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ContextConfig {
    pub max_messages: usize,
    pub ttl: Duration,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContextStoreHealth {
    pub durable_configured: bool,
    pub store_errors: u64,
    pub fallback_sessions: usize,
}

struct FallbackEntry {
    history: BoundedHistory<StoredMessage>,
    last_write_ms: u64,
}

const SWEEP_EVERY: u64 = 256;

/// Conversation history per session id. Writes through the durable store when
/// one is configured; any store failure is absorbed by keeping the equivalent
/// state in process memory, so callers never observe an error from this type.
pub struct SessionContextStore {
    durable: Option<Arc<dyn DurableStore>>,
    config: ContextConfig,
    fallback: Mutex<HashMap<String, FallbackEntry>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    store_errors: AtomicU64,
    ops: AtomicU64,
}

impl SessionContextStore {
    pub fn new(durable: Option<Arc<dyn DurableStore>>, config: ContextConfig) -> Self {
        Self {
            durable,
            config,
            fallback: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
            store_errors: AtomicU64::new(0),
            ops: AtomicU64::new(0),
        }
    }

    pub fn shared(durable: Option<Arc<dyn DurableStore>>, config: ContextConfig) -> Arc<Self> {
        Arc::new(Self::new(durable, config))
    }

    pub fn in_memory(config: ContextConfig) -> Self {
        Self::new(None, config)
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn conv_key(session_id: &str) -> String {
        format!("conv:{session_id}")
    }

    // Read-modify-write for one session id is serialized on its own lock.
    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn append(&self, session_id: &str, message: ContextMessage) {
        let lock = self.session_lock(session_id);
        let _guard = lock.lock();

        let stored = StoredMessage {
            message,
            timestamp_ms: Self::now_ms(),
        };

        if let Some(store) = self.durable.as_ref() {
            match self.append_durable(store.as_ref(), session_id, &stored) {
                Ok(()) => {
                    self.maybe_sweep();
                    return;
                }
                Err(err) => {
                    self.store_errors.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        session_id,
                        error = %err,
                        "durable store unavailable, keeping context in process memory"
                    );
                }
            }
        }

        self.append_fallback(session_id, stored);
        self.maybe_sweep();
    }

    fn append_durable(
        &self,
        store: &dyn DurableStore,
        session_id: &str,
        stored: &StoredMessage,
    ) -> Result<(), StoreError> {
        let key = Self::conv_key(session_id);
        let existing = match store.get(&key)? {
            Some(payload) => serde_json::from_str::<Vec<StoredMessage>>(&payload)
                .map_err(|err| StoreError::Payload(err.to_string()))?,
            None => Vec::new(),
        };
        let mut history = BoundedHistory::from_entries(self.config.max_messages, existing);
        history.push(stored.clone());
        let payload = serde_json::to_string(&history.to_vec())
            .map_err(|err| StoreError::Payload(err.to_string()))?;
        store.set_with_expiry(&key, &payload, self.config.ttl)
    }

    fn append_fallback(&self, session_id: &str, stored: StoredMessage) {
        let mut fallback = self.fallback.lock();
        let entry = fallback
            .entry(session_id.to_string())
            .or_insert_with(|| FallbackEntry {
                history: BoundedHistory::new(self.config.max_messages),
                last_write_ms: 0,
            });
        entry.last_write_ms = stored.timestamp_ms;
        entry.history.push(stored);
    }

    /// Returns the session history, newest last. Empty when nothing is found
    /// in either backing store; never an error.
    pub fn get(&self, session_id: &str) -> Vec<StoredMessage> {
        if let Some(store) = self.durable.as_ref() {
            match store.get(&Self::conv_key(session_id)) {
                Ok(Some(payload)) => {
                    match serde_json::from_str::<Vec<StoredMessage>>(&payload) {
                        Ok(messages) => return messages,
                        Err(err) => {
                            self.store_errors.fetch_add(1, Ordering::Relaxed);
                            warn!(session_id, error = %err, "malformed context payload");
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    self.store_errors.fetch_add(1, Ordering::Relaxed);
                    warn!(session_id, error = %err, "durable store read failed");
                }
            }
        }

        self.fallback
            .lock()
            .get(session_id)
            .map(|entry| entry.history.to_vec())
            .unwrap_or_default()
    }

    pub fn health(&self) -> ContextStoreHealth {
        ContextStoreHealth {
            durable_configured: self.durable.is_some(),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            fallback_sessions: self.fallback.lock().len(),
        }
    }

    /// Drops in-process sessions idle longer than the TTL. Also runs
    /// opportunistically every `SWEEP_EVERY` appends.
    pub fn evict_idle(&self) {
        self.evict_idle_at(Self::now_ms());
    }

    pub fn evict_idle_at(&self, now_ms: u64) {
        let ttl_ms = self.config.ttl.as_millis() as u64;
        self.fallback
            .lock()
            .retain(|_, entry| now_ms.saturating_sub(entry.last_write_ms) < ttl_ms);
        // Uncontended locks are recreated on demand; entry creation is
        // serialized by the lock map itself.
        self.locks
            .lock()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    fn maybe_sweep(&self) {
        if self.ops.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.evict_idle();
        }
    }
}
