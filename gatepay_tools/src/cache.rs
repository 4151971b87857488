use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use serde_json::Value;

/// All keys live under this namespace.
const CACHE_KEY_PREFIX: &str = "__GATE_";

struct CachedResponse {
    value: Value,
    expires_at: Instant,
}

/// A process-wide store of parsed responses with a fixed time-to-live.
///
/// Clones share the same entries. Writes replace an entry wholesale.
#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CachedResponse>>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored response if there is one and it has not expired. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<Value> {
        let key = namespaced(key);
        let mut guard = self.lock();
        match guard.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                guard.remove(&key);
                None
            },
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: Value) {
        let entry = CachedResponse { value, expires_at: Instant::now() + self.ttl };
        self.lock().insert(namespaced(key), entry);
    }

    /// Drops every expired entry and returns how many there were. Keys that are never read again are only released
    /// here.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|_, entry| entry.expires_at > now);
        before - guard.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedResponse>> {
        // A panic while holding the lock cannot leave a half-written entry behind, so the map is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn namespaced(key: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{key}")
}
