use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::kv::{KeyValueStore, StorageError};

/// In-memory KeyValueStore for testing and native fallback.
///
/// Clones share the same map. Writes to keys registered with
/// [`fail_writes_to`](MemoryStore::fail_writes_to) fail with
/// [`StorageError::QuotaExceeded`], and [`fail_reads`](MemoryStore::fail_reads)
/// makes every read fail, which is how tests exercise the degrade paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    failing_writes: HashSet<String>,
    failing_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` on `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        if let Ok(mut inner) = self.lock() {
            inner.failing_writes.insert(key.to_string());
        }
    }

    /// Toggle read failures for every key.
    pub fn fail_reads(&self, failing: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.failing_reads = failing;
        }
    }

    /// Remove all injected faults.
    pub fn heal(&self) {
        if let Ok(mut inner) = self.lock() {
            inner.failing_writes.clear();
            inner.failing_reads = false;
        }
    }

    /// Raw view of a stored value, bypassing fault injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().ok()?.values.get(key).cloned()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.lock()?;
        if inner.failing_reads {
            return Err(StorageError::Unavailable(format!("read of `{key}` refused")));
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if inner.failing_writes.contains(key) {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.values.remove(key);
        Ok(())
    }
}
