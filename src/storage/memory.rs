use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{KeyValueStore, StorageError};

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<BTreeMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail, simulating an unavailable engine.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write, remove and clear fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("memory store {} disabled", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "write")?;
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "write")?;
        self.values.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "write")?;
        self.values.write().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.values.read().keys().cloned().collect())
    }
}
