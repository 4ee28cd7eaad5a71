//! Durable key-value storage.
//!
//! [`KeyValueStore`] is the raw asynchronous engine (in-memory or a JSON
//! file on disk). [`Storage`] wraps an engine with JSON encoding and the
//! failure policy the rest of the crate relies on: reads fail open to
//! "absent", writes propagate.

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Keys used by the data layer.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth-token";
    pub const USER_DATA: &str = "user-data";
    pub const TODOS_CACHE: &str = "todos-cache";
    pub const SETTINGS: &str = "settings";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to lock '{path}': {source}")]
    Lock {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string-keyed store holding JSON-encoded values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Shared handle over a [`KeyValueStore`] with typed JSON access.
///
/// Concurrent writers to the same key race; the last write wins.
#[derive(Clone)]
pub struct Storage {
    engine: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(engine: impl KeyValueStore + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Volatile storage, mostly for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and decode `key`.
    ///
    /// Engine failures and undecodable values are logged and reported as
    /// absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_string(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value could not be decoded, treating as absent");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Json {
            key: key.to_string(),
            source: e,
        })?;
        self.engine.set(key, raw).await
    }

    /// Raw string read with the same fail-open policy as [`get_json`](Self::get_json).
    pub async fn get_string(&self, key: &str) -> Option<String> {
        match self.engine.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed, treating as absent");
                None
            }
        }
    }

    pub async fn set_string(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.engine.set(key, value.into()).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.engine.remove(key).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.engine.clear().await
    }

    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.engine.keys().await
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
