use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::Mutex;

use super::{KeyValueStore, StorageError};

type Entries = BTreeMap<String, String>;

/// Store backed by a single JSON object file.
///
/// Every mutation re-reads the file under an exclusive lock on a sidecar
/// `.lock` file, applies the change and atomically replaces the file, so
/// separate processes sharing the path see last-write-wins per key.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

struct FileStoreInner {
    path: PathBuf,
    writer: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(FileStoreInner {
                path: path.into(),
                writer: Mutex::new(()),
            }),
        }
    }

    /// `<data_dir>/starter-core/storage.json`, or the current directory if
    /// the platform has no data dir.
    pub fn default_path() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("starter-core").join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn run<R, F>(&self, op: F) -> Result<R, StorageError>
    where
        R: Send + 'static,
        F: FnOnce(&FileStoreInner) -> Result<R, StorageError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner))
            .await
            .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))?
    }
}

impl FileStoreInner {
    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.display_path(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // The next write replaces the corrupt file.
                tracing::warn!(path = %self.path.display(), error = %e, "Storage file is corrupt, starting empty");
                Ok(Entries::new())
            }
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _writer = self.writer.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let lock_path = sibling(&self.path, ".lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StorageError::Lock {
                path: lock_path.display().to_string(),
                source: e,
            })?;
        FileExt::lock_exclusive(&lock_file).map_err(|e| StorageError::Lock {
            path: lock_path.display().to_string(),
            source: e,
        })?;

        let result = self.read_entries().and_then(|mut entries| {
            mutate(&mut entries);
            self.write_entries(&entries)
        });

        if let Err(e) = FileExt::unlock(&lock_file) {
            tracing::warn!(path = %lock_path.display(), error = %e, "Failed to release storage lock");
        }
        result
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Json {
            key: self.display_path(),
            source: e,
        })?;

        let tmp_path = sibling(&self.path, ".tmp");
        let io_err = |e| StorageError::Io {
            path: tmp_path.display().to_string(),
            source: e,
        };
        let mut tmp = File::create(&tmp_path).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.sync_all().map_err(io_err)?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Io {
            path: self.display_path(),
            source: e,
        })
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.run(move |inner| Ok(inner.read_entries()?.remove(&key)))
            .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let key = key.to_string();
        self.run(move |inner| {
            inner.update(|entries| {
                entries.insert(key, value);
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.run(move |inner| {
            inner.update(|entries| {
                entries.remove(&key);
            })
        })
        .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.run(|inner| inner.update(|entries| entries.clear()))
            .await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.run(|inner| Ok(inner.read_entries()?.into_keys().collect()))
            .await
    }
}
