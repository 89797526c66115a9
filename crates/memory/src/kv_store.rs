//! Key-value stores for the chat history.
//!
//! `FileKvStore` keeps every key in a single JSON object on disk
//! (`~/.parley/history.json` by default). Entries are loaded on creation and
//! flushed on every mutation, which gives fast reads with durable writes.

use async_trait::async_trait;
use parley_core::error::{Error, MemoryError};
use parley_core::store::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed string map stored as one JSON object.
pub struct FileKvStore {
    path: PathBuf,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileKvStore {
    /// Open the store at `path`. A missing or corrupted file starts empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_from_disk(&path);
        debug!(path = %path.display(), keys = entries.len(), "History store loaded");
        Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return BTreeMap::new(),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupted history file");
                BTreeMap::new()
            }
        }
    }

    async fn flush(&self) -> Result<(), Error> {
        let entries = self.entries.read().await;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create history directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&self.path, content)
            .map_err(|e| MemoryError::Storage(format!("Failed to write history file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        self.entries.write().await.insert(key.to_string(), value);
        self.flush().await
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            self.flush().await?;
        }
        Ok(())
    }
}

/// A process-local key-value store.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
