use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use codesync_logging::sync_debug;
use thiserror::Error;

use crate::{lock, write_atomic, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read store file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Opaque string key-value persistence backing `set-item`/`get-item`.
pub trait KeyValueStore: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Lives as long as the page context, like the extension's in-page map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.items).get(key).cloned())
    }
}

/// JSON object on disk, rewritten atomically on every `set_item`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                sync_debug!("No store file at {:?}; starting empty", path);
                BTreeMap::new()
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = lock(&self.items);
        let previous = items.insert(key.to_string(), value.to_string());
        let content = serde_json::to_vec_pretty(&*items).unwrap_or_default();
        if let Err(err) = write_atomic(&self.path, &content) {
            // Keep memory and disk in agreement.
            match previous {
                Some(previous) => items.insert(key.to_string(), previous),
                None => items.remove(key),
            };
            return Err(err.into());
        }
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.items).get(key).cloned())
    }
}
