//! Persisted, bounded history of recent submissions.
//!
//! The storage behaves like a single browser local-storage key: one string
//! value holding the JSON-encoded, newest-first array of items.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use forge_core::{History, HistoryItem};
use forge_logging::{forge_info, forge_warn};
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("history storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("history storage write failed: {0}")]
    Persist(#[from] PersistError),
    #[error("history encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Injectable key/value slot holding the encoded history.
pub trait HistoryStorage: Send {
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&mut self, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self) -> Result<(), StorageError>;
}

/// Stores the history as one JSON file.
#[derive(Debug, Clone)]
pub struct FileHistoryStorage {
    path: PathBuf,
}

impl FileHistoryStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStorage for FileHistoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        write_atomically(&self.path, value)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory slot; clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStorage {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current raw value of the slot.
    pub fn value(&self) -> Option<String> {
        (*self.slot()).clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryStorage for MemoryHistoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value())
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}

/// [`History`] mirrored into a [`HistoryStorage`] after every change.
pub struct HistoryStore<S> {
    storage: S,
    history: History,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Reads and decodes the persisted history. Unreadable or undecodable
    /// content yields an empty history and a log entry, never an error.
    pub fn load(storage: S) -> Self {
        let history = match storage.read() {
            Ok(Some(text)) => match serde_json::from_str::<Vec<HistoryItem>>(&text) {
                Ok(items) => {
                    let history = History::from_persisted(items);
                    forge_info!("Loaded {} history item(s)", history.len());
                    history
                }
                Err(err) => {
                    forge_warn!("Failed to decode persisted history, starting empty: {}", err);
                    History::new()
                }
            },
            Ok(None) => History::new(),
            Err(err) => {
                forge_warn!("Failed to read persisted history, starting empty: {}", err);
                History::new()
            }
        };
        Self { storage, history }
    }

    /// Records `item` (newest first, one entry per url, capped) and persists.
    pub fn record(&mut self, item: HistoryItem) -> Result<(), StorageError> {
        self.history.record(item);
        self.persist()
    }

    /// Empties the history and removes the persisted value.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.history.clear();
        self.storage.remove()
    }

    pub fn items(&self) -> &[HistoryItem] {
        self.history.items()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(self.history.items())?;
        self.storage.write(&encoded)
    }
}
