//! Key-value backends for the session store.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::debug;

use super::SessionError;

/// A single mutation applied by [`SessionStorage::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set(String, String),
    Remove(String),
}

/// Durable string key-value storage.
///
/// `write` applies its whole batch as one unit: readers observe either none
/// or all of the operations.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn write(&self, ops: Vec<StorageOp>) -> Result<(), SessionError>;
}

fn apply(entries: &mut HashMap<String, String>, ops: Vec<StorageOp>) {
    for op in ops {
        match op {
            StorageOp::Set(key, value) => {
                entries.insert(key, value);
            }
            StorageOp::Remove(key) => {
                entries.remove(&key);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local storage. Each instance is an independent session.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, ops: Vec<StorageOp>) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut entries, ops);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// JSON document on disk, replaced atomically on every write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(SessionError::Io(e)),
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| SessionError::Io(e.error))?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn write(&self, ops: Vec<StorageOp>) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            // Corrupt documents are overwritten.
            Err(SessionError::Encoding(_)) => HashMap::new(),
            Err(e) => return Err(e),
        };
        apply(&mut entries, ops);
        self.write_all(&entries)
    }
}
