//! Local key-value persistence.
//!
//! The dashboard only ever reads and writes whole snapshots under two keys.
//! [`KeyValueStore`] is the injection seam: [`MemoryStore`] for tests and
//! embedding, [`FileStore`] for the bundled binary.

mod snapshot;

pub use snapshot::{load_saved, load_zones, save_saved, save_zones};

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::DashError;

/// The logical keys the dashboard persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// `{ "zones": [...] }`, overriding the fetched price table when present.
    Zones,
    /// The saved-news array.
    SavedNews,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKey::Zones => "ufm2Data",
            StoreKey::SavedNews => "savedNews",
        }
    }
}

/// Synchronous get/set of raw string values on typed keys.
pub trait KeyValueStore: Send {
    /// Returns the stored value, or `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns a `DashError` if the backing medium cannot be read.
    fn get(&self, key: StoreKey) -> Result<Option<String>, DashError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `DashError` if the backing medium cannot be written.
    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), DashError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: StoreKey) -> Result<Option<String>, DashError> {
        (**self).get(key)
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), DashError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Clones share the same map, so a clone handed to a second
/// dashboard behaves like the same browser profile after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<StoreKey, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, DashError> {
        let guard = self
            .map
            .lock()
            .map_err(|_| DashError::Data("memory store lock poisoned".into()))?;
        Ok(guard.get(&key).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), DashError> {
        let mut guard = self
            .map
            .lock()
            .map_err(|_| DashError::Data("memory store lock poisoned".into()))?;
        guard.insert(key, value.to_string());
        Ok(())
    }
}

/// One JSON file per key under a directory (`<dir>/ufm2Data.json`, `<dir>/savedNews.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, DashError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), DashError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Atomic replace.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
