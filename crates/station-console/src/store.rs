//! This module contains the local-first key store and the durable media it
//! can persist to.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::{Failure, StoreError};
use crate::keys::{self, KeyField, KeysRecord, PartialKeys};

/// The storage key the keys record lives under.
pub const KEYS_STORAGE_KEY: &str = "station.keys.v1";

/// A key/value text store that survives the session.
pub trait KeyMedium: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyMedium for FileMedium {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Session-only medium; nothing outlives the process.
#[derive(Default)]
pub struct MemoryMedium {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyMedium for MemoryMedium {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owns the keys record's persistence.
///
/// Constructed once per session and handed to every consumer; `load` and
/// `save` never fail, they degrade to defaults and no-ops.
pub struct KeyStore {
    medium: Box<dyn KeyMedium>,
    storage_key: String,
}

impl KeyStore {
    pub fn new(medium: Box<dyn KeyMedium>) -> Self {
        Self::with_storage_key(medium, KEYS_STORAGE_KEY)
    }

    pub fn with_storage_key(medium: Box<dyn KeyMedium>, storage_key: impl Into<String>) -> Self {
        Self {
            medium,
            storage_key: storage_key.into(),
        }
    }

    /// A store backed by `<home>/station.keys.v1.json`.
    pub fn open(home: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileMedium::new(home)))
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Reads the persisted record merged over the defaults.
    pub fn load(&self) -> KeysRecord {
        let raw = match self.medium.read(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.storage_key, "No persisted keys, using defaults.");
                return KeysRecord::default();
            }
            Err(e) => {
                warn!("{}", Failure::from(&e));
                return KeysRecord::default();
            }
        };

        keys::parse_merged(&raw).unwrap_or_else(|| {
            warn!(key = %self.storage_key, "Persisted keys are malformed, using defaults.");
            KeysRecord::default()
        })
    }

    /// Writes `defaults ⊕ record`, overwriting the previous value.
    ///
    /// Returns whether the write reached the medium; a failed write is logged
    /// and otherwise ignored.
    pub fn save(&self, record: &KeysRecord) -> bool {
        self.save_partial(&PartialKeys::from(record.clone()))
    }

    /// Writes the defaults overlaid with whichever fields `partial` carries.
    pub fn save_partial(&self, partial: &PartialKeys) -> bool {
        let merged = keys::merge(&KeysRecord::default(), partial);
        let result = serde_json::to_string(&merged)
            .map_err(StoreError::from)
            .and_then(|raw| self.medium.write(&self.storage_key, &raw));

        match result {
            Ok(()) => {
                info!(key = %self.storage_key, "Saved keys locally.");
                true
            }
            Err(e) => {
                warn!("{}", Failure::from(&e));
                false
            }
        }
    }

    /// Loads, overwrites one field and saves. Returns the updated record and
    /// whether the save reached the medium.
    pub fn update(&self, field: KeyField, value: impl Into<String>) -> (KeysRecord, bool) {
        let mut record = self.load();
        record.set(field, value);
        let saved = self.save(&record);
        (record, saved)
    }
}
