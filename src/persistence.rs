//! Timetable and snapshot persistence.
//!
//! Timetables travel as pretty-printed JSON. Import checks the identifying
//! fields before decoding so a malformed document is reported by name
//! rather than as a generic decode error.
//!
//! Stores are keyed by timetable id. [`JsonFileStore`] keeps one
//! `<id>.json` per timetable in a directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::error::{ImportError, StoreError};
use crate::models::{EntitySnapshot, Timetable};

/// Serializes a timetable to pretty JSON.
pub fn export_timetable(timetable: &Timetable) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(timetable)
}

/// Parses a timetable, requiring non-empty `id` and `title`.
pub fn import_timetable(json: &str) -> Result<Timetable, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    for field in ["id", "title"] {
        let present = object
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        if !present {
            return Err(ImportError::MissingField(field));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Writes an entity snapshot as pretty JSON.
pub fn save_snapshot(path: &Path, snapshot: &EntitySnapshot) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads an entity snapshot; missing lists default to empty.
pub fn load_snapshot(path: &Path) -> Result<EntitySnapshot, StoreError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Keyed timetable storage.
pub trait TimetableStore {
    /// Inserts or replaces a timetable under its id.
    fn save(&mut self, timetable: &Timetable) -> Result<(), StoreError>;

    fn load(&self, id: &str) -> Result<Timetable, StoreError>;

    /// Removes a timetable; returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Stored ids, sorted.
    fn ids(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    timetables: BTreeMap<String, Timetable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimetableStore for MemoryStore {
    fn save(&mut self, timetable: &Timetable) -> Result<(), StoreError> {
        self.timetables.insert(timetable.id.clone(), timetable.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Timetable, StoreError> {
        self.timetables
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.timetables.remove(id).is_some())
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.timetables.keys().cloned().collect())
    }
}

/// Directory of `<id>.json` files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let unsafe_id = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
            || id.contains(std::path::MAIN_SEPARATOR);
        if unsafe_id {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl TimetableStore for JsonFileStore {
    fn save(&mut self, timetable: &Timetable) -> Result<(), StoreError> {
        let path = self.path_for(&timetable.id)?;
        fs::write(&path, export_timetable(timetable)?)?;
        debug!("Saved timetable '{}' to {}", timetable.id, path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Timetable, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(import_timetable(&json)?)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
