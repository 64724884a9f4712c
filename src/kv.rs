//! A small persistent key-value store: one JSON object in one file.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILE_NAME: &str = "local-storage.json";

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Failed to read '{}': {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write '{}': {}", .0.display(), .1)]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Corrupt store '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Value under '{0}' has an unexpected shape: {1}")]
    Value(String, #[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Store backed by a file inside `dir`. Nothing is created until the
    /// first write.
    pub fn open(dir: &Path) -> Self {
        Self {
            path: dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        match self.load()?.remove(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| KvError::Value(key.to_string(), e)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let value =
            serde_json::to_value(value).map_err(|e| KvError::Value(key.to_string(), e))?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        self.save(&entries)
    }

    /// Returns whether the key was present.
    pub fn remove(&self, key: &str) -> Result<bool, KvError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    fn load(&self) -> Result<Map<String, Value>, KvError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| KvError::Read(self.path.clone(), e))?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&contents).map_err(|e| KvError::Parse(self.path.clone(), e))
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KvError::Write(self.path.clone(), e))?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| KvError::Parse(self.path.clone(), e))?;
        std::fs::write(&self.path, contents).map_err(|e| KvError::Write(self.path.clone(), e))
    }
}
