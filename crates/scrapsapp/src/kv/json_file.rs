use super::KeyValueStore;
use crate::error::{Result, ScrapsError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Key/value store persisted as a single JSON object on disk.
///
/// Every call reads the whole document; every write rewrites it atomically. The file and its
/// parent directory are created on the first write, never on reads.
pub struct JsonFileKv {
    path: PathBuf,
}

impl JsonFileKv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/state.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path).map_err(ScrapsError::Io)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content).map_err(ScrapsError::Serialization)? {
            Value::Object(map) => Ok(map),
            _ => Err(ScrapsError::Store(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn store(&self, map: &Map<String, Value>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(ScrapsError::Io)?;
        }

        let content = serde_json::to_string_pretty(map).map_err(ScrapsError::Serialization)?;

        // Atomic write
        let tmp_file = dir.join(format!(".state-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(ScrapsError::Io)?;
        fs::rename(&tmp_file, &self.path).map_err(ScrapsError::Io)?;
        debug!(path = %self.path.display(), "wrote key/value state");
        Ok(())
    }
}

impl KeyValueStore for JsonFileKv {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load()?.remove(key))
    }

    fn update(&self, key: &str, value: Option<Value>) -> Result<()> {
        let mut map = self.load()?;
        match value {
            Some(value) => {
                map.insert(key.to_string(), value);
            }
            None => {
                if map.remove(key).is_none() && !self.path.exists() {
                    // Removing from a store that was never written: nothing to persist.
                    return Ok(());
                }
            }
        }
        self.store(&map)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }
}
