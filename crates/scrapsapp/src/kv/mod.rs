//! # Key/Value Substrate
//!
//! The global backend and the legacy migrator persist into an opaque associative store:
//! one JSON value per string key, nothing else. [`KeyValueStore`] is that narrow interface.
//!
//! ## Implementations
//!
//! - [`json_file::JsonFileKv`]: Production store. The whole map lives in one JSON document
//!   (`state.json` in the global data directory).
//! - [`memory::MemoryKv`]: For testing without filesystem I/O.
//!
//! ## Well-Known Keys
//!
//! | Key | Holds |
//! |-----|-------|
//! | [`ITEMS_KEY`] | The `ScrapRecord` collection of the global backend |
//! | [`LEGACY_ITEMS_KEY`] | The pre-multi-backend flat `{label, content}` list |
//!
//! All methods take `&self`: the tool is single-threaded, so implementations that need to
//! mutate in memory use interior mutability.

use crate::error::{Result, ScrapsError};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod json_file;
pub mod memory;

/// Key holding the global backend's record collection.
pub const ITEMS_KEY: &str = "scraps.items";

/// Key holding legacy flat data, cleared once migrated.
pub const LEGACY_ITEMS_KEY: &str = "items";

pub trait KeyValueStore {
    /// Returns the value under `key`, or `None` if the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes `value` under `key`. `None` removes the key.
    fn update(&self, key: &str, value: Option<Value>) -> Result<()>;

    /// All keys currently holding a value.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reads and decodes `key`, falling back to `default` when the key is absent.
///
/// A present but undecodable value is an error, not a default.
pub fn get_or<K, T>(store: &K, key: &str, default: T) -> Result<T>
where
    K: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(Value::Null) | None => Ok(default),
        Some(value) => serde_json::from_value(value).map_err(ScrapsError::Serialization),
    }
}
