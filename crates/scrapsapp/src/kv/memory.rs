use super::KeyValueStore;
use crate::error::{Result, ScrapsError};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory key/value store for testing.
///
/// Uses `RefCell` for interior mutability since scraps is single-threaded.
#[derive(Default)]
pub struct MemoryKv {
    entries: RefCell<BTreeMap<String, Value>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `update` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn update(&self, key: &str, value: Option<Value>) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ScrapsError::Store("Simulated write error".to_string()));
        }
        let mut entries = self.entries.borrow_mut();
        match value {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}
