//! # Legacy Migration
//!
//! Before scraps had ids, timestamps and multiple backends, the whole collection was a flat
//! list of `{label, content}` pairs under the [`LEGACY_ITEMS_KEY`] key of the key/value store.
//!
//! [`migrate_legacy`] turns each legacy entry into a fresh [`ScrapRecord`] in the global
//! backend, then clears the legacy key:
//!
//! ```text
//! items: [{label, content}, ...]        scraps.items: [..., {id, label, content,
//!                                  ──▶                     createdAt, updatedAt}, ...]
//! items: <removed>
//! ```
//!
//! Detection: the legacy key is present and non-empty. Clearing the key is what makes the
//! migration one-shot; running it again finds nothing to do.
//!
//! The legacy key is cleared only after every entry was saved. If a save fails midway the key
//! is left in place and the error is returned.

use crate::error::Result;
use crate::kv::{get_or, KeyValueStore, LEGACY_ITEMS_KEY};
use crate::model::{BackendKind, LegacyScrap, ScrapRecord};
use crate::store::registry::StorageRegistry;
use chrono::Utc;
use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
}

/// Labels and content to use for legacy entries missing a field.
#[derive(Debug, Clone)]
pub struct LegacyDefaults {
    pub label: String,
    pub content: String,
}

impl Default for LegacyDefaults {
    fn default() -> Self {
        Self {
            label: "Untitled".to_string(),
            content: String::new(),
        }
    }
}

pub fn migrate_legacy<K: KeyValueStore + 'static>(
    registry: &mut StorageRegistry<K>,
    defaults: &LegacyDefaults,
) -> Result<MigrationReport> {
    let legacy: Vec<LegacyScrap> = get_or(registry.kv(), LEGACY_ITEMS_KEY, Vec::new())?;
    if legacy.is_empty() {
        return Ok(MigrationReport::default());
    }

    let now = Utc::now();
    let mut report = MigrationReport::default();
    for entry in legacy {
        let record = ScrapRecord::new_at(
            entry.label.unwrap_or_else(|| defaults.label.clone()),
            entry.content.unwrap_or_else(|| defaults.content.clone()),
            now,
        );
        registry.save_to_kind(BackendKind::KeyValueStore, &record)?;
        report.migrated += 1;
    }

    registry.kv().update(LEGACY_ITEMS_KEY, None)?;
    info!(count = report.migrated, "migrated legacy scraps");
    Ok(report)
}
