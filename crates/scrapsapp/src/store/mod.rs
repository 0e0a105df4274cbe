//! # Storage Layer
//!
//! This module defines the storage abstraction for scraps. The [`StorageBackend`] trait is the
//! uniform CRUD contract every persistence medium implements, and
//! [`registry::StorageRegistry`] routes operations to the backend of a given [`BackendKind`].
//!
//! ## The Contract
//!
//! Every backend, whatever its medium:
//!
//! - `initialize`: idempotent preparation. Never creates persistent artifacts.
//! - `list`: all records, in no particular order. Empty, not an error, when nothing was saved.
//! - `get`: the record or `None`. A missing id is never an error.
//! - `save`: upsert. A `list` right after `save` sees the record.
//! - `update`: `NotFound` for a missing id; otherwise merge, refresh `updatedAt`, and persist
//!   through `save`.
//! - `delete`: removes the record; deleting a missing id is a no-op.
//!
//! `get` and `update` have default implementations in terms of `list` and `save`, so for every
//! backend the listing is the single source of truth.
//!
//! ## Implementations
//!
//! - [`kv_backend::KeyValueBackend`]: The global store. The whole collection lives under one
//!   key of a [`crate::kv::KeyValueStore`] and is rewritten on every mutation.
//! - [`workspace_backend::WorkspaceBackend`]: Per-workspace JSON files under `.scraps/`,
//!   created lazily on the first save.
//!
//! ## Storage Format
//!
//! For `WorkspaceBackend`:
//! ```text
//! <workspace>/
//! ├── .scraps/
//! │   ├── index.json      # JSON array of every record, the authoritative listing
//! │   └── {uuid}.json     # One file per record
//! └── .gitignore          # Gains a `.scraps/` entry on first save
//! ```

use crate::error::{Result, ScrapsError};
use crate::model::{BackendKind, ScrapId, ScrapPatch, ScrapRecord};
use chrono::Utc;

pub mod kv_backend;
pub mod registry;
pub mod workspace_backend;

/// Abstract interface for scrap persistence.
///
/// All methods take `&self`: backends are either stateless I/O over a medium or keep their
/// small bookkeeping in cells, since scraps is single-threaded.
pub trait StorageBackend {
    /// The kind this backend serves.
    fn kind(&self) -> BackendKind;

    /// Idempotent setup. Must not create files, directories or keys.
    fn initialize(&self) -> Result<()>;

    /// All records, unordered.
    fn list(&self) -> Result<Vec<ScrapRecord>>;

    /// Insert or overwrite by id.
    fn save(&self, record: &ScrapRecord) -> Result<()>;

    /// Remove by id. Missing ids are ignored.
    fn delete(&self, id: &ScrapId) -> Result<()>;

    /// Look a record up in the listing.
    fn get(&self, id: &ScrapId) -> Result<Option<ScrapRecord>> {
        Ok(self.list()?.into_iter().find(|record| record.id == *id))
    }

    /// Merge `patch` into an existing record and persist it. Returns the updated record.
    fn update(&self, id: &ScrapId, patch: ScrapPatch) -> Result<ScrapRecord> {
        let mut record = self.get(id)?.ok_or(ScrapsError::NotFound(id.clone()))?;
        record.apply(patch, Utc::now());
        self.save(&record)?;
        Ok(record)
    }
}

/// Replace the entry with the same id, or append.
pub(crate) fn upsert(records: &mut Vec<ScrapRecord>, record: &ScrapRecord) {
    match records.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}
