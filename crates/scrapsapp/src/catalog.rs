//! # Catalog
//!
//! The catalog is the read-through cache every UI reads from: for each available
//! [`BackendKind`], the last known listing sorted newest first.
//!
//! ## Consistency Model
//!
//! The catalog reloads everything from the registry:
//! - at construction,
//! - after every mutation made through it (`add_item`, `rename_item`, `edit_item`,
//!   `delete_item`, `migrate_legacy`),
//! - on `refresh` and on `workspace_changed`.
//!
//! There is no incremental patching of the cached view, so it can never drift from storage for
//! longer than one operation. Listing failures are already absorbed by the registry (an
//! empty list for the failing kind); mutation errors are returned unchanged and the cache is
//! left as it was.
//!
//! ## Change Notification
//!
//! UIs [`subscribe`](Catalog::subscribe) a callback that receives the fresh listing after each
//! reload. The catalog never knows what a subscriber renders.
//!
//! ## Sort Order
//!
//! Descending `updatedAt`; ties by label, then id, so the order is stable across reloads.

use crate::error::{Result, ScrapsError};
use crate::kv::KeyValueStore;
use crate::migrate::{migrate_legacy, LegacyDefaults, MigrationReport};
use crate::model::{BackendKind, ScrapItem, ScrapPatch, ScrapRecord};
use crate::store::registry::{Listing, StorageRegistry};
use std::path::Path;
use tracing::debug;

/// Values used when `add_item` is called without them.
#[derive(Debug, Clone)]
pub struct CatalogDefaults {
    pub label: String,
    pub content: String,
    pub backend: BackendKind,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            label: "Untitled".to_string(),
            content: "{}".to_string(),
            backend: BackendKind::KeyValueStore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Listing)>;

pub struct Catalog<K: KeyValueStore + 'static> {
    registry: StorageRegistry<K>,
    defaults: CatalogDefaults,
    listing: Listing,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<K: KeyValueStore + 'static> Catalog<K> {
    pub fn new(registry: StorageRegistry<K>, defaults: CatalogDefaults) -> Self {
        let mut catalog = Self {
            registry,
            defaults,
            listing: Listing::new(),
            observers: Vec::new(),
            next_subscription: 0,
        };
        catalog.reload();
        catalog
    }

    pub fn registry(&self) -> &StorageRegistry<K> {
        &self.registry
    }

    pub fn defaults(&self) -> &CatalogDefaults {
        &self.defaults
    }

    /// The cached listing of every available kind.
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Cached records of one kind; empty when the kind is unavailable.
    pub fn items(&self, kind: BackendKind) -> &[ScrapRecord] {
        self.listing.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cached records of one kind, paired with their kind.
    pub fn scrap_items(&self, kind: BackendKind) -> Vec<ScrapItem> {
        self.items(kind)
            .iter()
            .cloned()
            .map(|record| ScrapItem::new(kind, record))
            .collect()
    }

    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.registry.available_backends()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Listing) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Reloads the listing from storage and notifies subscribers.
    pub fn refresh(&mut self) {
        self.reload();
    }

    fn reload(&mut self) {
        let mut listing = self.registry.list_all();
        for records in listing.values_mut() {
            sort_newest_first(records);
        }
        debug!(
            kinds = listing.len(),
            total = listing.values().map(Vec::len).sum::<usize>(),
            "catalog reloaded"
        );
        self.listing = listing;
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.listing);
        }
    }

    /// Creates a scrap. Missing arguments fall back to the catalog defaults.
    pub fn add_item(
        &mut self,
        label: Option<String>,
        kind: Option<BackendKind>,
    ) -> Result<ScrapItem> {
        let label = match label {
            Some(label) if label.trim().is_empty() => {
                return Err(ScrapsError::Api("Scrap name cannot be empty".to_string()))
            }
            Some(label) => label,
            None => self.defaults.label.clone(),
        };
        let kind = kind.unwrap_or(self.defaults.backend);

        let record = ScrapRecord::new(label, self.defaults.content.clone());
        self.registry.save_to_kind(kind, &record)?;
        self.reload();
        Ok(ScrapItem::new(kind, record))
    }

    pub fn add_item_to_backend(
        &mut self,
        kind: BackendKind,
        label: Option<String>,
    ) -> Result<ScrapItem> {
        self.add_item(label, Some(kind))
    }

    pub fn rename_item(&mut self, item: &ScrapItem, label: impl Into<String>) -> Result<ScrapItem> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ScrapsError::Api("Scrap name cannot be empty".to_string()));
        }
        self.mutate(item, ScrapPatch::label(label))
    }

    pub fn edit_item(&mut self, item: &ScrapItem, content: impl Into<String>) -> Result<ScrapItem> {
        self.mutate(item, ScrapPatch::content(content))
    }

    pub fn delete_item(&mut self, item: &ScrapItem) -> Result<()> {
        self.registry.delete_from_kind(item.kind, item.id())?;
        self.reload();
        Ok(())
    }

    pub fn migrate_legacy(&mut self) -> Result<MigrationReport> {
        let defaults = LegacyDefaults {
            label: self.defaults.label.clone(),
            content: self.defaults.content.clone(),
        };
        let result = migrate_legacy(&mut self.registry, &defaults);
        // Entries saved before a failure are real data; show them either way.
        self.reload();
        result
    }

    pub fn workspace_changed(&mut self, root: Option<&Path>) {
        self.registry.workspace_changed(root);
        self.reload();
    }

    fn mutate(&mut self, item: &ScrapItem, patch: ScrapPatch) -> Result<ScrapItem> {
        let record = self.registry.update_in_kind(item.kind, item.id(), patch)?;
        self.reload();
        Ok(ScrapItem::new(item.kind, record))
    }
}

fn sort_newest_first(records: &mut [ScrapRecord]) {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });
}
