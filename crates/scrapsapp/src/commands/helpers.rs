use crate::catalog::Catalog;
use crate::error::Result;
use crate::index::{index_listing, resolve_selectors, DisplayIndex, DisplayScrap, ScrapSelector};
use crate::kv::KeyValueStore;
use crate::model::ScrapItem;

pub fn indexed_scraps<K: KeyValueStore + 'static>(catalog: &Catalog<K>) -> Vec<DisplayScrap> {
    index_listing(catalog.listing())
}

pub fn scraps_by_selectors<K: KeyValueStore + 'static>(
    catalog: &Catalog<K>,
    selectors: &[ScrapSelector],
) -> Result<Vec<DisplayScrap>> {
    resolve_selectors(&indexed_scraps(catalog), selectors)
}

/// Pairs an item with its index in the current listing.
///
/// Used right after a mutation, when the item is known to be listed. Falls back to position 1
/// if it is not, which only happens when a listing of its kind failed.
pub fn display_for<K: KeyValueStore + 'static>(
    catalog: &Catalog<K>,
    item: ScrapItem,
) -> DisplayScrap {
    let position = catalog
        .items(item.kind)
        .iter()
        .position(|record| &record.id == item.id())
        .map(|i| i + 1)
        .unwrap_or(1);
    DisplayScrap {
        index: DisplayIndex::new(item.kind, position),
        item,
    }
}
