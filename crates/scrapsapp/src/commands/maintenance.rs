//! Commands that act on the catalog as a whole rather than on selected scraps.

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::kv::KeyValueStore;

use super::helpers::indexed_scraps;

pub fn refresh<K: KeyValueStore + 'static>(catalog: &mut Catalog<K>) -> Result<CmdResult> {
    catalog.refresh();
    let scraps = indexed_scraps(catalog);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Refreshed {} scrap(s)",
        scraps.len()
    )));
    Ok(result
        .with_listed_scraps(scraps)
        .with_backends(catalog.available_backends()))
}

pub fn migrate_legacy<K: KeyValueStore + 'static>(catalog: &mut Catalog<K>) -> Result<CmdResult> {
    let report = catalog.migrate_legacy()?;
    let mut result = CmdResult::default();
    if report.migrated == 0 {
        result.add_message(CmdMessage::info("No legacy data to migrate"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Data migration completed: {} scrap(s) migrated",
            report.migrated
        )));
    }
    Ok(result)
}

pub fn backends<K: KeyValueStore + 'static>(catalog: &Catalog<K>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_backends(catalog.available_backends()))
}
