use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::ScrapSelector;
use crate::kv::KeyValueStore;

use super::helpers::scraps_by_selectors;

/// Deletes every selected scrap. Selectors are resolved once, before the first deletion, so
/// indexes refer to the listing the user saw.
pub fn run<K: KeyValueStore + 'static>(
    catalog: &mut Catalog<K>,
    selectors: &[ScrapSelector],
) -> Result<CmdResult> {
    let resolved = scraps_by_selectors(catalog, selectors)?;
    let mut result = CmdResult::default();

    for scrap in resolved {
        catalog.delete_item(&scrap.item)?;
        result.add_message(CmdMessage::success(format!(
            "Scrap deleted ({}): {}",
            scrap.index, scrap.item.record.label
        )));
        result.affected_scraps.push(scrap);
    }

    Ok(result)
}
