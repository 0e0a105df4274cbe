use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ScrapsError};
use crate::index::ScrapSelector;
use crate::kv::KeyValueStore;

use super::helpers::{display_for, scraps_by_selectors};

/// Renames the scrap `selector` points at. Content is left untouched.
pub fn rename<K: KeyValueStore + 'static>(
    catalog: &mut Catalog<K>,
    selector: &ScrapSelector,
    label: String,
) -> Result<CmdResult> {
    let target = single(catalog, selector)?;
    let old_label = target.record.label.clone();
    let item = catalog.rename_item(&target, label)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Scrap renamed: {} -> {}",
        old_label, item.record.label
    )));
    result.affected_scraps.push(display_for(catalog, item));
    Ok(result)
}

/// Replaces the content of the scrap `selector` points at. The label is left untouched.
pub fn edit<K: KeyValueStore + 'static>(
    catalog: &mut Catalog<K>,
    selector: &ScrapSelector,
    content: String,
) -> Result<CmdResult> {
    let target = single(catalog, selector)?;
    let item = catalog.edit_item(&target, content)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Scrap updated: {}",
        item.record.label
    )));
    result.affected_scraps.push(display_for(catalog, item));
    Ok(result)
}

fn single<K: KeyValueStore + 'static>(
    catalog: &Catalog<K>,
    selector: &ScrapSelector,
) -> Result<crate::model::ScrapItem> {
    let mut scraps = scraps_by_selectors(catalog, std::slice::from_ref(selector))?;
    if scraps.len() != 1 {
        return Err(ScrapsError::Api(format!(
            "{} selects {} scraps, expected exactly one",
            selector,
            scraps.len()
        )));
    }
    Ok(scraps.remove(0).item)
}
