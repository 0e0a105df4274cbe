use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::ScrapSelector;
use crate::kv::KeyValueStore;

use super::helpers::scraps_by_selectors;

pub fn run<K: KeyValueStore + 'static>(
    catalog: &Catalog<K>,
    selectors: &[ScrapSelector],
) -> Result<CmdResult> {
    let scraps = scraps_by_selectors(catalog, selectors)?;
    Ok(CmdResult::default().with_listed_scraps(scraps))
}
