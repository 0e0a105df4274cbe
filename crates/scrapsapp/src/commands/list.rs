use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::kv::KeyValueStore;
use crate::model::BackendKind;

use super::helpers::indexed_scraps;

/// The catalog listing, indexed. `kind` restricts it to one backend.
pub fn run<K: KeyValueStore + 'static>(
    catalog: &Catalog<K>,
    kind: Option<BackendKind>,
) -> Result<CmdResult> {
    let mut scraps = indexed_scraps(catalog);
    if let Some(kind) = kind {
        scraps.retain(|ds| ds.item.kind == kind);
    }
    Ok(CmdResult::default()
        .with_listed_scraps(scraps)
        .with_backends(catalog.available_backends()))
}
