use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::kv::KeyValueStore;
use crate::model::BackendKind;

use super::helpers::display_for;

/// Creates a scrap. `kind` of `None` uses the configured default backend.
pub fn run<K: KeyValueStore + 'static>(
    catalog: &mut Catalog<K>,
    label: Option<String>,
    kind: Option<BackendKind>,
) -> Result<CmdResult> {
    let item = catalog.add_item(label, kind)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Scrap created: {}",
        item.record.label
    )));
    if item.kind == BackendKind::WorkspaceFile {
        if let Some(root) = catalog.registry().workspace_root() {
            result.add_message(CmdMessage::info(format!(
                "Stored in {}",
                root.join(crate::store::workspace_backend::SCRAPS_DIR).display()
            )));
        }
    }
    result.affected_scraps.push(display_for(catalog, item));
    Ok(result)
}
