use scrapsapp::catalog::{Catalog, CatalogDefaults};
use scrapsapp::kv::json_file::JsonFileKv;
use scrapsapp::kv::{KeyValueStore, ITEMS_KEY, LEGACY_ITEMS_KEY};
use scrapsapp::model::{BackendKind, ScrapRecord};
use scrapsapp::store::registry::StorageRegistry;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, TempDir, StorageRegistry<JsonFileKv>) {
    let workspace = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();
    let registry = StorageRegistry::new(
        JsonFileKv::in_dir(global.path()),
        Some(workspace.path().to_path_buf()),
    );
    (workspace, global, registry)
}

#[test]
fn test_listing_never_materializes_workspace() {
    let (workspace, _global, mut registry) = setup();

    registry.initialize();
    assert!(registry.list_by_kind(BackendKind::WorkspaceFile).is_empty());
    registry.list_all();

    assert!(!workspace.path().join(".scraps").exists());
    assert!(!workspace.path().join(".gitignore").exists());
}

#[test]
fn test_first_save_materializes_directory_index_and_gitignore() {
    let (workspace, _global, mut registry) = setup();
    let record = ScrapRecord::new("Note A", "{}");

    registry
        .save_to_kind(BackendKind::WorkspaceFile, &record)
        .unwrap();

    let scraps_dir = workspace.path().join(".scraps");
    let index: Value =
        serde_json::from_str(&fs::read_to_string(scraps_dir.join("index.json")).unwrap()).unwrap();
    assert_eq!(index.as_array().unwrap().len(), 1);
    assert_eq!(index[0]["label"], "Note A");
    assert!(index[0]["createdAt"].is_string());
    assert!(scraps_dir.join(format!("{}.json", record.id)).exists());

    let gitignore = fs::read_to_string(workspace.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "# Scraps local notes\n.scraps/\n");
}

#[test]
fn test_index_written_by_older_versions_survives_new_saves() {
    let (workspace, _global, mut registry) = setup();
    let scraps_dir = workspace.path().join(".scraps");
    fs::create_dir_all(&scraps_dir).unwrap();
    let uuid_record = ScrapRecord::new("Kept B", "{}");
    let index = json!([
        {
            "id": "test-id",
            "label": "Kept A",
            "content": "{}",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        },
        uuid_record
    ]);
    fs::write(scraps_dir.join("index.json"), index.to_string()).unwrap();

    assert_eq!(registry.list_by_kind(BackendKind::WorkspaceFile).len(), 2);
    registry
        .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("New", "{}"))
        .unwrap();

    let labels: Vec<String> = registry
        .list_by_kind(BackendKind::WorkspaceFile)
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, vec!["Kept A", "Kept B", "New"]);
}

#[test]
fn test_existing_gitignore_gets_entry_appended_once() {
    let (workspace, _global, mut registry) = setup();
    fs::write(workspace.path().join(".gitignore"), "target/").unwrap();

    registry
        .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("One", "{}"))
        .unwrap();
    registry
        .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("Two", "{}"))
        .unwrap();

    let gitignore = fs::read_to_string(workspace.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "target/\n# Scraps local notes\n.scraps/\n");
}

#[test]
fn test_global_records_persist_across_instances() {
    let global = TempDir::new().unwrap();
    let record = ScrapRecord::new("Persistent", "{\"k\":1}");
    {
        let mut registry = StorageRegistry::new(JsonFileKv::in_dir(global.path()), None);
        registry
            .save_to_kind(BackendKind::KeyValueStore, &record)
            .unwrap();
    }

    let mut registry = StorageRegistry::new(JsonFileKv::in_dir(global.path()), None);
    let loaded = registry
        .get_from_kind(BackendKind::KeyValueStore, &record.id)
        .unwrap();
    assert_eq!(loaded, Some(record));

    let state: Value =
        serde_json::from_str(&fs::read_to_string(global.path().join("state.json")).unwrap())
            .unwrap();
    assert!(state[ITEMS_KEY].is_array());
}

#[test]
fn test_workspace_close_keeps_files() {
    let (workspace, _global, registry) = setup();
    let mut catalog = Catalog::new(registry, CatalogDefaults::default());

    catalog
        .add_item_to_backend(BackendKind::WorkspaceFile, Some("Note A".to_string()))
        .unwrap();
    let index_path = workspace.path().join(".scraps").join("index.json");
    assert!(fs::read_to_string(&index_path).unwrap().contains("Note A"));

    catalog.workspace_changed(None);
    assert_eq!(
        catalog.available_backends(),
        vec![BackendKind::KeyValueStore]
    );
    assert!(index_path.exists());
    assert!(catalog
        .add_item_to_backend(BackendKind::WorkspaceFile, None)
        .is_err());

    // Reopening the workspace sees the same scrap again
    catalog.workspace_changed(Some(workspace.path()));
    assert_eq!(catalog.items(BackendKind::WorkspaceFile)[0].label, "Note A");
}

#[test]
fn test_corrupt_index_lists_empty_then_is_overwritten() {
    let (workspace, _global, mut registry) = setup();
    let scraps_dir = workspace.path().join(".scraps");
    fs::create_dir_all(&scraps_dir).unwrap();
    fs::write(scraps_dir.join("index.json"), "{ not json").unwrap();

    assert!(registry.list_by_kind(BackendKind::WorkspaceFile).is_empty());

    registry
        .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("Fresh", "{}"))
        .unwrap();
    let records = registry.list_by_kind(BackendKind::WorkspaceFile);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, "Fresh");
}

#[test]
fn test_legacy_migration_through_json_file_kv() {
    let global = TempDir::new().unwrap();
    let kv = JsonFileKv::in_dir(global.path());
    kv.update(
        LEGACY_ITEMS_KEY,
        Some(json!([
            {"label": "Shopping", "content": "{\"doc\":1}"},
            {"label": "Ideas", "content": "{}"}
        ])),
    )
    .unwrap();

    let mut catalog = Catalog::new(StorageRegistry::new(kv, None), CatalogDefaults::default());
    assert_eq!(catalog.migrate_legacy().unwrap().migrated, 2);
    assert_eq!(catalog.migrate_legacy().unwrap().migrated, 0);

    let reopened = JsonFileKv::in_dir(global.path());
    assert_eq!(reopened.get(LEGACY_ITEMS_KEY).unwrap(), None);
    let items = reopened.get(ITEMS_KEY).unwrap().unwrap();
    assert_eq!(items.as_array().unwrap().len(), 2);
}
