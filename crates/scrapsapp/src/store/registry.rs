//! # Storage Registry
//!
//! The registry owns one backend per available [`BackendKind`] and routes every operation to
//! the right one.
//!
//! ## Lifecycle
//!
//! ```text
//! new(kv, workspace_root)      key/value backend always, workspace backend if a root is open
//!        │
//!        ▼
//! initialize()                 lazily, before the first operation; at most once
//!        │
//!        ▼
//! list / get / save / ...      routed by kind
//!        │
//!        ▼
//! workspace_changed(root)      adds, replaces or drops the workspace backend
//! ```
//!
//! ## Availability and Errors
//!
//! | Operation | Kind not available |
//! |-----------|--------------------|
//! | `list_by_kind` | empty list |
//! | `get_from_kind` | `None` |
//! | `save_to_kind`, `update_in_kind`, `delete_from_kind` | `BackendUnavailable` |
//!
//! A backend that fails to initialize is logged and stays registered; its siblings are
//! initialized regardless. Listing failures in `list_all` are logged and reported as empty
//! for that kind only.

use super::kv_backend::KeyValueBackend;
use super::workspace_backend::WorkspaceBackend;
use super::StorageBackend;
use crate::error::{Result, ScrapsError};
use crate::kv::KeyValueStore;
use crate::model::{BackendKind, ScrapId, ScrapPatch, ScrapRecord};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

pub type Listing = BTreeMap<BackendKind, Vec<ScrapRecord>>;

pub struct StorageRegistry<K: KeyValueStore + 'static> {
    kv: Rc<K>,
    backends: BTreeMap<BackendKind, Box<dyn StorageBackend>>,
    workspace_root: Option<PathBuf>,
    initialized: bool,
}

impl<K: KeyValueStore + 'static> StorageRegistry<K> {
    pub fn new(kv: K, workspace_root: Option<PathBuf>) -> Self {
        Self::with_shared_kv(Rc::new(kv), workspace_root)
    }

    pub fn with_shared_kv(kv: Rc<K>, workspace_root: Option<PathBuf>) -> Self {
        let mut backends: BTreeMap<BackendKind, Box<dyn StorageBackend>> = BTreeMap::new();
        backends.insert(
            BackendKind::KeyValueStore,
            Box::new(KeyValueBackend::new(kv.clone())),
        );
        if let Some(root) = &workspace_root {
            backends.insert(
                BackendKind::WorkspaceFile,
                Box::new(WorkspaceBackend::new(root.clone())),
            );
        }
        Self {
            kv,
            backends,
            workspace_root,
            initialized: false,
        }
    }

    /// The key/value substrate shared with the global backend.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// Runs every backend's `initialize` once. Failures are logged, not returned.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        for (kind, backend) in &self.backends {
            initialize_backend(*kind, backend.as_ref());
        }
        self.initialized = true;
    }

    /// Registers `backend` for its kind, replacing any previous one, and re-arms `initialize`.
    #[cfg(test)]
    pub(crate) fn insert_backend(&mut self, backend: Box<dyn StorageBackend>) {
        self.backends.insert(backend.kind(), backend);
        self.initialized = false;
    }

    pub fn is_available(&self, kind: BackendKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// Kinds with a live backend, in fixed order.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.backends.keys().copied().collect()
    }

    fn backend(&mut self, kind: BackendKind) -> Option<&dyn StorageBackend> {
        self.initialize();
        self.backends.get(&kind).map(|backend| backend.as_ref())
    }

    fn require(&mut self, kind: BackendKind) -> Result<&dyn StorageBackend> {
        self.backend(kind)
            .ok_or(ScrapsError::BackendUnavailable(kind))
    }

    /// Records of one kind. Unavailable kinds and listing failures both yield an empty list.
    pub fn list_by_kind(&mut self, kind: BackendKind) -> Vec<ScrapRecord> {
        match self.backend(kind) {
            Some(backend) => list_or_empty(kind, backend),
            None => Vec::new(),
        }
    }

    /// Every available kind with its records.
    pub fn list_all(&mut self) -> Listing {
        self.initialize();
        self.backends
            .iter()
            .map(|(kind, backend)| (*kind, list_or_empty(*kind, backend.as_ref())))
            .collect()
    }

    pub fn get_from_kind(&mut self, kind: BackendKind, id: &ScrapId) -> Result<Option<ScrapRecord>> {
        match self.backend(kind) {
            Some(backend) => backend.get(id),
            None => Ok(None),
        }
    }

    pub fn save_to_kind(&mut self, kind: BackendKind, record: &ScrapRecord) -> Result<()> {
        self.require(kind)?.save(record)
    }

    pub fn update_in_kind(
        &mut self,
        kind: BackendKind,
        id: &ScrapId,
        patch: ScrapPatch,
    ) -> Result<ScrapRecord> {
        self.require(kind)?.update(id, patch)
    }

    pub fn delete_from_kind(&mut self, kind: BackendKind, id: &ScrapId) -> Result<()> {
        self.require(kind)?.delete(id)
    }

    /// Reconciles the workspace backend with the currently open workspace root.
    ///
    /// Dropping the backend only forgets it; files already written stay on disk.
    pub fn workspace_changed(&mut self, root: Option<&Path>) {
        let current = self.workspace_root.clone();
        match (root, current) {
            (Some(root), Some(current)) if root == current.as_path() => {
                if !self.backends.contains_key(&BackendKind::WorkspaceFile) {
                    self.attach_workspace(root);
                }
            }
            (Some(root), previous) => {
                if let Some(previous) = previous {
                    info!(from = %previous.display(), to = %root.display(), "workspace root changed");
                }
                self.attach_workspace(root);
            }
            (None, Some(previous)) => {
                self.backends.remove(&BackendKind::WorkspaceFile);
                self.workspace_root = None;
                info!(root = %previous.display(), "workspace closed, file storage detached");
            }
            (None, None) => {
                debug!("workspace change with no workspace open");
            }
        }
    }

    fn attach_workspace(&mut self, root: &Path) {
        let backend = WorkspaceBackend::new(root);
        initialize_backend(BackendKind::WorkspaceFile, &backend);
        self.backends
            .insert(BackendKind::WorkspaceFile, Box::new(backend));
        self.workspace_root = Some(root.to_path_buf());
        info!(root = %root.display(), "file storage attached");
    }
}

fn initialize_backend(kind: BackendKind, backend: &dyn StorageBackend) {
    if let Err(e) = backend.initialize() {
        warn!(backend = %kind, error = %e, "failed to initialize storage backend");
    }
}

fn list_or_empty(kind: BackendKind, backend: &dyn StorageBackend) -> Vec<ScrapRecord> {
    backend.list().unwrap_or_else(|e| {
        warn!(backend = %kind, error = %e, "failed to list scraps");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::memory::MemoryKv;
    use crate::kv::ITEMS_KEY;
    use serde_json::json;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn global_only() -> StorageRegistry<MemoryKv> {
        StorageRegistry::new(MemoryKv::new(), None)
    }

    #[test]
    fn test_global_backend_always_available() {
        let registry = global_only();
        assert!(registry.is_available(BackendKind::KeyValueStore));
        assert!(!registry.is_available(BackendKind::WorkspaceFile));
        assert_eq!(
            registry.available_backends(),
            vec![BackendKind::KeyValueStore]
        );
    }

    #[test]
    fn test_workspace_backend_when_root_open() {
        let dir = TempDir::new().unwrap();
        let registry = StorageRegistry::new(MemoryKv::new(), Some(dir.path().to_path_buf()));
        assert_eq!(
            registry.available_backends(),
            vec![BackendKind::KeyValueStore, BackendKind::WorkspaceFile]
        );
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut registry = global_only();
        registry.initialize();
        registry.initialize();
        assert!(registry.list_by_kind(BackendKind::KeyValueStore).is_empty());
    }

    #[test]
    fn test_save_get_update_delete_routed() {
        let mut registry = global_only();
        let record = ScrapRecord::new("Original", "{}");

        registry
            .save_to_kind(BackendKind::KeyValueStore, &record)
            .unwrap();
        assert_eq!(
            registry
                .get_from_kind(BackendKind::KeyValueStore, &record.id)
                .unwrap(),
            Some(record.clone())
        );

        registry
            .update_in_kind(
                BackendKind::KeyValueStore,
                &record.id,
                ScrapPatch::label("Updated"),
            )
            .unwrap();
        let updated = registry
            .get_from_kind(BackendKind::KeyValueStore, &record.id)
            .unwrap()
            .unwrap();
        assert_eq!(updated.label, "Updated");

        registry
            .delete_from_kind(BackendKind::KeyValueStore, &record.id)
            .unwrap();
        assert_eq!(
            registry
                .get_from_kind(BackendKind::KeyValueStore, &record.id)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_unavailable_kind_writes_fail_reads_are_empty() {
        let mut registry = global_only();
        let record = ScrapRecord::new("Test", "{}");

        let err = registry
            .save_to_kind(BackendKind::WorkspaceFile, &record)
            .unwrap_err();
        assert!(matches!(err, ScrapsError::BackendUnavailable(_)));
        assert!(err.to_string().contains("not available"));

        assert!(registry
            .update_in_kind(
                BackendKind::WorkspaceFile,
                &record.id,
                ScrapPatch::label("x")
            )
            .is_err());
        assert!(registry
            .delete_from_kind(BackendKind::WorkspaceFile, &record.id)
            .is_err());

        assert!(registry.list_by_kind(BackendKind::WorkspaceFile).is_empty());
        assert_eq!(
            registry
                .get_from_kind(BackendKind::WorkspaceFile, &record.id)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_list_all_covers_available_kinds() {
        let mut registry = global_only();
        registry
            .save_to_kind(BackendKind::KeyValueStore, &ScrapRecord::new("Test", "{}"))
            .unwrap();

        let all = registry.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&BackendKind::KeyValueStore].len(), 1);
    }

    #[test]
    fn test_list_failure_is_isolated_per_kind() {
        let dir = TempDir::new().unwrap();
        let kv = MemoryKv::new();
        kv.update(ITEMS_KEY, Some(json!("not a list"))).unwrap();
        let mut registry = StorageRegistry::new(kv, Some(dir.path().to_path_buf()));
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("W", "{}"))
            .unwrap();

        let all = registry.list_all();
        assert!(all[&BackendKind::KeyValueStore].is_empty());
        assert_eq!(all[&BackendKind::WorkspaceFile].len(), 1);
        assert!(registry.list_by_kind(BackendKind::KeyValueStore).is_empty());
    }

    struct StubBackend {
        kind: BackendKind,
        fail_init: bool,
        init_calls: Rc<Cell<u32>>,
        records: Vec<ScrapRecord>,
    }

    impl StorageBackend for StubBackend {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn initialize(&self) -> Result<()> {
            self.init_calls.set(self.init_calls.get() + 1);
            if self.fail_init {
                Err(ScrapsError::Store("medium offline".to_string()))
            } else {
                Ok(())
            }
        }

        fn list(&self) -> Result<Vec<ScrapRecord>> {
            Ok(self.records.clone())
        }

        fn save(&self, _record: &ScrapRecord) -> Result<()> {
            Ok(())
        }

        fn delete(&self, _id: &ScrapId) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_initialize_does_not_block_siblings() {
        let failing_calls = Rc::new(Cell::new(0));
        let healthy_calls = Rc::new(Cell::new(0));
        let mut registry = global_only();
        registry.insert_backend(Box::new(StubBackend {
            kind: BackendKind::KeyValueStore,
            fail_init: true,
            init_calls: failing_calls.clone(),
            records: vec![ScrapRecord::new("Global", "{}")],
        }));
        registry.insert_backend(Box::new(StubBackend {
            kind: BackendKind::WorkspaceFile,
            fail_init: false,
            init_calls: healthy_calls.clone(),
            records: vec![ScrapRecord::new("Local", "{}")],
        }));

        let all = registry.list_all();

        assert_eq!(failing_calls.get(), 1);
        assert_eq!(healthy_calls.get(), 1);
        assert_eq!(
            registry.available_backends(),
            vec![BackendKind::KeyValueStore, BackendKind::WorkspaceFile]
        );
        assert_eq!(all[&BackendKind::KeyValueStore][0].label, "Global");
        assert_eq!(all[&BackendKind::WorkspaceFile][0].label, "Local");

        // The guard holds after a failure: no second attempt
        registry.list_all();
        assert_eq!(failing_calls.get(), 1);
        assert_eq!(healthy_calls.get(), 1);
    }

    #[test]
    fn test_workspace_opened_attaches_backend() {
        let dir = TempDir::new().unwrap();
        let mut registry = global_only();

        registry.workspace_changed(Some(dir.path()));

        assert!(registry.is_available(BackendKind::WorkspaceFile));
        assert_eq!(registry.workspace_root(), Some(dir.path()));
        // Attaching must not materialize anything
        assert!(!dir.path().join(".scraps").exists());
    }

    #[test]
    fn test_workspace_closed_detaches_but_keeps_files() {
        let dir = TempDir::new().unwrap();
        let mut registry = StorageRegistry::new(MemoryKv::new(), Some(dir.path().to_path_buf()));
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("Kept", "{}"))
            .unwrap();

        registry.workspace_changed(None);

        assert!(!registry.is_available(BackendKind::WorkspaceFile));
        assert!(dir.path().join(".scraps").join("index.json").exists());
        assert!(registry.list_by_kind(BackendKind::WorkspaceFile).is_empty());
    }

    #[test]
    fn test_workspace_reopened_sees_previous_files() {
        let dir = TempDir::new().unwrap();
        let mut registry = StorageRegistry::new(MemoryKv::new(), Some(dir.path().to_path_buf()));
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("Kept", "{}"))
            .unwrap();

        registry.workspace_changed(None);
        registry.workspace_changed(Some(dir.path()));

        assert_eq!(registry.list_by_kind(BackendKind::WorkspaceFile).len(), 1);
    }

    #[test]
    fn test_workspace_switch_replaces_backend() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let mut registry =
            StorageRegistry::new(MemoryKv::new(), Some(first.path().to_path_buf()));
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("First", "{}"))
            .unwrap();

        registry.workspace_changed(Some(second.path()));

        assert_eq!(registry.workspace_root(), Some(second.path()));
        assert!(registry.list_by_kind(BackendKind::WorkspaceFile).is_empty());
    }

    #[test]
    fn test_same_workspace_change_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut registry = StorageRegistry::new(MemoryKv::new(), Some(dir.path().to_path_buf()));
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("Same", "{}"))
            .unwrap();

        registry.workspace_changed(Some(dir.path()));

        assert_eq!(registry.list_by_kind(BackendKind::WorkspaceFile).len(), 1);
    }

    #[test]
    fn test_errors_stay_within_their_backend() {
        let dir = TempDir::new().unwrap();
        let kv = MemoryKv::new();
        let mut registry = StorageRegistry::new(kv, Some(dir.path().to_path_buf()));
        registry.kv().set_simulate_write_error(true);

        assert!(registry
            .save_to_kind(BackendKind::KeyValueStore, &ScrapRecord::new("G", "{}"))
            .is_err());
        registry
            .save_to_kind(BackendKind::WorkspaceFile, &ScrapRecord::new("W", "{}"))
            .unwrap();
        assert_eq!(registry.list_by_kind(BackendKind::WorkspaceFile).len(), 1);
    }
}
