//! # Context Construction
//!
//! Scraps has two places to keep notes:
//!
//! - **Global**: the user's key/value document, `state.json` in the OS data directory (via the
//!   `directories` crate). Always available.
//! - **Workspace**: `<root>/.scraps/`, only while a workspace is open.
//!
//! [`initialize`] decides which workspace is open, loads configuration, and wires the
//! [`ScrapsApi`] every client talks to.
//!
//! ## Workspace Detection
//!
//! Resolved in this order:
//! 1. `no_workspace` → no workspace backend at all.
//! 2. An explicit `workspace` path → that directory is the root.
//! 3. Otherwise [`find_workspace_root`] walks up from `cwd` to the first directory holding
//!    `.scraps` or `.git`. It stops at `HOME` and at the filesystem root.
//!
//! Detection never creates anything. `.scraps/` appears on the first workspace save.
//!
//! ## Legacy Data
//!
//! The pre-id flat list is migrated on start-up, best effort: a failure is logged and the
//! context is still returned, with the legacy key left in place for the next run.

use crate::api::ScrapsApi;
use crate::catalog::Catalog;
use crate::config::ScrapsConfig;
use crate::error::{Result, ScrapsError};
use crate::kv::json_file::JsonFileKv;
use crate::store::registry::StorageRegistry;
use crate::store::workspace_backend::SCRAPS_DIR;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overrides the global data directory. Mostly used to isolate tests.
pub const GLOBAL_DATA_ENV: &str = "SCRAPS_GLOBAL_DATA";

pub struct ScrapsContext {
    pub api: ScrapsApi<JsonFileKv>,
    pub config: ScrapsConfig,
    pub workspace_root: Option<PathBuf>,
    pub global_dir: PathBuf,
}

/// Walks up from `cwd` to the first directory containing `.scraps` or `.git`.
/// Returns None if none is found before reaching home or the filesystem root.
pub fn find_workspace_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(SCRAPS_DIR).exists() || current.join(".git").exists() {
            return Some(current);
        }

        if home_dir.as_deref() == Some(current.as_path()) {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// The global data directory: `$SCRAPS_GLOBAL_DATA`, else the OS data dir for scraps.
pub fn global_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(GLOBAL_DATA_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "scraps", "scraps")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ScrapsError::Config("Could not determine the data directory".to_string()))
}

/// Loads `scraps.toml` from the global dir, then the workspace's `.scraps/` (which wins).
pub fn load_config(global_dir: &Path, workspace_root: Option<&Path>) -> ScrapsConfig {
    let mut search_paths = vec![SearchPath::Path(global_dir.to_path_buf())];
    if let Some(root) = workspace_root {
        search_paths.push(SearchPath::Path(root.join(SCRAPS_DIR)));
    }

    Clapfig::builder()
        .app_name("scraps")
        .file_name("scraps.toml")
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_else(|e| {
            warn!(error = %e, "could not load configuration, using defaults");
            ScrapsConfig::default()
        })
}

/// Builds the context for a CLI invocation.
///
/// * `cwd` - where workspace detection starts
/// * `workspace` - explicit workspace root, skips detection
/// * `no_workspace` - run with the global backend only
pub fn initialize(
    cwd: &Path,
    workspace: Option<PathBuf>,
    no_workspace: bool,
) -> Result<ScrapsContext> {
    let workspace_root = if no_workspace {
        None
    } else {
        workspace.or_else(|| find_workspace_root(cwd))
    };
    let global_dir = global_data_dir()?;
    debug!(
        global = %global_dir.display(),
        workspace = ?workspace_root,
        "resolved storage locations"
    );

    let config = load_config(&global_dir, workspace_root.as_deref());

    let registry = StorageRegistry::new(JsonFileKv::in_dir(&global_dir), workspace_root.clone());
    let mut catalog = Catalog::new(registry, config.catalog_defaults());
    if let Err(e) = catalog.migrate_legacy() {
        warn!(error = %e, "legacy data migration failed");
    }

    Ok(ScrapsContext {
        api: ScrapsApi::new(catalog),
        config,
        workspace_root,
        global_dir,
    })
}
