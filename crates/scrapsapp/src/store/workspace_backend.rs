use super::{upsert, StorageBackend};
use crate::error::{Result, ScrapsError};
use crate::model::{BackendKind, ScrapId, ScrapRecord};
use std::cell::Cell;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Name of the hidden directory at the workspace root.
pub const SCRAPS_DIR: &str = ".scraps";
pub const INDEX_FILE: &str = "index.json";
const GITIGNORE_FILE: &str = ".gitignore";
const GITIGNORE_COMMENT: &str = "# Scraps local notes";

/// Workspace backend: JSON files under `<root>/.scraps/`.
///
/// Nothing is written to the workspace until the first `save`. A workspace whose user never
/// creates a scrap keeps no `.scraps/` directory and no `.gitignore` entry.
///
/// `index.json` is the listing. The per-record files are written alongside it but are never
/// read back, so a record file that disagrees with the index has no effect.
pub struct WorkspaceBackend {
    root: PathBuf,
    scraps_dir: PathBuf,
    index_path: PathBuf,
    /// Whether `.scraps/` was seen on disk (at initialize or created by a save).
    materialized: Cell<bool>,
}

impl WorkspaceBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let scraps_dir = root.join(SCRAPS_DIR);
        let index_path = scraps_dir.join(INDEX_FILE);
        Self {
            root,
            scraps_dir,
            index_path,
            materialized: Cell::new(false),
        }
    }

    /// The workspace root this backend writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scraps_dir(&self) -> &Path {
        &self.scraps_dir
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    fn record_path(&self, id: &ScrapId) -> PathBuf {
        self.scraps_dir.join(format!("{}.json", id))
    }

    /// Creates `.scraps/`, an empty index and the ignore entry, if the directory is missing.
    fn ensure_materialized(&self) -> Result<()> {
        if self.materialized.get() && self.scraps_dir.is_dir() {
            return Ok(());
        }

        if !self.scraps_dir.is_dir() {
            fs::create_dir_all(&self.scraps_dir).map_err(ScrapsError::Io)?;
            info!(dir = %self.scraps_dir.display(), "created workspace scraps directory");
            self.ensure_gitignored()?;
        }
        if !self.index_path.exists() {
            self.write_atomic(&self.index_path, "[]")?;
        }
        self.materialized.set(true);
        Ok(())
    }

    /// Appends `.scraps/` to the workspace `.gitignore`, creating the file when absent.
    /// Existing content is left byte for byte.
    fn ensure_gitignored(&self) -> Result<()> {
        let path = self.root.join(GITIGNORE_FILE);
        let entry = format!("{}/", SCRAPS_DIR);

        match fs::read_to_string(&path) {
            Ok(existing) => {
                if gitignore_has_entry(&existing, SCRAPS_DIR) {
                    return Ok(());
                }
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(ScrapsError::Io)?;
                write!(file, "\n{}\n{}\n", GITIGNORE_COMMENT, entry).map_err(ScrapsError::Io)?;
                debug!(path = %path.display(), "appended scraps entry to .gitignore");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&path, format!("{}\n{}\n", GITIGNORE_COMMENT, entry))
                    .map_err(ScrapsError::Io)?;
                debug!(path = %path.display(), "created .gitignore");
            }
            Err(e) => return Err(ScrapsError::Io(e)),
        }
        Ok(())
    }

    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        let tmp_path = self
            .scraps_dir
            .join(format!(".scraps-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(ScrapsError::Io)?;
        fs::rename(&tmp_path, target).map_err(ScrapsError::Io)?;
        Ok(())
    }

    fn write_index(&self, records: &[ScrapRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(ScrapsError::Serialization)?;
        self.write_atomic(&self.index_path, &content)?;
        debug!(count = records.len(), path = %self.index_path.display(), "wrote index");
        Ok(())
    }
}

/// True when some line of an ignore file already excludes `dir` (`dir`, `dir/`, `/dir/`).
fn gitignore_has_entry(content: &str, dir: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let line = line.strip_suffix('/').unwrap_or(line);
        line == dir
    })
}

impl StorageBackend for WorkspaceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::WorkspaceFile
    }

    fn initialize(&self) -> Result<()> {
        // Detect only; the first save materializes.
        if self.scraps_dir.is_dir() {
            self.materialized.set(true);
            debug!(dir = %self.scraps_dir.display(), "found existing scraps directory");
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<ScrapRecord>> {
        let content = match fs::read_to_string(&self.index_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(path = %self.index_path.display(), error = %e, "unreadable index, treating as empty");
                return Ok(Vec::new());
            }
        };
        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(path = %self.index_path.display(), error = %e, "corrupt index, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, record: &ScrapRecord) -> Result<()> {
        record.check_timestamps()?;
        self.ensure_materialized()?;

        let mut records = self.list()?;
        upsert(&mut records, record);

        let record_json =
            serde_json::to_string_pretty(record).map_err(ScrapsError::Serialization)?;
        self.write_atomic(&self.record_path(&record.id), &record_json)?;
        self.write_index(&records)
    }

    fn delete(&self, id: &ScrapId) -> Result<()> {
        if !self.scraps_dir.is_dir() {
            return Ok(());
        }

        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ScrapsError::Io(e)),
        }

        let mut records = self.list()?;
        records.retain(|record| record.id != *id);
        self.write_index(&records)
    }
}
