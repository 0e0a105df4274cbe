//! # Domain Model: Scraps and Backend Kinds
//!
//! This module defines the core data structures for scraps: [`ScrapRecord`], [`BackendKind`],
//! [`ScrapPatch`] and the pre-multi-backend [`LegacyScrap`].
//!
//! ## The Record
//!
//! A scrap is a short note with five fields, all of them always populated:
//!
//! ```text
//! id         opaque string; new scraps get a UUID v4, never changes
//! label      the title shown in listings, renamed freely
//! content    the editor's serialized document, opaque to storage
//! createdAt  set once, at creation
//! updatedAt  refreshed by every update, never earlier than createdAt
//! ```
//!
//! `content` is never parsed, validated or reshaped anywhere in this crate. The editor owns its
//! format; storage moves the string around byte for byte.
//!
//! ## On-Disk Format
//!
//! Records serialize with camelCase keys and RFC 3339 timestamps, which is the format both the
//! key/value collection and the workspace `index.json` / `<id>.json` files use:
//!
//! ```json
//! {
//!   "id": "6f1c...",
//!   "label": "Meeting notes",
//!   "content": "{}",
//!   "createdAt": "2024-05-01T10:00:00Z",
//!   "updatedAt": "2024-05-01T10:00:00Z"
//! }
//! ```
//!
//! Ids are compared and stored as plain strings. Data written by older versions may carry ids
//! that are not UUIDs, and those records load like any other.
//!
//! ## Backend Kinds
//!
//! The set of kinds is closed: [`BackendKind::KeyValueStore`] is always available,
//! [`BackendKind::WorkspaceFile`] only while a workspace root is open. A record belongs to
//! exactly one kind for its whole life; see [`ScrapItem`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "globalState")]
    KeyValueStore,
    #[serde(rename = "file")]
    WorkspaceFile,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::KeyValueStore, BackendKind::WorkspaceFile];

    /// Wire name, as stored in configuration and shown in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::KeyValueStore => "globalState",
            BackendKind::WorkspaceFile => "file",
        }
    }

    /// Human-readable group name.
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::KeyValueStore => "Global Storage",
            BackendKind::WorkspaceFile => "File Storage",
        }
    }

    /// Prefix used by display indexes (`g1`, `w3`).
    pub fn prefix(&self) -> char {
        match self {
            BackendKind::KeyValueStore => 'g',
            BackendKind::WorkspaceFile => 'w',
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "globalstate" | "global" | "kv" | "g" => Ok(BackendKind::KeyValueStore),
            "file" | "workspace" | "files" | "w" => Ok(BackendKind::WorkspaceFile),
            other => Err(format!(
                "Unknown storage type \"{}\" (expected \"global\" or \"workspace\")",
                other
            )),
        }
    }
}

/// Identifier of a scrap. Opaque: only equality and ordering matter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapId(String);

impl ScrapId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScrapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScrapId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ScrapId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapRecord {
    pub id: ScrapId,
    pub label: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScrapRecord {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new_at(label, content, Utc::now())
    }

    /// Creates a record whose both timestamps are `at`.
    pub fn new_at(label: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: ScrapId::new(),
            label: label.into(),
            content: content.into(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Merges `patch` and refreshes `updated_at`, never moving it before `created_at`.
    pub fn apply(&mut self, patch: ScrapPatch, now: DateTime<Utc>) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now.max(self.created_at);
    }

    pub fn check_timestamps(&self) -> crate::error::Result<()> {
        if self.updated_at < self.created_at {
            return Err(crate::error::ScrapsError::InvalidRecord {
                id: self.id.clone(),
                reason: "updatedAt is earlier than createdAt".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial update of the mutable fields of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapPatch {
    pub label: Option<String>,
    pub content: Option<String>,
}

impl ScrapPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            label: None,
            content: Some(content.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.content.is_none()
    }
}

/// A record together with the backend it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapItem {
    pub kind: BackendKind,
    pub record: ScrapRecord,
}

impl ScrapItem {
    pub fn new(kind: BackendKind, record: ScrapRecord) -> Self {
        Self { kind, record }
    }

    pub fn id(&self) -> &ScrapId {
        &self.record.id
    }
}

/// Entry of the flat list kept before scraps had ids, timestamps or backends.
///
/// Old data is not guaranteed to carry both fields, so a missing one deserializes as `None`
/// and the migrator fills in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyScrap {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
