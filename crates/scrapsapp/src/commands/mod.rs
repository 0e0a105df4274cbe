//! # Command Layer
//!
//! Each user-facing operation lives in its own submodule as a plain `run` function over a
//! [`Catalog`](crate::catalog::Catalog). Commands resolve selectors, call the catalog, and
//! describe what happened in a [`CmdResult`]. They never print and never exit.
//!
//! - [`create`]: add a scrap, to the default backend or a chosen one
//! - [`list`]: the indexed listing, optionally one kind only
//! - [`view`]: full records for selected scraps
//! - [`update`]: rename and edit
//! - [`delete`]: remove scraps
//! - [`maintenance`]: refresh, legacy migration, backend availability
//!
//! Commands are tested against [`MemoryKv`](crate::kv::memory::MemoryKv), plus a temporary
//! directory when the workspace backend is involved.

use crate::index::DisplayScrap;
use crate::model::BackendKind;
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod maintenance;
pub mod update;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Scraps created or modified, with their index after the operation.
    pub affected_scraps: Vec<DisplayScrap>,
    /// Scraps to display.
    pub listed_scraps: Vec<DisplayScrap>,
    /// Available backend kinds, for commands that report them.
    pub backends: Vec<BackendKind>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_scraps(mut self, scraps: Vec<DisplayScrap>) -> Self {
        self.listed_scraps = scraps;
        self
    }

    pub fn with_backends(mut self, backends: Vec<BackendKind>) -> Self {
        self.backends = backends;
        self
    }
}
