//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point for
//! every scraps operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the command functions in [`crate::commands`]
//! - **Normalizes inputs**: user selectors (`g1`, `w2-w4`, a title) become [`ScrapSelector`]s
//! - **Returns structured types**: `Result<CmdResult>`, never strings
//!
//! It holds no business logic and performs no terminal I/O.
//!
//! ## Command Surface
//!
//! | Method | Operation |
//! |--------|-----------|
//! | [`add_item`](ScrapsApi::add_item) | create in the configured default backend |
//! | [`add_item_to_backend`](ScrapsApi::add_item_to_backend) | create in a chosen backend |
//! | [`rename_item`](ScrapsApi::rename_item) | change the label |
//! | [`edit_item`](ScrapsApi::edit_item) | replace the content |
//! | [`delete_item`](ScrapsApi::delete_item) | remove scraps |
//! | [`refresh`](ScrapsApi::refresh) | reload from storage |
//! | [`migrate_legacy_data`](ScrapsApi::migrate_legacy_data) | import the pre-id flat list |
//! | [`workspace_changed`](ScrapsApi::workspace_changed) | the open workspace changed |
//!
//! ## Generic Over the Key/Value Store
//!
//! `ScrapsApi<K: KeyValueStore>`: production uses
//! [`JsonFileKv`](crate::kv::json_file::JsonFileKv), tests use
//! [`MemoryKv`](crate::kv::memory::MemoryKv).

use crate::catalog::{Catalog, SubscriptionId};
use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::index::{parse_selector, parse_selectors, ScrapSelector};
use crate::kv::KeyValueStore;
use crate::model::BackendKind;
use crate::store::registry::Listing;
use std::path::Path;

pub struct ScrapsApi<K: KeyValueStore + 'static> {
    catalog: Catalog<K>,
}

impl<K: KeyValueStore + 'static> ScrapsApi<K> {
    pub fn new(catalog: Catalog<K>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog<K> {
        &self.catalog
    }

    pub fn add_item(&mut self, label: Option<String>) -> Result<CmdResult> {
        commands::create::run(&mut self.catalog, label, None)
    }

    pub fn add_item_to_backend(
        &mut self,
        kind: BackendKind,
        label: Option<String>,
    ) -> Result<CmdResult> {
        commands::create::run(&mut self.catalog, label, Some(kind))
    }

    pub fn rename_item(&mut self, selector: &str, label: impl Into<String>) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::update::rename(&mut self.catalog, &selector, label.into())
    }

    pub fn edit_item(&mut self, selector: &str, content: impl Into<String>) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::update::edit(&mut self.catalog, &selector, content.into())
    }

    pub fn delete_item<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run(&mut self.catalog, &selectors)
    }

    pub fn view_items<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        let selectors: Vec<ScrapSelector> = parse_selectors(selectors)?;
        commands::view::run(&self.catalog, &selectors)
    }

    pub fn list(&self, kind: Option<BackendKind>) -> Result<CmdResult> {
        commands::list::run(&self.catalog, kind)
    }

    pub fn refresh(&mut self) -> Result<CmdResult> {
        commands::maintenance::refresh(&mut self.catalog)
    }

    pub fn migrate_legacy_data(&mut self) -> Result<CmdResult> {
        commands::maintenance::migrate_legacy(&mut self.catalog)
    }

    /// Attaches, replaces or detaches the workspace backend. Files on disk are never touched.
    pub fn workspace_changed(&mut self, root: Option<&Path>) -> Result<CmdResult> {
        self.catalog.workspace_changed(root);
        commands::maintenance::backends(&self.catalog)
    }

    pub fn available_backends(&self) -> Result<CmdResult> {
        commands::maintenance::backends(&self.catalog)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Listing) + 'static) -> SubscriptionId {
        self.catalog.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.catalog.unsubscribe(id)
    }
}

pub use crate::commands::{CmdMessage, MessageLevel};
