//! # Scraps Architecture
//!
//! Scraps is a **UI-agnostic note storage library**. A scrap is a short note made of a label and
//! an opaque editor document. Scraps live in one of two backends:
//!
//! - **Global** ([`BackendKind::KeyValueStore`](model::BackendKind)): one collection in the
//!   user's key/value document, always available.
//! - **Workspace** ([`BackendKind::WorkspaceFile`](model::BackendKind)): JSON files under
//!   `<workspace>/.scraps/`, available only while a workspace is open.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, parses selectors, returns CmdResult         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per operation, no I/O                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog (catalog.rs)                                       │
//! │  - Sorted listing per kind, reloaded after every mutation   │
//! │  - Change observers                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageRegistry routes by kind                           │
//! │  - KeyValueBackend, WorkspaceBackend                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing from `api.rs` inward writes to stdout/stderr or exits the process. Diagnostics go
//! through `tracing`; the client decides whether and where they are shown.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: one module per operation
//! - [`catalog`]: the cached, sorted, observable listing
//! - [`store`]: the backend trait, both backends and the registry
//! - [`kv`]: the key/value substrate under the global backend
//! - [`migrate`]: one-shot import of the pre-id flat list
//! - [`index`]: `g1` / `w2` display indexes and selectors
//! - [`model`]: `ScrapRecord`, `BackendKind` and friends
//! - [`config`]: configuration
//! - [`init`]: workspace detection and context construction
//! - [`error`]: error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod init;
pub mod kv;
pub mod migrate;
pub mod model;
pub mod store;
