//! # Configuration
//!
//! Scraps configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SCRAPS__DEFAULT_LABEL`, `SCRAPS__DEFAULT_BACKEND`, etc.
//! 2. **Workspace Config**: `<workspace>/.scraps/scraps.toml`
//! 3. **Global Config**: `scraps.toml` in the global data directory.
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_label` | `Untitled` | Label for scraps created without one |
//! | `default_content` | `{}` | Initial editor document of a new scrap |
//! | `default_backend` | unset (`globalState`) | Where `add` puts scraps without `--to` |

use crate::catalog::CatalogDefaults;
use crate::model::BackendKind;
use confique::Config;
use serde::{Deserialize, Serialize};

/// Configuration for scraps, stored in `scraps.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScrapsConfig {
    /// Label given to scraps created without one.
    #[config(default = "Untitled")]
    pub default_label: String,

    /// Content of a freshly created scrap (an empty editor document).
    #[config(default = "{}")]
    pub default_content: String,

    /// Backend used by `add` when none is requested: "globalState" or "file".
    /// Unset means the global key/value store.
    pub default_backend: Option<BackendKind>,
}

impl Default for ScrapsConfig {
    fn default() -> Self {
        Self {
            default_label: "Untitled".to_string(),
            default_content: "{}".to_string(),
            default_backend: None,
        }
    }
}

impl ScrapsConfig {
    /// Catalog defaults; a blank configured label falls back to "Untitled".
    pub fn catalog_defaults(&self) -> CatalogDefaults {
        let label = if self.default_label.trim().is_empty() {
            "Untitled".to_string()
        } else {
            self.default_label.clone()
        };
        CatalogDefaults {
            label,
            content: self.default_content.clone(),
            backend: self
                .default_backend
                .unwrap_or(BackendKind::KeyValueStore),
        }
    }
}
