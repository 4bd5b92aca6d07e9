//! Subcommand bodies for the `catalog` binary. Each module exposes a config
//! struct plus `run(cfg)`.

pub mod gallery;
pub mod menu;
pub mod node;
pub mod search;
pub mod sitemap;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::catalog::{CatalogRepository, FixtureCatalog};
use crate::config::SiteConfig;

/// Fixture file when given, otherwise the configured HTTP backend.
pub fn open_repository(fixture: Option<&Path>, site: &SiteConfig) -> Result<CatalogRepository> {
    match fixture {
        Some(path) => {
            let catalog = FixtureCatalog::from_json_file(path)
                .with_context(|| format!("loading fixture {}", path.display()))?;
            info!(target = "cli", fixture = %path.display(), nodes = catalog.len(), "using fixture catalog");
            Ok(CatalogRepository::from_source(catalog))
        }
        None => site.http_repository(),
    }
}
