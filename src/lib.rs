//! Hierarchical catalog navigation: localized node pages, breadcrumbs, related
//! content, a hover-driven mega-menu, gallery hydration and sitemap generation,
//! over a read-only catalog backend.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod media;
pub mod navigation;
pub mod normalization;
pub mod sitemap;

pub mod util {
    pub mod env;
}

pub use catalog::{CatalogError, CatalogRepository, CatalogResult};
pub use config::SiteConfig;
