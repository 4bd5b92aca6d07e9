//! Site configuration read from the environment (and `.env`).

use anyhow::{Context, Result};
use std::time::Duration;

use crate::catalog::{CatalogRepository, HttpCatalogSource};
use crate::media::DEFAULT_LOOKUP_BUDGET;
use crate::navigation::mega_menu::DEFAULT_CLOSE_DELAY;
use crate::normalization::Locales;
use crate::sitemap::crawler::{CrawlSettings, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::sitemap::RouteTable;
use crate::util::env::{env_list, env_opt, env_parse};

pub const DEFAULT_CATALOG_API_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Keys worth showing in the startup snapshot.
pub const LOGGED_KEYS: &[&str] = &[
    "CATALOG_API_URL",
    "CATALOG_TIMEOUT_SECS",
    "CATALOG_API_TOKEN",
    "SITE_URL",
    "SITE_LOCALES",
];

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub catalog_api_url: String,
    pub catalog_timeout_secs: u64,
    pub catalog_api_token: Option<String>,
    pub site_url: String,
    pub locales: Locales,
    pub gallery_lookup_budget: usize,
    pub sitemap_page_size: u32,
    pub sitemap_max_pages: u32,
    pub menu_close_delay: Duration,
    pub search_debounce: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            catalog_api_url: DEFAULT_CATALOG_API_URL.to_string(),
            catalog_timeout_secs: 15,
            catalog_api_token: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            locales: Locales::default(),
            gallery_lookup_budget: DEFAULT_LOOKUP_BUDGET,
            sitemap_page_size: DEFAULT_PAGE_SIZE,
            sitemap_max_pages: DEFAULT_MAX_PAGES,
            menu_close_delay: DEFAULT_CLOSE_DELAY,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_api_url: env_opt("CATALOG_API_URL").unwrap_or(defaults.catalog_api_url),
            catalog_timeout_secs: env_parse("CATALOG_TIMEOUT_SECS", defaults.catalog_timeout_secs),
            catalog_api_token: env_opt("CATALOG_API_TOKEN"),
            site_url: env_opt("SITE_URL").unwrap_or(defaults.site_url),
            locales: Locales::from_codes(&env_list("SITE_LOCALES", "en,ar")),
            gallery_lookup_budget: env_parse("GALLERY_LOOKUP_BUDGET", defaults.gallery_lookup_budget),
            sitemap_page_size: env_parse("SITEMAP_PAGE_SIZE", defaults.sitemap_page_size),
            sitemap_max_pages: env_parse("SITEMAP_MAX_PAGES", defaults.sitemap_max_pages),
            menu_close_delay: Duration::from_millis(env_parse("MENU_CLOSE_DELAY_MS", 150u64)),
            search_debounce: Duration::from_millis(env_parse("SEARCH_DEBOUNCE_MS", 400u64)),
        }
    }

    /// Repository backed by the configured HTTP backend.
    pub fn http_repository(&self) -> Result<CatalogRepository> {
        let source = HttpCatalogSource::new(&self.catalog_api_url, Some(self.catalog_timeout_secs))
            .with_context(|| format!("building catalog client for {}", self.catalog_api_url))?
            .with_bearer(self.catalog_api_token.clone());
        Ok(CatalogRepository::from_source(source))
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::localized(&self.locales)
    }

    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            site_url: self.site_url.clone(),
            page_size: self.sitemap_page_size,
            max_pages: self.sitemap_max_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::LocaleKey;

    #[test]
    fn defaults_cover_every_knob() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.catalog_api_url, "http://localhost:4000/api");
        assert_eq!(cfg.locales.code(LocaleKey::Secondary), "ar");
        assert_eq!(cfg.gallery_lookup_budget, 60);
        assert_eq!(cfg.sitemap_page_size, 200);
        assert_eq!(cfg.menu_close_delay, Duration::from_millis(150));
        assert_eq!(cfg.crawl_settings().max_pages, 200);
    }

    #[test]
    fn route_table_follows_locales() {
        let cfg = SiteConfig {
            locales: Locales::new("fr", "de"),
            ..SiteConfig::default()
        };
        assert_eq!(
            cfg.route_table().node_href(LocaleKey::Secondary, "a"),
            "/de/products/a"
        );
    }

    #[test]
    fn http_repository_builds_without_network() {
        assert!(SiteConfig::default().http_repository().is_ok());
    }
}
