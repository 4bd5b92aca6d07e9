use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::SiteConfig;
use crate::sitemap::{render_sitemap, SitemapCrawler};

#[derive(Debug, Clone, Default)]
pub struct SitemapConfig {
    pub fixture: Option<PathBuf>,
    /// Write here instead of stdout.
    pub output: Option<PathBuf>,
    /// Overrides SITE_URL.
    pub site_url: Option<String>,
}

pub async fn run(cfg: SitemapConfig) -> Result<()> {
    let mut site = SiteConfig::from_env();
    if let Some(url) = cfg.site_url {
        site.site_url = url;
    }
    let repo = super::open_repository(cfg.fixture.as_deref(), &site)?;
    let routes = site.route_table();

    let entries = SitemapCrawler::new(&repo, &site.locales, &routes, site.crawl_settings())
        .crawl()
        .await;
    let xml = render_sitemap(&entries).context("rendering sitemap")?;

    match cfg.output {
        Some(path) => {
            std::fs::write(&path, xml).with_context(|| format!("writing {}", path.display()))?;
            info!(target = "cli", urls = entries.len(), path = %path.display(), "sitemap written");
        }
        None => println!("{xml}"),
    }
    Ok(())
}
