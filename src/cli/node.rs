use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use std::path::PathBuf;

use crate::catalog::model::SortKey;
use crate::config::SiteConfig;
use crate::navigation::page::{load_node_page, NodePage};

#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub fixture: Option<PathBuf>,
    pub locale: Option<String>,
    pub path: String,
    pub sort: Option<String>,
    /// Print the page model as JSON instead of a text outline.
    pub json: bool,
}

pub async fn run(cfg: NodeConfig) -> Result<()> {
    let site = SiteConfig::from_env();
    let repo = super::open_repository(cfg.fixture.as_deref(), &site)?;
    let routes = site.route_table();
    let locale = site.locales.key_for(cfg.locale.as_deref().unwrap_or_default());
    let sort = match cfg.sort.as_deref() {
        Some(raw) => raw.parse::<SortKey>().map_err(|e| anyhow!(e))?,
        None => SortKey::Order,
    };

    let page = load_node_page(&repo, &cfg.path, sort, &site.locales, locale, &routes)
        .await
        .with_context(|| format!("loading node {}", cfg.path))?;

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", outline(&page));
    }
    Ok(())
}

fn outline(page: &NodePage) -> String {
    let mut out = String::new();
    if !page.breadcrumbs.is_empty() {
        let trail = page.breadcrumbs.iter().map(|c| &c.title).join(" / ");
        out.push_str(&format!("{trail} /\n"));
    }
    out.push_str(&format!("{} [{}]\n", page.title, page.node_type));
    if !page.tagline.is_empty() {
        out.push_str(&format!("  {}\n", page.tagline));
    }
    for card in &page.listing {
        out.push_str(&format!("  - {:<32} {}\n", card.title, card.href));
    }
    if !page.related.is_empty() {
        out.push_str("related:\n");
        for card in &page.related {
            out.push_str(&format!("  * {:<32} {}\n", card.title, card.href));
        }
    }
    out
}
