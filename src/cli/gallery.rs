use anyhow::Result;
use std::path::PathBuf;

use crate::catalog::model::{ListQuery, NodeType};
use crate::config::SiteConfig;
use crate::media::hydrate_gallery;
use crate::normalization::Field;

#[derive(Debug, Clone, Default)]
pub struct GalleryConfig {
    pub fixture: Option<PathBuf>,
    pub locale: Option<String>,
    pub count: usize,
    /// Overrides GALLERY_LOOKUP_BUDGET.
    pub budget: Option<usize>,
}

pub async fn run(cfg: GalleryConfig) -> Result<()> {
    let site = SiteConfig::from_env();
    let repo = super::open_repository(cfg.fixture.as_deref(), &site)?;
    let locale = site.locales.key_for(cfg.locale.as_deref().unwrap_or_default());
    let budget = cfg.budget.unwrap_or(site.gallery_lookup_budget);

    let candidates = repo
        .list_nodes(&ListQuery {
            limit: budget.max(cfg.count) as u32,
            node_type: Some(NodeType::Item),
            ..ListQuery::default()
        })
        .await;
    let picked = hydrate_gallery(&repo, &candidates.items, cfg.count, budget).await;

    println!(
        "{} of {} requested ({} candidates)",
        picked.len(),
        cfg.count,
        candidates.items.len()
    );
    for node in &picked {
        let image = node.images.first().map(|i| i.url.as_str()).unwrap_or("");
        println!(
            "  {:<32} {}",
            site.locales.resolve(node, locale, Field::Title),
            image
        );
    }
    Ok(())
}
