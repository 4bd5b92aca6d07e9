use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::catalog::model::{ContentNode, NodeType};
use crate::config::SiteConfig;
use crate::navigation::mega_menu::{MegaMenu, MenuEvent};
use crate::normalization::{Field, LocaleKey, Locales};

#[derive(Debug, Clone, Default)]
pub struct MenuConfig {
    pub fixture: Option<PathBuf>,
    pub locale: Option<String>,
    /// Overrides MENU_CLOSE_DELAY_MS.
    pub close_delay: Option<Duration>,
}

/// Hover every category and group in turn and print what the menu discloses.
pub async fn run(cfg: MenuConfig) -> Result<()> {
    let site = SiteConfig::from_env();
    let repo = super::open_repository(cfg.fixture.as_deref(), &site)?;
    let locale = site.locales.key_for(cfg.locale.as_deref().unwrap_or_default());
    let locales = &site.locales;

    let delay = cfg.close_delay.unwrap_or(site.menu_close_delay);
    let mut menu = MegaMenu::new(delay);
    menu.load_categories(&repo).await;
    let now = Instant::now();
    menu.dispatch(&repo, MenuEvent::TriggerEnter, now).await;

    let categories: Vec<ContentNode> = menu.view().categories.to_vec();
    if categories.is_empty() {
        println!("(no categories)");
    }
    for category in &categories {
        menu.dispatch(&repo, MenuEvent::CategoryHover(category.path.clone()), now)
            .await;
        let view = menu.view();
        println!(
            "{} [{} column(s), {}]",
            label(category, locales, locale),
            view.width.columns(),
            view.width.css_class()
        );
        let second: Vec<ContentNode> = view.groups.map(<[ContentNode]>::to_vec).unwrap_or_default();

        for entry in &second {
            println!("  {}", label(entry, locales, locale));
            if entry.node_type != NodeType::Group {
                continue;
            }
            menu.dispatch(&repo, MenuEvent::GroupHover(entry.path.clone()), now)
                .await;
            if let Some(items) = menu.view().items {
                for item in items {
                    println!("    {}", label(item, locales, locale));
                }
            }
        }
    }

    menu.handle(MenuEvent::PointerLeave, now);
    let closed = menu.tick(now + delay);
    info!(target = "cli", closed, categories = categories.len(), "menu walk finished");
    Ok(())
}

fn label(node: &ContentNode, locales: &Locales, locale: LocaleKey) -> String {
    format!(
        "{} ({})",
        locales.resolve(node, locale, Field::Title),
        node.path
    )
}
