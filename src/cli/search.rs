use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};

use crate::catalog::model::{NodeType, SearchFilter, SortKey};
use crate::catalog::CatalogRepository;
use crate::config::SiteConfig;
use crate::navigation::debounce::SearchDebouncer;
use crate::normalization::{Field, LocaleKey, Locales};

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub fixture: Option<PathBuf>,
    pub locale: Option<String>,
    /// One-shot query; when absent, queries are read from stdin as they are typed.
    pub query: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub node_type: Option<String>,
    pub sort: Option<String>,
    /// Overrides SEARCH_DEBOUNCE_MS for stdin mode.
    pub debounce: Option<Duration>,
}

pub async fn run(cfg: SearchConfig) -> Result<()> {
    let site = SiteConfig::from_env();
    let repo = super::open_repository(cfg.fixture.as_deref(), &site)?;
    let locale = site.locales.key_for(cfg.locale.as_deref().unwrap_or_default());
    let filter = SearchFilter {
        node_type: cfg
            .node_type
            .as_deref()
            .map(str::parse::<NodeType>)
            .transpose()
            .map_err(|e| anyhow!(e))?,
        sort: cfg
            .sort
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()
            .map_err(|e| anyhow!(e))?,
    };
    let page = cfg.page.max(1);
    let limit = cfg.limit.max(1);

    if let Some(query) = cfg.query.as_deref() {
        print_results(&repo, query, page, limit, &filter, &site.locales, locale).await;
        return Ok(());
    }

    // Each stdin line replaces the pending query; only settled input is searched.
    let mut debouncer = SearchDebouncer::new(cfg.debounce.unwrap_or(site.search_debounce));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => debouncer.input(&text, Instant::now()),
                None => {
                    if let Some(query) = debouncer.flush() {
                        print_results(&repo, &query, page, limit, &filter, &site.locales, locale).await;
                    }
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(query) = debouncer.poll(Instant::now()) {
                    print_results(&repo, &query, page, limit, &filter, &site.locales, locale).await;
                }
            }
        }
    }
    Ok(())
}

async fn print_results(
    repo: &CatalogRepository,
    query: &str,
    page: u32,
    limit: u32,
    filter: &SearchFilter,
    locales: &Locales,
    locale: LocaleKey,
) {
    let listing = repo.search_nodes(query, page, limit, filter).await;
    println!(
        "\"{}\": {} match(es), page {} (limit {})",
        query, listing.total, listing.page, listing.limit
    );
    for node in &listing.items {
        println!(
            "  [{:<8}] {:<32} {}",
            node.node_type.as_str(),
            locales.resolve(node, locale, Field::Title),
            node.path
        );
    }
}
