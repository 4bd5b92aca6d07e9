use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use super::routes::{RouteKey, RouteTable};
use crate::catalog::model::{ListQuery, NodeType, SortKey};
use crate::catalog::repository::CatalogRepository;
use crate::normalization::Locales;

pub const DEFAULT_PAGE_SIZE: u32 = 200;
pub const DEFAULT_MAX_PAGES: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Absolute origin prepended to every pathname, e.g. `https://example.com`.
    pub site_url: String,
    pub page_size: u32,
    pub max_pages: u32,
}

impl CrawlSettings {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Walks static routes and every published item, one URL per locale.
pub struct SitemapCrawler<'a> {
    repo: &'a CatalogRepository,
    locales: &'a Locales,
    routes: &'a RouteTable,
    settings: CrawlSettings,
}

impl<'a> SitemapCrawler<'a> {
    pub fn new(
        repo: &'a CatalogRepository,
        locales: &'a Locales,
        routes: &'a RouteTable,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            repo,
            locales,
            routes,
            settings,
        }
    }

    pub async fn crawl(&self) -> Vec<SitemapEntry> {
        self.crawl_at(Utc::now()).await
    }

    /// Crawl using `now` as `lastmod` for routes and items without an update time.
    pub async fn crawl_at(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let origin = self.settings.site_url.trim_end_matches('/');
        let mut seen: IndexMap<String, DateTime<Utc>> = IndexMap::new();

        for route in RouteKey::STATIC {
            for locale in self.locales.all() {
                let loc = format!("{origin}{}", self.routes.href(route, locale, &[]));
                seen.entry(loc).or_insert(now);
            }
        }

        let page_size = self.settings.page_size.max(1);
        let mut page = 1u32;
        let mut scanned = 0usize;
        loop {
            if page > self.settings.max_pages {
                warn!(
                    target = "sitemap",
                    max_pages = self.settings.max_pages,
                    scanned,
                    "page cap reached; sitemap may be incomplete"
                );
                break;
            }
            let query = ListQuery {
                page,
                limit: page_size,
                sort: SortKey::Order,
                node_type: Some(NodeType::Item),
                ..ListQuery::default()
            };
            let listing = self.repo.list_nodes(&query).await;
            let fetched = listing.items.len();
            scanned += fetched;

            for item in listing
                .items
                .iter()
                .filter(|n| n.node_type == NodeType::Item && !n.path.is_empty())
            {
                let lastmod = item.updated_at.unwrap_or(now);
                for locale in self.locales.all() {
                    let loc = format!("{origin}{}", self.routes.node_href(locale, &item.path));
                    seen.entry(loc).or_insert(lastmod);
                }
            }

            if fetched < page_size as usize {
                break;
            }
            page += 1;
        }

        info!(target = "sitemap", urls = seen.len(), items = scanned, "sitemap crawl finished");
        seen.into_iter()
            .map(|(loc, lastmod)| SitemapEntry { loc, lastmod })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::error::{CatalogError, CatalogResult};
    use crate::catalog::fixture::sample;
    use crate::catalog::model::{
        CatalogListing, ContentNode, NodeWithChildren, SearchFilter,
    };
    use crate::catalog::repository::testing::CountingSource;
    use crate::catalog::source::CatalogSource;
    use crate::catalog::FixtureCatalog;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn settings(page_size: u32, max_pages: u32) -> CrawlSettings {
        CrawlSettings {
            site_url: "https://shop.test/".into(),
            page_size,
            max_pages,
        }
    }

    #[tokio::test]
    async fn emits_each_static_and_item_url_once_per_locale() {
        let mut nodes = sample::nodes();
        // Same path under a different id must not produce a second URL.
        let dup = nodes.iter().find(|n| n.slug == "p-100").cloned().unwrap();
        nodes.push(ContentNode { id: "i-p100-dup".into(), ..dup });
        let counting = Arc::new(CountingSource::new(FixtureCatalog::new(nodes)));
        let repo = CatalogRepository::new(counting.clone());
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);

        let entries = SitemapCrawler::new(&repo, &locales, &routes, settings(2, 50))
            .crawl()
            .await;

        // 4 static routes + 5 distinct items, times 2 locales.
        assert_eq!(entries.len(), 18);
        let unique: HashSet<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(unique.len(), entries.len());
        assert_eq!(entries[0].loc, "https://shop.test/en");
        assert!(unique.contains("https://shop.test/ar/products/water/pumps/p-100"));
        // 6 items in pages of 2: three full pages, then an empty one.
        assert_eq!(counting.list_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn lastmod_prefers_update_time() {
        let updated = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut nodes = sample::nodes();
        for n in nodes.iter_mut().filter(|n| n.slug == "v-1") {
            n.updated_at = Some(updated);
        }
        let repo = CatalogRepository::from_source(FixtureCatalog::new(nodes));
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);

        let entries = SitemapCrawler::new(&repo, &locales, &routes, settings(200, 200))
            .crawl_at(now)
            .await;
        for e in &entries {
            let expected = if e.loc.ends_with("/v-1") { updated } else { now };
            assert_eq!(e.lastmod, expected, "{}", e.loc);
        }
    }

    /// Always returns a full page of fresh items.
    struct EndlessSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for EndlessSource {
        async fn root_categories(&self) -> CatalogResult<CatalogListing> {
            Ok(CatalogListing::empty(1, 0))
        }
        async fn node_with_children(&self, path: &str, _: SortKey) -> CatalogResult<NodeWithChildren> {
            Err(CatalogError::not_found(path))
        }
        async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
            Err(CatalogError::not_found(slug_or_id))
        }
        async fn search(&self, _: &str, page: u32, limit: u32, _: &SearchFilter) -> CatalogResult<CatalogListing> {
            Ok(CatalogListing::empty(page, limit))
        }
        async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let items = (0..query.limit)
                .map(|i| {
                    let slug = format!("x-{}-{i}", query.page);
                    ContentNode::new(slug.clone(), NodeType::Item, slug, None)
                })
                .collect();
            Ok(CatalogListing {
                items,
                page: query.page,
                limit: query.limit,
                total: u64::MAX,
            })
        }
    }

    #[tokio::test]
    async fn runaway_pagination_stops_at_cap() {
        let source = Arc::new(EndlessSource {
            calls: AtomicUsize::new(0),
        });
        let repo = CatalogRepository::new(source.clone());
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);

        let entries = SitemapCrawler::new(&repo, &locales, &routes, settings(3, 4))
            .crawl()
            .await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(entries.len(), 8 + 4 * 3 * 2);
    }

    /// Backend that ignores the type filter and lists every node.
    struct UntypedListing(FixtureCatalog);

    #[async_trait]
    impl CatalogSource for UntypedListing {
        async fn root_categories(&self) -> CatalogResult<CatalogListing> {
            self.0.root_categories().await
        }
        async fn node_with_children(&self, path: &str, sort: SortKey) -> CatalogResult<NodeWithChildren> {
            self.0.node_with_children(path, sort).await
        }
        async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
            self.0.node(slug_or_id).await
        }
        async fn search(&self, q: &str, page: u32, limit: u32, filter: &SearchFilter) -> CatalogResult<CatalogListing> {
            self.0.search(q, page, limit, filter).await
        }
        async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing> {
            let query = ListQuery {
                node_type: None,
                ..query.clone()
            };
            self.0.list(&query).await
        }
    }

    #[tokio::test]
    async fn categories_and_groups_in_listing_are_skipped() {
        let repo = CatalogRepository::from_source(UntypedListing(sample::catalog()));
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);

        let entries = SitemapCrawler::new(&repo, &locales, &routes, settings(4, 50))
            .crawl()
            .await;

        assert_eq!(entries.len(), 18);
        let locs: HashSet<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert!(!locs.contains("https://shop.test/en/products/water"));
        assert!(!locs.contains("https://shop.test/en/products/water/pumps"));
        assert!(locs.contains("https://shop.test/en/products/water/pumps/p-100"));
    }
}
