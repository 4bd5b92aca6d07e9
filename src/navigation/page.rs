//! Everything a node page renders, resolved for one locale.

use serde::Serialize;

use super::breadcrumbs::{build_trail, select_listing};
use super::related::related_nodes;
use crate::catalog::error::CatalogResult;
use crate::catalog::model::{ContentNode, ImageRef, NodeType, SortKey};
use crate::catalog::repository::CatalogRepository;
use crate::normalization::{Field, LocaleKey, Locales};
use crate::sitemap::routes::RouteTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrumbLink {
    pub title: String,
    pub href: String,
}

/// Listing/related entry, already localized and linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCard {
    pub id: String,
    pub node_type: NodeType,
    pub title: String,
    pub tagline: String,
    pub href: String,
    pub thumbnail: Option<String>,
}

impl NodeCard {
    pub fn from_node(
        node: &ContentNode,
        locales: &Locales,
        locale: LocaleKey,
        routes: &RouteTable,
    ) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type,
            title: locales.resolve(node, locale, Field::Title),
            tagline: locales.resolve(node, locale, Field::Tagline),
            href: routes.node_href(locale, &node.path),
            thumbnail: node
                .thumbnail
                .clone()
                .or_else(|| node.images.first().map(|img| img.url.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePage {
    pub locale: String,
    pub path: String,
    pub node_type: NodeType,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub breadcrumbs: Vec<CrumbLink>,
    pub images: Vec<ImageRef>,
    pub specs: serde_json::Map<String, serde_json::Value>,
    pub listing: Vec<NodeCard>,
    pub related: Vec<NodeCard>,
}

/// Resolve the node at `path` and assemble its page.
///
/// A missing node propagates as `NotFound`; the related section degrades to empty.
pub async fn load_node_page(
    repo: &CatalogRepository,
    path: &str,
    sort: SortKey,
    locales: &Locales,
    locale: LocaleKey,
    routes: &RouteTable,
) -> CatalogResult<NodePage> {
    let resolved = repo.fetch_node_with_children(path, sort).await?;
    let node = &resolved.node;

    let trail = build_trail(&resolved.breadcrumbs, node, locales, locale);
    let breadcrumbs = trail
        .crumbs
        .iter()
        .map(|c| CrumbLink {
            title: c.title.clone(),
            href: routes.node_href(locale, &c.path),
        })
        .collect();

    let card = |n: &ContentNode| NodeCard::from_node(n, locales, locale, routes);
    let listing = select_listing(node, &resolved.children)
        .iter()
        .map(card)
        .collect();
    let related = related_nodes(repo, node, &resolved.breadcrumbs)
        .await
        .iter()
        .map(card)
        .collect();

    Ok(NodePage {
        locale: locales.code(locale).to_string(),
        path: node.path.clone(),
        node_type: node.node_type,
        title: trail.title,
        tagline: locales.resolve(node, locale, Field::Tagline),
        description: locales.resolve(node, locale, Field::Description),
        breadcrumbs,
        images: node.images.clone(),
        specs: node
            .specs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        listing,
        related,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture::sample;
    use crate::catalog::FixtureCatalog;

    fn setup() -> (CatalogRepository, Locales, RouteTable) {
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);
        (
            CatalogRepository::from_source(sample::catalog()),
            locales,
            routes,
        )
    }

    #[tokio::test]
    async fn group_page_lists_items_and_links_ancestors() {
        let (repo, locales, routes) = setup();
        let page = load_node_page(&repo, "water/pumps", SortKey::Order, &locales, LocaleKey::Primary, &routes)
            .await
            .unwrap();
        assert_eq!(page.title, "Pumps");
        assert_eq!(
            page.breadcrumbs,
            vec![CrumbLink {
                title: "Water".into(),
                href: "/en/products/water".into()
            }]
        );
        let hrefs: Vec<&str> = page.listing.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(
            hrefs,
            ["/en/products/water/pumps/p-100", "/en/products/water/pumps/p-200"]
        );
        let related: Vec<&str> = page.related.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(related, ["g-valves"]);
    }

    #[tokio::test]
    async fn secondary_locale_uses_variants_with_fallback() {
        let mut nodes = sample::nodes();
        for n in nodes.iter_mut().filter(|n| n.slug == "water") {
            n.title_i18n.insert("ar".into(), "مياه".into());
        }
        let repo = CatalogRepository::from_source(FixtureCatalog::new(nodes));
        let locales = Locales::default();
        let routes = RouteTable::localized(&locales);

        let page = load_node_page(&repo, "water", SortKey::Order, &locales, LocaleKey::Secondary, &routes)
            .await
            .unwrap();
        assert_eq!(page.locale, "ar");
        assert_eq!(page.title, "مياه");
        assert!(page.breadcrumbs.is_empty());
        // Groups have no Arabic title: base text is shown.
        assert_eq!(page.listing[0].title, "Pumps");
        assert_eq!(page.listing[0].href, "/ar/products/water/pumps");
    }

    #[tokio::test]
    async fn missing_node_is_not_found() {
        let (repo, locales, routes) = setup();
        let err = load_node_page(&repo, "water/nope", SortKey::Order, &locales, LocaleKey::Primary, &routes)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
