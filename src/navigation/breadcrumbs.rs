use serde::Serialize;

use crate::catalog::model::{Breadcrumb, ContentNode, NodeType};
use crate::normalization::locale::localized_variant;
use crate::normalization::{Field, LocaleKey, Locales, TitleKey};

/// One rendered ancestor link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub title: String,
    pub slug: String,
    /// Materialized path of this ancestor (slug join up to and including it).
    pub path: String,
}

/// Display title plus the ancestor links shown above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trail {
    pub title: String,
    pub crumbs: Vec<Crumb>,
}

/// Build the breadcrumb trail and display title for `node`.
///
/// `chain` is the backend's ancestor list, root first, normally ending with the node
/// itself. That trailing self-entry is dropped and consecutive entries whose titles
/// read the same (trimmed, case-folded) collapse into the first one.
pub fn build_trail(
    chain: &[Breadcrumb],
    node: &ContentNode,
    locales: &Locales,
    locale: LocaleKey,
) -> Trail {
    let mut path = String::new();
    let mut crumbs: Vec<Crumb> = chain
        .iter()
        .map(|b| {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&b.slug);
            Crumb {
                title: locales.resolve(b, locale, Field::Title),
                slug: b.slug.clone(),
                path: path.clone(),
            }
        })
        .collect();

    if crumbs.last().is_some_and(|c| c.slug == node.slug) {
        crumbs.pop();
    }
    crumbs.dedup_by(|later, kept| TitleKey::new(&later.title) == TitleKey::new(&kept.title));

    Trail {
        title: display_title(chain, node, locales, locale),
        crumbs,
    }
}

/// Localized node title, else the trailing self-crumb's localized title, else the base title.
pub fn display_title(
    chain: &[Breadcrumb],
    node: &ContentNode,
    locales: &Locales,
    locale: LocaleKey,
) -> String {
    let code = locales.code(locale);
    if let Some(title) = localized_variant(node, code, Field::Title) {
        return title.to_string();
    }
    chain
        .last()
        .filter(|b| b.slug == node.slug)
        .map(|b| locales.resolve(b, locale, Field::Title))
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| node.title.clone())
}

/// What to list under a node.
///
/// Groups list their items. Categories list their groups, or their items directly
/// when no groups exist. If a category has both, groups win.
pub fn select_listing(node: &ContentNode, children: &[ContentNode]) -> Vec<ContentNode> {
    let of_type = |t: NodeType| -> Vec<ContentNode> {
        children
            .iter()
            .filter(|c| c.node_type == t)
            .cloned()
            .collect()
    };
    match node.node_type {
        NodeType::Group => of_type(NodeType::Item),
        NodeType::Category => {
            let groups = of_type(NodeType::Group);
            if groups.is_empty() {
                of_type(NodeType::Item)
            } else {
                groups
            }
        }
        NodeType::Item => Vec::new(),
    }
}

/// Whether `node.path` is its ancestors' slugs followed by its own slug.
pub fn verify_path(node: &ContentNode, ancestor_slugs: &[&str]) -> bool {
    let mut expected: Vec<&str> = ancestor_slugs.to_vec();
    expected.push(&node.slug);
    node.path == expected.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture::sample;

    fn crumb(title: &str, slug: &str) -> Breadcrumb {
        Breadcrumb {
            title: title.into(),
            slug: slug.into(),
            title_i18n: Default::default(),
        }
    }

    fn find(slug: &str) -> ContentNode {
        sample::nodes()
            .into_iter()
            .find(|n| n.slug == slug)
            .unwrap()
    }

    #[test]
    fn drops_self_and_keeps_ancestor_paths() {
        let chain = [crumb("Water", "water"), crumb("Pumps", "pumps"), crumb("P-100", "p-100")];
        let trail = build_trail(&chain, &find("p-100"), &Locales::default(), LocaleKey::Primary);
        assert_eq!(trail.title, "P-100");
        assert_eq!(
            trail.crumbs,
            vec![
                Crumb { title: "Water".into(), slug: "water".into(), path: "water".into() },
                Crumb { title: "Pumps".into(), slug: "pumps".into(), path: "water/pumps".into() },
            ]
        );
    }

    #[test]
    fn collapses_consecutive_equal_titles() {
        let chain = [
            crumb("Lighting", "lighting"),
            crumb(" lighting ", "lighting-all"),
            crumb("Lamp A", "lamp-a"),
        ];
        let trail = build_trail(&chain, &find("lamp-a"), &Locales::default(), LocaleKey::Primary);
        assert_eq!(trail.crumbs.len(), 1);
        assert_eq!(trail.crumbs[0].slug, "lighting");
        for pair in trail.crumbs.windows(2) {
            assert_ne!(TitleKey::new(&pair[0].title), TitleKey::new(&pair[1].title));
        }
    }

    #[test]
    fn title_prefers_localized_variant_then_self_crumb() {
        let mut node = find("pumps");
        node.title = "pumps-base".into();
        let mut self_crumb = crumb("Pumps", "pumps");
        self_crumb.title_i18n.insert("ar".into(), "مضخات".into());
        let chain = [crumb("Water", "water"), self_crumb];

        let locales = Locales::default();
        assert_eq!(display_title(&chain, &node, &locales, LocaleKey::Secondary), "مضخات");
        assert_eq!(display_title(&chain, &node, &locales, LocaleKey::Primary), "Pumps");

        node.title_i18n.insert("ar".into(), "المضخات".into());
        assert_eq!(display_title(&chain, &node, &locales, LocaleKey::Secondary), "المضخات");

        assert_eq!(display_title(&[], &node, &locales, LocaleKey::Primary), "pumps-base");
    }

    #[test]
    fn flat_category_falls_back_to_items() {
        let nodes = sample::nodes();
        let lighting = find("lighting");
        let children: Vec<ContentNode> = nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(lighting.id.as_str()))
            .cloned()
            .collect();
        let listing = select_listing(&lighting, &children);
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|n| n.node_type == NodeType::Item));
    }

    #[test]
    fn groups_win_over_direct_items() {
        let water = find("water");
        let stray = ContentNode::new("i-stray", NodeType::Item, "stray", Some(&water));
        let children = vec![find("pumps"), stray, find("valves")];
        let listing = select_listing(&water, &children);
        let slugs: Vec<&str> = listing.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, ["pumps", "valves"]);
        assert!(select_listing(&find("p-100"), &children).is_empty());
    }

    #[test]
    fn every_sample_path_matches_its_ancestry() {
        let nodes = sample::nodes();
        for node in &nodes {
            let mut slugs = Vec::new();
            let mut cursor = node.parent_id.clone();
            while let Some(id) = cursor {
                let parent = nodes.iter().find(|n| n.id == id).unwrap();
                slugs.push(parent.slug.as_str());
                cursor = parent.parent_id.clone();
            }
            slugs.reverse();
            assert!(verify_path(node, &slugs), "bad path for {}", node.id);
        }
        assert!(!verify_path(&find("p-100"), &["water"]));
    }
}
