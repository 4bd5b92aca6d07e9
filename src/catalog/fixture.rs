//! In-memory catalog tree.
//!
//! Serves the same contract as the HTTP backend from a fixed set of nodes. The CLI
//! uses it for offline runs (`--fixture catalog.json`) and the tests use it as the
//! backend stand-in.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use super::envelope::listing_from_value;
use super::error::{CatalogError, CatalogResult};
use super::model::{
    Breadcrumb, CatalogListing, ContentNode, ListQuery, NodeType, NodeWithChildren, SearchFilter,
    SortKey,
};
use super::source::CatalogSource;

#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    nodes: Vec<ContentNode>,
    by_id: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
}

impl FixtureCatalog {
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        let nodes: Vec<ContentNode> = nodes.into_iter().filter(|n| n.is_published).collect();
        let by_id = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id.clone(), idx))
            .collect();
        let by_path = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.path.clone(), idx))
            .collect();
        Self {
            nodes,
            by_id,
            by_path,
        }
    }

    /// Load from a JSON file holding any listing shape the backend may serve.
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Fixture(format!("{}: {e}", path.display())))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let listing = listing_from_value(&value, 1, 0)?;
        Ok(Self::new(listing.items))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn children_of(&self, id: &str) -> Vec<ContentNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(id))
            .cloned()
            .collect()
    }

    fn chain_to(&self, node: &ContentNode) -> Vec<Breadcrumb> {
        let mut chain = vec![node.breadcrumb()];
        let mut cursor = node.parent_id.as_deref();
        // Bounded by node count so a parent cycle in bad data cannot spin forever.
        for _ in 0..self.nodes.len() {
            let Some(parent) = cursor
                .and_then(|id| self.by_id.get(id))
                .map(|&idx| &self.nodes[idx])
            else {
                break;
            };
            chain.push(parent.breadcrumb());
            cursor = parent.parent_id.as_deref();
        }
        chain.reverse();
        chain
    }

    fn paginate(mut matched: Vec<ContentNode>, page: u32, limit: u32) -> CatalogListing {
        let total = matched.len() as u64;
        let page = page.max(1);
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let items = if limit == 0 || start >= matched.len() {
            Vec::new()
        } else {
            let end = (start + limit as usize).min(matched.len());
            matched.drain(start..end).collect()
        };
        CatalogListing {
            items,
            page,
            limit,
            total,
        }
    }
}

fn matches_text(node: &ContentNode, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hay = [&node.title, &node.slug, &node.tagline, &node.description];
    hay.iter().any(|h| h.to_lowercase().contains(&needle))
        || node
            .title_i18n
            .values()
            .any(|t| t.to_lowercase().contains(&needle))
}

#[async_trait]
impl CatalogSource for FixtureCatalog {
    async fn root_categories(&self) -> CatalogResult<CatalogListing> {
        let mut roots: Vec<ContentNode> = self
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Category)
            .cloned()
            .collect();
        SortKey::Order.sort(&mut roots);
        let limit = roots.len() as u32;
        Ok(Self::paginate(roots, 1, limit))
    }

    async fn node_with_children(
        &self,
        path: &str,
        sort: SortKey,
    ) -> CatalogResult<NodeWithChildren> {
        let key = path.trim_matches('/');
        let node = self
            .by_path
            .get(key)
            .map(|&idx| self.nodes[idx].clone())
            .ok_or_else(|| CatalogError::not_found(format!("path {key}")))?;
        let mut children = self.children_of(&node.id);
        sort.sort(&mut children);
        let breadcrumbs = self.chain_to(&node);
        Ok(NodeWithChildren {
            node,
            children,
            breadcrumbs,
        })
    }

    async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
        let key = slug_or_id.trim();
        self.by_id
            .get(key)
            .map(|&idx| &self.nodes[idx])
            .or_else(|| self.nodes.iter().find(|n| n.slug == key))
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("node {key}")))
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        filter: &SearchFilter,
    ) -> CatalogResult<CatalogListing> {
        let mut matched: Vec<ContentNode> = self
            .nodes
            .iter()
            .filter(|n| filter.node_type.map_or(true, |t| n.node_type == t))
            .filter(|n| matches_text(n, query))
            .cloned()
            .collect();
        filter.sort.unwrap_or_default().sort(&mut matched);
        Ok(Self::paginate(matched, page, limit))
    }

    async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing> {
        let mut matched: Vec<ContentNode> = self
            .nodes
            .iter()
            .filter(|n| query.node_type.map_or(true, |t| n.node_type == t))
            .filter(|n| {
                query
                    .parent
                    .as_deref()
                    .map_or(true, |p| n.parent_id.as_deref() == Some(p))
            })
            .filter(|n| query.q.as_deref().map_or(true, |q| matches_text(n, q)))
            .cloned()
            .collect();
        query.sort.sort(&mut matched);
        Ok(Self::paginate(matched, query.page, query.limit))
    }
}

/// Small three-level tree shared by unit tests across the crate.
#[cfg(test)]
pub(crate) mod sample {
    use super::*;
    use crate::catalog::model::ImageRef;

    pub fn with_images(mut node: ContentNode, url: &str) -> ContentNode {
        node.images = vec![ImageRef {
            url: url.to_string(),
            alt: None,
        }];
        node
    }

    /// water (category)
    ///   pumps (group): p-100, p-200
    ///   valves (group): v-1
    /// lighting (category, flat): lamp-a, lamp-b
    pub fn nodes() -> Vec<ContentNode> {
        let water = ContentNode::new("c-water", NodeType::Category, "water", None)
            .with_title("Water")
            .with_order(1);
        let lighting = ContentNode::new("c-light", NodeType::Category, "lighting", None)
            .with_title("Lighting")
            .with_order(2);
        let pumps = ContentNode::new("g-pumps", NodeType::Group, "pumps", Some(&water))
            .with_title("Pumps")
            .with_order(1);
        let valves = ContentNode::new("g-valves", NodeType::Group, "valves", Some(&water))
            .with_title("Valves")
            .with_order(2);
        let p100 = ContentNode::new("i-p100", NodeType::Item, "p-100", Some(&pumps))
            .with_title("P-100")
            .with_order(1);
        let p200 = ContentNode::new("i-p200", NodeType::Item, "p-200", Some(&pumps))
            .with_title("P-200")
            .with_order(2);
        let v1 = ContentNode::new("i-v1", NodeType::Item, "v-1", Some(&valves)).with_title("V-1");
        let lamp_a = ContentNode::new("i-lamp-a", NodeType::Item, "lamp-a", Some(&lighting))
            .with_title("Lamp A")
            .with_order(1);
        let lamp_b = ContentNode::new("i-lamp-b", NodeType::Item, "lamp-b", Some(&lighting))
            .with_title("Lamp B")
            .with_order(2);
        vec![
            lighting, water, pumps, valves, p100, p200, v1, lamp_a, lamp_b,
        ]
    }

    pub fn catalog() -> FixtureCatalog {
        FixtureCatalog::new(nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::sample;
    use super::*;

    #[tokio::test]
    async fn root_categories_are_ordered() {
        let listing = sample::catalog().root_categories().await.unwrap();
        let slugs: Vec<&str> = listing.items.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, ["water", "lighting"]);
    }

    #[tokio::test]
    async fn node_with_children_builds_chain_including_self() {
        let resolved = sample::catalog()
            .node_with_children("water/pumps/p-100", SortKey::Order)
            .await
            .unwrap();
        let slugs: Vec<&str> = resolved.breadcrumbs.iter().map(|b| b.slug.as_str()).collect();
        assert_eq!(slugs, ["water", "pumps", "p-100"]);
        assert!(resolved.children.is_empty());
    }

    #[tokio::test]
    async fn children_follow_requested_sort() {
        let resolved = sample::catalog()
            .node_with_children("water/pumps", SortKey::OrderDesc)
            .await
            .unwrap();
        let slugs: Vec<&str> = resolved.children.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, ["p-200", "p-100"]);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let err = sample::catalog()
            .node_with_children("water/nope", SortKey::Order)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_paginates_with_full_total() {
        let query = ListQuery {
            page: 2,
            limit: 2,
            node_type: Some(NodeType::Item),
            ..ListQuery::default()
        };
        let listing = sample::catalog().list(&query).await.unwrap();
        assert_eq!(listing.total, 5);
        assert_eq!(listing.items.len(), 2);
        assert!(listing.items.len() as u32 <= listing.limit);
    }

    #[tokio::test]
    async fn search_matches_title_case_insensitively() {
        let filter = SearchFilter {
            node_type: Some(NodeType::Item),
            sort: None,
        };
        let listing = sample::catalog().search("LAMP", 1, 10, &filter).await.unwrap();
        assert_eq!(listing.total, 2);
    }

    #[tokio::test]
    async fn node_lookup_by_id_or_slug() {
        let catalog = sample::catalog();
        assert_eq!(catalog.node("i-v1").await.unwrap().slug, "v-1");
        assert_eq!(catalog.node("lamp-b").await.unwrap().id, "i-lamp-b");
        assert!(catalog.node("missing").await.unwrap_err().is_not_found());
    }
}
