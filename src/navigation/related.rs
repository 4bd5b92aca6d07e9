use tracing::debug;

use crate::catalog::model::{Breadcrumb, ContentNode, NodeType, SortKey};
use crate::catalog::repository::CatalogRepository;

/// Parent path recomputed from the raw ancestor chain.
///
/// All breadcrumb slugs, minus the last one when it is the node itself.
pub fn parent_path(node: &ContentNode, chain: &[Breadcrumb]) -> String {
    let mut slugs: Vec<&str> = chain.iter().map(|b| b.slug.as_str()).collect();
    if slugs.last().is_some_and(|s| *s == node.slug) {
        slugs.pop();
    }
    slugs.join("/")
}

/// Siblings of `node` with the same type, excluding the node itself.
///
/// Related content is supplementary: every failure yields an empty set.
pub async fn related_nodes(
    repo: &CatalogRepository,
    node: &ContentNode,
    chain: &[Breadcrumb],
) -> Vec<ContentNode> {
    let parent = parent_path(node, chain);

    let siblings = if node.node_type == NodeType::Category && parent.is_empty() {
        repo.fetch_root_categories().await.items
    } else if parent.is_empty() {
        // A non-root node without ancestors has nowhere to look.
        return Vec::new();
    } else {
        match repo.fetch_node_with_children(&parent, SortKey::Order).await {
            Ok(resolved) => resolved.children,
            Err(err) => {
                debug!(target = "catalog", error = %err, parent = %parent, "related lookup failed");
                return Vec::new();
            }
        }
    };

    siblings
        .into_iter()
        .filter(|s| s.node_type == node.node_type && s.id != node.id)
        .collect()
}
