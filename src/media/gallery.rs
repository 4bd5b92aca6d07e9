use futures::future::join_all;
use tracing::{debug, info};

use crate::catalog::model::ContentNode;
use crate::catalog::repository::CatalogRepository;

pub const DEFAULT_LOOKUP_BUDGET: usize = 60;

/// Pick up to `target` nodes that have images.
///
/// Candidates that already carry images are used first, in their original order.
/// If those fall short, up to `budget` of the image-less candidates are looked up
/// concurrently by slug (or id) and the ones whose detail has images fill the
/// remaining slots, again in original order. A failed lookup only drops that
/// candidate.
pub async fn hydrate_gallery(
    repo: &CatalogRepository,
    candidates: &[ContentNode],
    target: usize,
    budget: usize,
) -> Vec<ContentNode> {
    let mut ready: Vec<ContentNode> = Vec::new();
    let mut pending: Vec<(usize, &ContentNode)> = Vec::new();
    for (idx, node) in candidates.iter().enumerate() {
        if node.has_images() {
            ready.push(node.clone());
        } else if !node.slug.is_empty() || !node.id.is_empty() {
            pending.push((idx, node));
        }
    }
    pending.truncate(budget);

    if ready.len() >= target || pending.is_empty() {
        ready.truncate(target);
        return ready;
    }

    let lookups = pending.iter().map(|&(idx, node)| async move {
        let key = if node.slug.is_empty() { &node.id } else { &node.slug };
        match repo.fetch_node(key).await {
            Ok(detail) if detail.has_images() => Some((idx, detail)),
            Ok(_) => None,
            Err(err) => {
                debug!(target = "gallery", key = %key, error = %err, "detail lookup failed");
                None
            }
        }
    });
    let mut hydrated: Vec<(usize, ContentNode)> =
        join_all(lookups).await.into_iter().flatten().collect();
    hydrated.sort_by_key(|(idx, _)| *idx);

    let missing = target - ready.len();
    info!(
        target = "gallery",
        ready = ready.len(),
        looked_up = pending.len(),
        hydrated = hydrated.len(),
        "gallery hydrated"
    );
    ready.extend(hydrated.into_iter().take(missing).map(|(_, node)| node));
    ready
}
