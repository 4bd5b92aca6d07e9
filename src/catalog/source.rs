use async_trait::async_trait;

use super::error::CatalogResult;
use super::model::{
    CatalogListing, ContentNode, ListQuery, NodeWithChildren, SearchFilter, SortKey,
};

/// Raw, fallible access to the catalog backend.
///
/// Implementations report every failure; deciding which failures degrade to empty
/// results is the job of [`CatalogRepository`](super::repository::CatalogRepository).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Root categories ordered by `order`.
    async fn root_categories(&self) -> CatalogResult<CatalogListing>;

    /// One node by materialized path, its direct children sorted by `sort`, and its
    /// ancestor chain (root first, the node itself last).
    async fn node_with_children(&self, path: &str, sort: SortKey)
        -> CatalogResult<NodeWithChildren>;

    /// Single node detail by slug or id.
    async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode>;

    async fn search(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        filter: &SearchFilter,
    ) -> CatalogResult<CatalogListing>;

    async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing>;
}
