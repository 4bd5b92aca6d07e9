use std::sync::Arc;
use tracing::warn;

use super::error::CatalogResult;
use super::model::{
    CatalogListing, ContentNode, ListQuery, NodeWithChildren, SearchFilter, SortKey,
};
use super::source::CatalogSource;

/// Read-only catalog access with the page-level degrade policy applied.
///
/// Listings (root, search, filtered) turn any failure into an empty listing so pages
/// render their empty state. Single-node lookups propagate: a missing node has no
/// sensible empty state.
#[derive(Clone)]
pub struct CatalogRepository {
    source: Arc<dyn CatalogSource>,
}

impl CatalogRepository {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    pub fn from_source<S: CatalogSource + 'static>(source: S) -> Self {
        Self::new(Arc::new(source))
    }

    pub async fn fetch_root_categories(&self) -> CatalogListing {
        match self.source.root_categories().await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(target = "catalog", error = %err, "root categories unavailable; rendering empty");
                CatalogListing::empty(1, 0)
            }
        }
    }

    pub async fn fetch_node_with_children(
        &self,
        path: &str,
        sort: SortKey,
    ) -> CatalogResult<NodeWithChildren> {
        self.source.node_with_children(path, sort).await
    }

    pub async fn fetch_node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
        self.source.node(slug_or_id).await
    }

    pub async fn search_nodes(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        filter: &SearchFilter,
    ) -> CatalogListing {
        if query.trim().is_empty() {
            return CatalogListing::empty(page, limit);
        }
        match self.source.search(query, page, limit, filter).await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(target = "catalog", error = %err, query, "search failed; rendering empty");
                CatalogListing::empty(page, limit)
            }
        }
    }

    pub async fn list_nodes(&self, query: &ListQuery) -> CatalogListing {
        match self.source.list(query).await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(
                    target = "catalog",
                    error = %err,
                    page = query.page,
                    node_type = ?query.node_type,
                    "listing failed; rendering empty"
                );
                CatalogListing::empty(query.page, query.limit)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::catalog::error::CatalogError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that fails every call with a transport-style error.
    pub struct FailingSource;

    fn down() -> CatalogError {
        CatalogError::Http {
            status: 503,
            body: "backend down".into(),
        }
    }

    #[async_trait]
    impl CatalogSource for FailingSource {
        async fn root_categories(&self) -> CatalogResult<CatalogListing> {
            Err(down())
        }
        async fn node_with_children(
            &self,
            _path: &str,
            _sort: SortKey,
        ) -> CatalogResult<NodeWithChildren> {
            Err(down())
        }
        async fn node(&self, _slug_or_id: &str) -> CatalogResult<ContentNode> {
            Err(down())
        }
        async fn search(
            &self,
            _query: &str,
            _page: u32,
            _limit: u32,
            _filter: &SearchFilter,
        ) -> CatalogResult<CatalogListing> {
            Err(down())
        }
        async fn list(&self, _query: &ListQuery) -> CatalogResult<CatalogListing> {
            Err(down())
        }
    }

    /// Wraps another source and counts calls per operation.
    pub struct CountingSource<S> {
        pub inner: S,
        pub node_calls: AtomicUsize,
        pub list_calls: AtomicUsize,
        pub detail_calls: AtomicUsize,
    }

    impl<S> CountingSource<S> {
        pub fn new(inner: S) -> Self {
            Self {
                inner,
                node_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl<S: CatalogSource> CatalogSource for CountingSource<S> {
        async fn root_categories(&self) -> CatalogResult<CatalogListing> {
            self.inner.root_categories().await
        }
        async fn node_with_children(
            &self,
            path: &str,
            sort: SortKey,
        ) -> CatalogResult<NodeWithChildren> {
            self.node_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.node_with_children(path, sort).await
        }
        async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.node(slug_or_id).await
        }
        async fn search(
            &self,
            query: &str,
            page: u32,
            limit: u32,
            filter: &SearchFilter,
        ) -> CatalogResult<CatalogListing> {
            self.inner.search(query, page, limit, filter).await
        }
        async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list(query).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FailingSource;
    use super::*;
    use crate::catalog::fixture::sample;
    use crate::catalog::http::HttpCatalogSource;

    #[tokio::test]
    async fn listings_degrade_to_empty_on_failure() {
        let repo = CatalogRepository::from_source(FailingSource);
        assert!(repo.fetch_root_categories().await.items.is_empty());

        let listing = repo.list_nodes(&ListQuery::default()).await;
        assert!(listing.items.is_empty());
        assert_eq!(listing.total, 0);

        let found = repo
            .search_nodes("pump", 1, 10, &SearchFilter::default())
            .await;
        assert!(found.items.is_empty());
    }

    #[tokio::test]
    async fn node_fetch_failure_propagates() {
        let repo = CatalogRepository::from_source(FailingSource);
        assert!(repo
            .fetch_node_with_children("water", SortKey::Order)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_degrades_root_listing() {
        let source = HttpCatalogSource::new("http://127.0.0.1:9", Some(2)).unwrap();
        let repo = CatalogRepository::from_source(source);
        assert!(repo.fetch_root_categories().await.items.is_empty());
    }

    #[tokio::test]
    async fn blank_search_short_circuits() {
        let repo = CatalogRepository::from_source(sample::catalog());
        let listing = repo.search_nodes("   ", 1, 10, &SearchFilter::default()).await;
        assert!(listing.items.is_empty());
    }
}
