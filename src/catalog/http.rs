use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::envelope::{listing_from_value, node_from_value, node_with_children_from_value};
use super::error::{CatalogError, CatalogResult};
use super::model::{
    CatalogListing, ContentNode, ListQuery, NodeType, NodeWithChildren, SearchFilter, SortKey,
};
use super::source::CatalogSource;

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// Catalog backend over HTTP GET.
///
/// Endpoints (relative to `base_url`):
/// - GET /products/root?type=category&sort=order
/// - GET /products/node?path=...&sort=...
/// - GET /products/search?q=...&page&limit&type?&sort?
/// - GET /products?page&limit&sort&type?&parent?&q?
/// - GET /products/<slug-or-id>
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    base_url: String,
    http: Client,
    bearer: Option<String>,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> CatalogResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let timeout_secs = timeout_secs.unwrap_or(15);
        let http = Client::builder()
            .user_agent(concat!("catalog-nav/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            http,
            bearer: None,
        })
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn add_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.bearer.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> CatalogResult<Value> {
        let url = self.endpoint(path);
        let req = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(query);
        let resp = self.add_auth(req).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::not_found(format!("{path} {query:?}")));
        }
        if !status.is_success() {
            let body = truncate_for_log(resp.text().await.unwrap_or_default(), 2000);
            return Err(CatalogError::Http {
                status: status.as_u16(),
                body,
            });
        }
        debug!(target = "catalog", %url, status = status.as_u16(), "backend response");
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        ("sort", query.sort.as_str().to_string()),
    ];
    if let Some(t) = query.node_type {
        params.push(("type", t.as_str().to_string()));
    }
    if let Some(parent) = query.parent.as_deref().filter(|p| !p.is_empty()) {
        params.push(("parent", parent.to_string()));
    }
    if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        params.push(("q", q.trim().to_string()));
    }
    params
}

fn search_params(
    query: &str,
    page: u32,
    limit: u32,
    filter: &SearchFilter,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.trim().to_string()),
        ("page", page.to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(t) = filter.node_type {
        params.push(("type", t.as_str().to_string()));
    }
    if let Some(sort) = filter.sort {
        params.push(("sort", sort.as_str().to_string()));
    }
    params
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn root_categories(&self) -> CatalogResult<CatalogListing> {
        let body = self
            .get_json(
                "products/root",
                &[
                    ("type", NodeType::Category.as_str().to_string()),
                    ("sort", SortKey::Order.as_str().to_string()),
                ],
            )
            .await?;
        let mut listing = listing_from_value(&body, 1, 0)?;
        listing.items.retain(|n| n.node_type == NodeType::Category);
        SortKey::Order.sort(&mut listing.items);
        Ok(listing)
    }

    async fn node_with_children(
        &self,
        path: &str,
        sort: SortKey,
    ) -> CatalogResult<NodeWithChildren> {
        let body = self
            .get_json(
                "products/node",
                &[
                    ("path", path.trim_matches('/').to_string()),
                    ("sort", sort.as_str().to_string()),
                ],
            )
            .await?;
        if body.is_null() {
            return Err(CatalogError::not_found(format!("path {path}")));
        }
        node_with_children_from_value(&body)
    }

    async fn node(&self, slug_or_id: &str) -> CatalogResult<ContentNode> {
        let encoded = urlencoding::encode(slug_or_id.trim());
        let body = self.get_json(&format!("products/{encoded}"), &[]).await?;
        if body.is_null() {
            return Err(CatalogError::not_found(format!("node {slug_or_id}")));
        }
        node_from_value(&body)
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        filter: &SearchFilter,
    ) -> CatalogResult<CatalogListing> {
        let body = self
            .get_json("products/search", &search_params(query, page, limit, filter))
            .await?;
        listing_from_value(&body, page, limit)
    }

    async fn list(&self, query: &ListQuery) -> CatalogResult<CatalogListing> {
        let body = self.get_json("products", &list_params(query)).await?;
        listing_from_value(&body, query.page, query.limit)
    }
}
