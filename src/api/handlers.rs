// HTTP request handlers for API endpoints

use crate::api::models::*;
use crate::api::server::AppState;
use crate::catalog::model::{ListQuery, NodeType, SearchFilter, SortKey};
use crate::catalog::CatalogError;
use crate::media::hydrate_gallery;
use crate::navigation::page::{load_node_page, NodeCard};
use crate::normalization::LocaleKey;
use crate::sitemap::{render_sitemap, SitemapCrawler};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};

const MAX_PAGE_SIZE: u32 = 100;
const MAX_GALLERY: usize = 48;

fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        CatalogError::Http { status, .. } if *status == 404 => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn locale_of(state: &AppState, tag: Option<&str>) -> LocaleKey {
    tag.map_or(LocaleKey::Primary, |t| state.config.locales.key_for(t))
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

fn parse_sort(raw: Option<&str>) -> std::result::Result<Option<SortKey>, String> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse::<SortKey>)
        .transpose()
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        catalog_api: state.config.catalog_api_url.clone(),
        uptime_seconds: state.started.elapsed().as_secs(),
    });

    Ok(HttpResponse::Ok().json(response))
}

/// Full sitemap, crawled on request.
pub async fn sitemap_xml(state: web::Data<AppState>) -> Result<HttpResponse> {
    let crawler = SitemapCrawler::new(
        &state.repo,
        &state.config.locales,
        &state.routes,
        state.config.crawl_settings(),
    );
    let entries = crawler.crawl().await;

    match render_sitemap(&entries) {
        Ok(xml) => Ok(HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml)),
        Err(err) => {
            tracing::error!(error = %err, "sitemap render failed");
            Ok(HttpResponse::InternalServerError().finish())
        }
    }
}

/// Root categories, localized.
pub async fn list_categories(
    query: web::Query<LocaleQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let locale = locale_of(&state, query.locale.as_deref());
    let listing = state.repo.fetch_root_categories().await;
    let cards: Vec<NodeCard> = listing
        .items
        .iter()
        .map(|n| NodeCard::from_node(n, &state.config.locales, locale, &state.routes))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(cards)))
}

/// Page model for one node path.
pub async fn get_node_page(
    query: web::Query<NodeQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sort = match parse_sort(query.sort.as_deref()) {
        Ok(sort) => sort.unwrap_or_default(),
        Err(msg) => return Ok(bad_request(msg)),
    };
    let locales = &state.config.locales;
    let locale = locale_of(&state, query.locale.as_deref());

    tracing::info!(path = %query.path, sort = %sort, "node page requested");

    match load_node_page(&state.repo, &query.path, sort, locales, locale, &state.routes).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(err) => {
            let status = status_for(&err);
            if status == StatusCode::NOT_FOUND {
                tracing::debug!(path = %query.path, "node not found");
            } else {
                tracing::warn!(path = %query.path, error = %err, "node page failed");
            }
            Ok(HttpResponse::build(status).json(ApiResponse::<()>::error(err.to_string())))
        }
    }
}

pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sort = match parse_sort(query.sort.as_deref()) {
        Ok(sort) => sort,
        Err(msg) => return Ok(bad_request(msg)),
    };
    let node_type = match query.node_type.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => match raw.parse::<NodeType>() {
            Ok(t) => Some(t),
            Err(msg) => return Ok(bad_request(msg)),
        },
        None => None,
    };
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE);
    let filter = SearchFilter { node_type, sort };

    let listing = state.repo.search_nodes(&query.q, page, limit, &filter).await;
    let locales = &state.config.locales;
    let locale = locale_of(&state, query.locale.as_deref());

    let response = ApiResponse::success(CardPage::from_listing(
        &listing,
        locales,
        locale,
        &state.routes,
    ));
    Ok(HttpResponse::Ok().json(response))
}

/// Up to `count` items that have images.
pub async fn gallery(
    query: web::Query<GalleryQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let count = query.count.unwrap_or(12).min(MAX_GALLERY);
    let budget = state.config.gallery_lookup_budget;
    let candidates = state
        .repo
        .list_nodes(&ListQuery {
            limit: budget.max(count) as u32,
            node_type: Some(NodeType::Item),
            ..ListQuery::default()
        })
        .await;

    let picked = hydrate_gallery(&state.repo, &candidates.items, count, budget).await;
    let locales = &state.config.locales;
    let locale = locale_of(&state, query.locale.as_deref());
    let cards: Vec<NodeCard> = picked
        .iter()
        .map(|n| NodeCard::from_node(n, locales, locale, &state.routes))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(cards)))
}
