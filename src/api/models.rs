// API request/response models (DTOs)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::model::CatalogListing;
use crate::navigation::page::NodeCard;
use crate::normalization::{LocaleKey, Locales};
use crate::sitemap::RouteTable;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(Meta::now()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: Some(Meta::now()),
        }
    }
}

/// Metadata included in all API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub version: String,
}

impl Meta {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub catalog_api: String,
    pub uptime_seconds: u64,
}

/// `?locale=` shared by every localized endpoint; absent means primary.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NodeQuery {
    pub path: String,
    pub locale: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub sort: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub count: Option<usize>,
    pub locale: Option<String>,
}

/// Paged list of localized cards.
#[derive(Debug, Serialize)]
pub struct CardPage {
    pub items: Vec<NodeCard>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl CardPage {
    pub fn from_listing(
        listing: &CatalogListing,
        locales: &Locales,
        locale: LocaleKey,
        routes: &RouteTable,
    ) -> Self {
        Self {
            items: listing
                .items
                .iter()
                .map(|n| NodeCard::from_node(n, locales, locale, routes))
                .collect(),
            page: listing.page,
            limit: listing.limit,
            total: listing.total,
        }
    }
}
