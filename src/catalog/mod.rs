pub mod envelope;
pub mod error;
pub mod fixture;
pub mod http;
pub mod model;
pub mod repository;
pub mod source;

pub use error::{CatalogError, CatalogResult};
pub use fixture::FixtureCatalog;
pub use http::HttpCatalogSource;
pub use model::{
    Breadcrumb, CatalogListing, ContentNode, ImageRef, ListQuery, NodeType, NodeWithChildren,
    SearchFilter, SortKey,
};
pub use repository::CatalogRepository;
pub use source::CatalogSource;
