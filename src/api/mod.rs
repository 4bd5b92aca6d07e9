// HTTP surface for the catalog site: page models, search, gallery and sitemap.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::{AppState, SiteServer};
