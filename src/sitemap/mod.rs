pub mod crawler;
pub mod routes;
pub mod xml;

pub use crawler::{CrawlSettings, SitemapCrawler, SitemapEntry};
pub use routes::{RouteKey, RouteTable};
pub use xml::render_sitemap;
