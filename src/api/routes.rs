// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::health_check))
        .route("/sitemap.xml", web::get().to(handlers::sitemap_xml))
        .service(
            web::scope("/api/v1")
                .route("/categories", web::get().to(handlers::list_categories))
                .route("/nodes", web::get().to(handlers::get_node_page))
                .route("/search", web::get().to(handlers::search))
                .route("/gallery", web::get().to(handlers::gallery)),
        );
}
