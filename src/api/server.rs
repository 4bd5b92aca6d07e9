// API server implementation using actix-web

use crate::api::{middleware, routes};
use crate::catalog::CatalogRepository;
use crate::config::SiteConfig;
use crate::sitemap::RouteTable;
use crate::util::env::{env_list, env_opt, env_parse};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::time::Instant;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub repo: CatalogRepository,
    pub config: SiteConfig,
    pub routes: RouteTable,
    pub started: Instant,
}

impl AppState {
    pub fn new(repo: CatalogRepository, config: SiteConfig) -> Self {
        let routes = config.route_table();
        Self {
            repo,
            config,
            routes,
            started: Instant::now(),
        }
    }
}

pub struct SiteServer {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl SiteServer {
    /// Create server from environment variables
    pub fn from_env() -> Self {
        crate::util::env::init_env();

        Self {
            host: env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_parse("API_PORT", 8080u16),
            allowed_origins: env_list("ALLOWED_ORIGINS", "http://localhost:3000"),
        }
    }

    /// Start the HTTP server
    pub async fn run(self, state: AppState) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            catalog_api = %state.config.catalog_api_url,
            "starting catalog site server"
        );

        let state = web::Data::new(state);
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);

            App::new()
                .app_data(state.clone())
                .wrap(logger)
                .wrap(compress)
                .wrap(cors)
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
