// HTTP server binary: page models, search, gallery and sitemap over the catalog backend.

use anyhow::Result;
use catalog_nav::api::{AppState, SiteServer};
use catalog_nav::config::{SiteConfig, LOGGED_KEYS};
use catalog_nav::logging::init_tracing;
use catalog_nav::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();
    init_tracing("info,actix_web=info")?;

    env_util::preflight_check("site_server", &[], LOGGED_KEYS)?;

    let config = SiteConfig::from_env();
    let repo = config.http_repository()?;
    let server = SiteServer::from_env();

    server.run(AppState::new(repo, config)).await?;

    Ok(())
}
