use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use catalog_nav::cli;
use catalog_nav::logging::init_tracing;
use catalog_nav::util::env;

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Catalog navigation and sitemap CLI")]
struct Cli {
    /// Serve the catalog from a JSON file instead of the HTTP backend
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,
    /// Locale tag for rendered text (defaults to the primary locale)
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Crawl the catalog and emit sitemap XML
    Sitemap {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Override SITE_URL
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Show the page model for a node path (e.g. water/pumps)
    Node {
        path: String,
        /// order, -order, title, -title, createdAt, -createdAt
        #[arg(long)]
        sort: Option<String>,
        /// Print JSON instead of an outline
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search nodes; without a query, reads debounced queries from stdin
    Search {
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// category, group or item
        #[arg(long = "type")]
        node_type: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        /// Override SEARCH_DEBOUNCE_MS
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Walk the mega-menu over the whole tree and print the disclosed columns
    Menu {
        /// Override MENU_CLOSE_DELAY_MS
        #[arg(long)]
        close_delay_ms: Option<u64>,
    },
    /// Pick items with images for the home gallery
    Gallery {
        #[arg(long, default_value_t = 12)]
        count: usize,
        /// Override GALLERY_LOOKUP_BUDGET
        #[arg(long)]
        budget: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env::init_env();
    init_tracing("info")?;

    let args = Cli::parse();
    let fixture = args.fixture;
    let locale = args.locale;

    match args.command {
        Commands::Sitemap { output, site_url } => {
            use cli::sitemap::{run, SitemapConfig};
            run(SitemapConfig {
                fixture,
                output,
                site_url,
            })
            .await?;
        }
        Commands::Node { path, sort, json } => {
            use cli::node::{run, NodeConfig};
            run(NodeConfig {
                fixture,
                locale,
                path,
                sort,
                json,
            })
            .await?;
        }
        Commands::Search {
            query,
            page,
            limit,
            node_type,
            sort,
            debounce_ms,
        } => {
            use cli::search::{run, SearchConfig};
            run(SearchConfig {
                fixture,
                locale,
                query,
                page,
                limit,
                node_type,
                sort,
                debounce: debounce_ms.map(Duration::from_millis),
            })
            .await?;
        }
        Commands::Menu { close_delay_ms } => {
            use cli::menu::{run, MenuConfig};
            run(MenuConfig {
                fixture,
                locale,
                close_delay: close_delay_ms.map(Duration::from_millis),
            })
            .await?;
        }
        Commands::Gallery { count, budget } => {
            use cli::gallery::{run, GalleryConfig};
            run(GalleryConfig {
                fixture,
                locale,
                count,
                budget,
            })
            .await?;
        }
    }

    Ok(())
}
