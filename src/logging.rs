use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Tracing targets emitted by this crate.
pub const CRATE_TARGETS: [&str; 6] = ["catalog", "menu", "gallery", "sitemap", "cli", "preflight"];

/// Level override for the crate's own targets, independent of `RUST_LOG`.
pub const CRATE_LEVEL_ENV: &str = "CATALOG_LOG";

/// Appends one directive per crate target to `base`.
///
/// Without an explicit `crate_level` the targets follow the base filter's
/// global level, so `"warn"` stays quiet and `"debug"` shows backend responses.
pub fn filter_directives(base: &str, crate_level: Option<&str>) -> String {
    let level = crate_level
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .or_else(|| global_level(base))
        .unwrap_or("info");
    let mut directives: Vec<String> = base
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();
    directives.extend(CRATE_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}

fn global_level(base: &str) -> Option<&str> {
    base.split(',')
        .map(str::trim)
        .find(|d| !d.is_empty() && !d.contains('='))
}

/// Sets up the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `default_filter` is extended with the
/// crate targets at the level from `CATALOG_LOG`.
pub fn init_tracing(default_filter: &str) -> Result<(), anyhow::Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let crate_level = std::env::var(CRATE_LEVEL_ENV).ok();
            let directives = filter_directives(default_filter, crate_level.as_deref());
            EnvFilter::try_new(&directives)
                .map_err(|e| anyhow::anyhow!("invalid log filter {directives:?}: {e}"))?
        }
    };

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
