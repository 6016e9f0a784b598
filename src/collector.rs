//! The pipeline driver: fetch, merge, filter, write.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::aslist;
use crate::bird;
use crate::cache::{DirCache, ListCache};
use crate::config::Config;
use crate::engine;
use crate::fetcher::Fetcher;
use crate::utils::{file_hash, format_count};

/// Per-run collection options, straight from the CLI.
pub struct CollectOptions<'a> {
    pub as_list: Option<&'a Path>,
    pub exclude: Option<&'a Path>,
    pub output: &'a Path,
    pub summarize: bool,
}

/// What a collection run produced.
pub struct CollectOutcome {
    pub route_count: usize,
    /// False when exclusion left nothing and no file was written.
    pub written: bool,
    /// True when the output file content differs from the previous run.
    pub changed: bool,
}

/// Collect routes from every source, apply the exclusion filter and write
/// the BIRD reject list.
pub async fn collect_routes(config: &Config, opts: &CollectOptions<'_>) -> Result<CollectOutcome> {
    let cache: Arc<dyn ListCache> = Arc::new(DirCache::new(&config.cache_dir));
    let fetcher = Fetcher::new(config, cache)?;

    let as_list = aslist::load(opts.as_list, &fetcher).await?;

    let (bgptools, tor, manual, antifilter, twitter) = tokio::join!(
        fetcher.fetch_bgptools(&as_list),
        fetcher.fetch_tor(),
        fetcher.fetch_manual(),
        fetcher.fetch_antifilter(),
        fetcher.fetch_twitter(),
    );

    let mut routes: BTreeSet<String> = BTreeSet::new();
    let sources = [
        ("bgp.tools", bgptools),
        ("Tor", tor),
        ("manual list", manual),
        ("antifilter", antifilter),
        ("Twitter", twitter),
    ];
    for (name, list) in sources {
        info!("Added {} routes from {}", format_count(list.len()), name);
        routes.extend(list);
    }
    info!("Total routes collected: {}", format_count(routes.len()));

    if routes.is_empty() {
        anyhow::bail!("No routes collected from any source");
    }

    let excludes = load_excludes(opts.exclude, &fetcher).await?;

    info!("Applying exclusion filter...");
    let includes: Vec<String> = routes.into_iter().collect();
    let result = engine::compute(&includes, &excludes, opts.summarize)?;

    if result.is_empty() {
        warn!("No networks left after exclusion; output not written");
        return Ok(CollectOutcome {
            route_count: 0,
            written: false,
            changed: false,
        });
    }

    let previous = file_hash(opts.output);
    write_output(opts.output, &result)?;
    let changed = previous != file_hash(opts.output);

    info!(
        "Wrote {} routes to {:?}{}",
        format_count(result.len()),
        opts.output,
        if changed { "" } else { " (unchanged)" }
    );

    Ok(CollectOutcome {
        route_count: result.len(),
        written: true,
        changed,
    })
}

/// Exclude lines from a local file, or fetched when no file is given.
async fn load_excludes(path: Option<&Path>, fetcher: &Fetcher) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            info!("Reading exclude list from {:?}...", path);
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read exclude file {:?}", path))?;
            let excludes: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            info!("Read {} exclude entries", format_count(excludes.len()));
            Ok(excludes)
        }
        None => Ok(fetcher.fetch_exclude().await),
    }
}

/// Write the prefixes as one reject statement per line.
fn write_output(path: &Path, prefixes: &[String]) -> Result<()> {
    let mut content = String::with_capacity(prefixes.len() * 32);
    for prefix in prefixes {
        content.push_str(&bird::reject_statement(prefix));
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write output file {:?}", path))
}
