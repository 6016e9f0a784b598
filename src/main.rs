//! routefilter - collect and filter IPv4 routes for BIRD.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use routefilter::cli::Cli;
use routefilter::cmd::SystemRunner;
use routefilter::collector::{self, CollectOptions};
use routefilter::{bird, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_or_default(cli.config.as_deref())?;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create output directory {:?}", parent))?;
        }
    }

    info!("Collecting routes into {:?}...", cli.output);
    let outcome = collector::collect_routes(
        &config,
        &CollectOptions {
            as_list: cli.as_list.as_deref(),
            exclude: cli.exclude.as_deref(),
            output: &cli.output,
            summarize: cli.summarize,
        },
    )
    .await?;

    if !outcome.written {
        warn!("Output file {:?} was not written", cli.output);
        if cli.apply {
            warn!("Cannot apply BIRD configuration without a route list");
        }
        return Ok(());
    }

    info!("Route collection completed: {} routes", outcome.route_count);

    if cli.apply {
        if outcome.changed {
            bird::apply_configuration(&SystemRunner)?;
        } else {
            info!("Route list unchanged; skipping BIRD reload");
        }
    }

    Ok(())
}
