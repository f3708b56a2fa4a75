//! Farmstats main entry point
//!
//! This is the command-line interface for the farm ingestion pipeline.

use anyhow::Context;
use clap::Parser;
use farmstats::config::{load_config_with_hash, Config};
use farmstats::crawler::run_pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Farmstats: a concurrent farm ingestion pipeline
///
/// Farmstats walks the farm listing, fetches each farm page, and keeps the
/// extracted friendship scores available over a TCP console and an HTTP API.
#[derive(Parser, Debug)]
#[command(name = "farmstats")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent farm ingestion pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without starting
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.check {
        print_settings(&config);
        return Ok(());
    }

    tracing::info!(
        "Starting pipeline: {} workers, queue capacity {}",
        config.pipeline.workers,
        config.pipeline.queue_capacity
    );

    run_pipeline(config).await.context("pipeline failed")?;

    tracing::info!("Pipeline stopped");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("farmstats=info,warn"),
            1 => EnvFilter::new("farmstats=debug,info"),
            2 => EnvFilter::new("farmstats=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --check: prints the effective settings
fn print_settings(config: &Config) {
    let disabled = "disabled".to_string();

    println!("=== Farmstats Configuration ===\n");

    println!("Pipeline:");
    println!("  Workers: {}", config.pipeline.workers);
    println!("  Queue capacity: {}", config.pipeline.queue_capacity);

    println!("\nSource:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Listing path: {}", config.source.listing_path);
    println!("  Recents path: {}", config.source.recents_path);
    println!("  Required prefix: {}", config.source.required_prefix);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSpider:");
    println!(
        "  Dedup database: {}",
        config
            .spider
            .dedup_database_path
            .as_ref()
            .unwrap_or(&disabled)
    );
    println!(
        "  Recents polls: {} every {}s",
        config.spider.recents_poll_count, config.spider.recents_poll_interval_secs
    );

    println!("\nSurfaces:");
    println!(
        "  Console: {}",
        config.console.listen.as_ref().unwrap_or(&disabled)
    );
    println!("  HTTP: {}", config.http.listen.as_ref().unwrap_or(&disabled));

    println!("\n✓ Configuration is valid");
}
