//! Catalog-Trawler main entry point
//!
//! This is the command-line interface for the Catalog-Trawler listing crawler.

use anyhow::Context;
use catalog_trawler::config::{load_config_with_hash, Config, DetailMode};
use catalog_trawler::crawler::run_crawl;
use catalog_trawler::output::{load_statistics, print_report, print_statistics};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Trawler: a resumable crawler for paginated listing catalogs
///
/// Catalog-Trawler walks a listings site page by page, fetches each new
/// listing's detail page, and appends the merged records to a CSV file or
/// SQLite database. Records captured by earlier runs are skipped, so an
/// interrupted crawl is resumed by simply running it again.
#[derive(Parser, Debug)]
#[command(name = "catalog-trawler")]
#[command(version = "1.0.0")]
#[command(about = "A resumable crawler for paginated listing catalogs", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the record store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_trawler=info,warn"),
            1 => EnvFilter::new("catalog_trawler=debug,info"),
            2 => EnvFilter::new("catalog_trawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;
    println!("=== Catalog-Trawler Dry Run ===\n");

    println!("Endpoints:");
    println!("  List: {} ({}=<page>)", crawler.list_url, crawler.page_param);
    if crawler.detail_mode != DetailMode::None {
        println!("  Detail: {} ({}=<id>)", crawler.detail_url, crawler.id_param);
    }
    println!("  Asset: {}", crawler.asset_url);

    println!("\nPagination:");
    println!("  First page: {}", crawler.first_page);
    match crawler.last_page {
        Some(last) => println!("  Last page: {}", last),
        None => println!("  Last page: until an empty page"),
    }
    println!("  Empty page confirmations: {}", crawler.empty_page_confirmations);
    println!("  Politeness delay: {}ms", crawler.politeness_delay_ms);

    println!("\nDetail pages:");
    println!("  Mode: {:?}", crawler.detail_mode);
    println!("  Attempts per item: {}", crawler.detail_attempts);

    println!("\nBlocking:");
    println!("  Markers: {}", config.blocking.markers.len());
    println!("  Blocked statuses: {:?}", config.blocking.blocked_statuses);

    println!("\nRecovery:");
    println!("  Block wait: {}s", config.recovery.block_wait_secs);
    println!(
        "  Network wait: {}s (max {}s), escalates after {} failures",
        config.recovery.network_wait_secs,
        config.recovery.network_max_wait_secs,
        config.recovery.escalation_threshold
    );
    match &config.recovery.reset_command {
        Some(argv) => println!("  Reset command: {}", argv.join(" ")),
        None => println!("  Reset command: none"),
    }

    println!("\nOutput:");
    println!(
        "  {} ({:?})",
        config.output.path,
        config.output.resolved_format()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the record store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Store: {}\n", config.output.path);

    let stats = load_statistics(&config.output)
        .with_context(|| format!("failed to read store {}", config.output.path))?;
    match stats {
        Some(stats) => print_statistics(&stats),
        None => println!("No records captured yet (store does not exist)"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} into {}",
        config.crawler.list_url,
        config.output.path
    );

    match run_crawl(config, config_hash).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
