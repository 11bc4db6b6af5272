//! Storefront crawler main entry point
//!
//! This is the command-line interface for archiving the listings of an eBay
//! store.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use storefront_crawler::config::{load_config_with_hash, validate, Config};
use storefront_crawler::crawler::{crawl, listing_url, Outcome};
use storefront_crawler::listing::Condition;
use storefront_crawler::logging::init_logging;
use storefront_crawler::output::{load_statistics, print_report, print_statistics};

/// Storefront crawler: archive the listings of an eBay store
///
/// Walks every listing page of the store, extracts title, price, condition
/// and URL of each item, and stores each item as
/// `<data-dir>/<store>/<item-id>.json`.
#[derive(Parser, Debug)]
#[command(name = "storefront-crawler")]
#[command(version)]
#[command(about = "Archive the listings of an eBay store", long_about = None)]
struct Cli {
    /// eBay store name to crawl [default: garlandcomputer]
    #[arg(long)]
    store: Option<String>,

    /// Filter items by condition
    #[arg(long, value_parser = parse_condition, value_name = "New|Pre-Owned|Used")]
    condition: Option<Condition>,

    /// Base directory to save crawled data [default: data]
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Directory for per-run log files [default: logs]
    #[arg(long, value_name = "PATH")]
    log_dir: Option<PathBuf>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this many pages even if more exist [default: 1000]
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Maximum number of concurrent record writes [default: 16]
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Storefront origin [default: https://www.ebay.com]
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// User-Agent header sent with each request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging (per-item extraction and write details)
    #[arg(short, long, conflicts_with = "quiet")]
    debug: bool,

    /// Suppress non-error log output
    #[arg(short, long)]
    quiet: bool,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the records already stored for the store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

fn parse_condition(value: &str) -> Result<Condition, String> {
    value.parse().map_err(|e: storefront_crawler::ConfigError| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Load configuration, then let flags override it
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.stats {
        handle_stats(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(config, config_hash, cli.debug, cli.quiet).await
}

/// Copies every flag that was given onto the configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(store) = &cli.store {
        config.crawler.store = store.clone();
    }
    if cli.condition.is_some() {
        config.crawler.condition = cli.condition;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_writes = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }
    if let Some(base_url) = &cli.base_url {
        config.fetch.base_url = base_url.clone();
    }
    if let Some(user_agent) = &cli.user_agent {
        config.fetch.user_agent = user_agent.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.output.log_dir = log_dir.clone();
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Storefront Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Store: {}", config.crawler.store);
    println!(
        "  Condition filter: {}",
        config
            .crawler
            .condition
            .map(|c| c.as_str())
            .unwrap_or("none")
    );
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent writes: {}",
        config.crawler.max_concurrent_writes
    );

    println!("\nFetch:");
    let base_url = url::Url::parse(&config.fetch.base_url)?;
    println!(
        "  First page: {}",
        listing_url(&base_url, &config.crawler.store, 1)?
    );
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    println!("  Records: {}", config.store_dir().display());
    println!("  Logs: {}", config.output.log_dir.display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics of stored records
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let stats = load_statistics(&config.output.data_dir, &config.crawler.store)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: Option<String>,
    debug: bool,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let guard = init_logging(&config.output.log_dir, &config.crawler.store, debug, quiet)?;

    tracing::info!("Initialized crawler for store: {}", config.crawler.store);
    tracing::info!("Data will be saved to: {}", config.store_dir().display());
    tracing::info!("Logging to: {}", guard.log_file().display());
    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            flag.store(true, Ordering::SeqCst);
        }
    });

    let report = crawl(config, stop).await?;
    print_report(&report);

    Ok(exit_code(&report.outcome))
}

/// Process exit status for a finished run
fn exit_code(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Done => ExitCode::SUCCESS,
        Outcome::Aborted { .. } => ExitCode::FAILURE,
        Outcome::Cancelled => ExitCode::from(130),
    }
}
