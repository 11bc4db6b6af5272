//! Crawler module for storefront page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing pages
//! - HTML parsing and item extraction
//! - Condition filtering
//! - Overall crawl coordination

mod coordinator;
pub mod dom;
mod fetcher;
pub mod filter;
mod parser;

pub use coordinator::{Coordinator, CrawlReport, Outcome};
pub use fetcher::{build_http_client, listing_url, FetchedPage, HttpFetcher, PageFetcher};
pub use filter::matches;
pub use parser::{extract_listing, normalize_price, parse_listing, ParseDegradation, ParsedListing};

use crate::config::Config;
use crate::storage::JsonFileWriter;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Validate the configuration
/// 3. Create the store's record directory
/// 4. Walk the listing pages until the last one (or a failure)
/// 5. Persist every matching item as a JSON record
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `stop` - Cancellation flag, checked between pages
///
/// # Example
///
/// ```no_run
/// use storefront_crawler::config::Config;
/// use storefront_crawler::crawler::crawl;
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(Config::default(), Arc::new(AtomicBool::new(false))).await?;
/// println!("{} items written", report.items_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, stop: Arc<AtomicBool>) -> crate::Result<CrawlReport> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let writer = JsonFileWriter::new(config.output.data_dir.clone());
    Coordinator::new(config, fetcher, writer)
        .with_stop_flag(stop)
        .run()
        .await
}
