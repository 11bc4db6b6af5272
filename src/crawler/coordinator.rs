//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that coordinates all aspects of a crawl:
//! - Validating configuration and preparing the record store
//! - Fetching listing pages one after another
//! - Parsing, filtering and persisting the records of each page
//! - Honouring the stop flag between pages
//! - Producing the final run report
//!
//! Pages are strictly sequential. The records of one page are written
//! concurrently (at most `max_concurrent_writes` at a time) and all of those
//! writes complete before the next page is requested.

use crate::config::{validate, Config};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::filter::matches;
use crate::crawler::parser::parse_listing;
use crate::listing::{CrawlPhase, CrawlState, ItemRecord};
use crate::storage::RecordWriter;
use crate::FetchError;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a crawl run ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The last page was reached (or the page cap was hit)
    Done,

    /// A page could not be fetched
    Aborted {
        /// Index of the page whose fetch failed
        page: u32,
        /// The fetch failure
        error: FetchError,
    },

    /// The stop flag was raised; the run ended between two pages
    Cancelled,
}

impl Outcome {
    /// The terminal phase this outcome corresponds to
    pub fn phase(&self) -> CrawlPhase {
        match self {
            Self::Done => CrawlPhase::Done,
            Self::Aborted { .. } => CrawlPhase::Aborted,
            Self::Cancelled => CrawlPhase::Cancelled,
        }
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Store that was crawled
    pub store: String,
    /// How the run ended
    pub outcome: Outcome,
    /// Pages fetched and parsed
    pub pages_visited: u32,
    /// Records persisted successfully
    pub items_written: u64,
    /// Records extracted by the parser
    pub items_found: u64,
    /// Records rejected by the condition filter
    pub items_filtered_out: u64,
    /// Listing containers the parser skipped
    pub items_skipped: u64,
    /// Records whose write failed
    pub write_failures: u64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns true if the run reached its last page
    pub fn is_success(&self) -> bool {
        self.outcome.phase().is_success()
    }
}

/// Drives a crawl of one storefront
pub struct Coordinator<F, W> {
    config: Arc<Config>,
    fetcher: F,
    writer: W,
    stop: Arc<AtomicBool>,
    state: CrawlState,
}

impl<F, W> Coordinator<F, W>
where
    F: PageFetcher,
    W: RecordWriter,
{
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Source of listing pages
    /// * `writer` - Destination of item records
    pub fn new(config: Config, fetcher: F, writer: W) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            writer,
            stop: Arc::new(AtomicBool::new(false)),
            state: CrawlState::new(),
        }
    }

    /// Uses `stop` as the cancellation flag
    ///
    /// Setting the flag ends the crawl before the next page is fetched; the
    /// page in progress still finishes its writes.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Runs the page loop to completion
    ///
    /// Configuration and store preparation errors are returned as `Err`
    /// before any request is made. Once the loop has started, the result is
    /// always a report: a failed fetch yields `Outcome::Aborted` with the
    /// counts gathered up to that point.
    pub async fn run(mut self) -> crate::Result<CrawlReport> {
        let start_time = Instant::now();
        let config = Arc::clone(&self.config);
        let store = config.crawler.store.as_str();

        // Init
        validate(&config)?;
        self.writer.prepare(store).await?;

        tracing::info!(
            "Starting crawl of store '{}' with condition filter: {}",
            store,
            config
                .crawler
                .condition
                .map(|c| c.as_str())
                .unwrap_or("none")
        );

        let outcome = loop {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, ending crawl before page {}", self.state.page);
                self.state.transition(CrawlPhase::Cancelled)?;
                break Outcome::Cancelled;
            }

            let page = self.state.page;
            self.state.transition(CrawlPhase::FetchingPage)?;
            tracing::info!("Processing page {}", page);

            let fetched = match self.fetcher.fetch(store, page).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    tracing::error!("Failed to fetch page {}: {}", page, error.message);
                    self.state.transition(CrawlPhase::Aborted)?;
                    break Outcome::Aborted { page, error };
                }
            };

            tracing::debug!("Fetched page {} from {}", fetched.page, fetched.url);
            self.state.transition(CrawlPhase::Parsing)?;
            let listing = parse_listing(&fetched.html, &fetched.url);
            tracing::info!("Found {} items on page {}", listing.items.len(), page);

            self.state.items_found += listing.items.len() as u64;
            self.state.items_skipped += listing.skipped.len() as u64;

            self.state.transition(CrawlPhase::FilteringAndWriting)?;
            let written = self.persist_page(store, listing.items).await;
            tracing::info!("Extracted {} new items from page {}", written, page);

            self.state.finish_page();

            if !listing.has_next_page {
                tracing::info!("No more pages to process");
                self.state.transition(CrawlPhase::Done)?;
                break Outcome::Done;
            }

            if self.state.pages_visited >= config.crawler.max_pages {
                tracing::warn!(
                    "Reached the page limit ({}), stopping although more pages exist",
                    config.crawler.max_pages
                );
                self.state.transition(CrawlPhase::Done)?;
                break Outcome::Done;
            }

            tracing::info!("Found next page: {}", self.state.page);
        };

        debug_assert!(self.state.phase().is_terminal());

        let report = CrawlReport {
            store: store.to_string(),
            outcome,
            pages_visited: self.state.pages_visited,
            items_written: self.state.items_written,
            items_found: self.state.items_found,
            items_filtered_out: self.state.items_filtered_out,
            items_skipped: self.state.items_skipped,
            write_failures: self.state.write_failures,
            elapsed: start_time.elapsed(),
        };

        match &report.outcome {
            Outcome::Aborted { page, error } => tracing::error!(
                "Crawl aborted on page {}: {}. Processed {} pages with {} total items.",
                page,
                error.message,
                report.pages_visited,
                report.items_written
            ),
            _ => tracing::info!(
                "Crawl completed for store '{}'. Processed {} pages with {} total items.",
                store,
                report.pages_visited,
                report.items_written
            ),
        }

        Ok(report)
    }

    /// Filters the records of one page and writes the survivors
    ///
    /// Returns once every dispatched write has finished. Write failures are
    /// logged and counted; they never stop the crawl.
    async fn persist_page(&mut self, store: &str, items: Vec<ItemRecord>) -> u64 {
        let condition = self.config.crawler.condition.map(|c| c.as_str());

        let (accepted, rejected): (Vec<ItemRecord>, Vec<ItemRecord>) =
            items.into_iter().partition(|item| matches(item, condition));

        for item in &rejected {
            tracing::debug!(
                "Skipping item {} with condition '{}' (filter: '{}')",
                item.item_id,
                item.condition,
                condition.unwrap_or_default()
            );
        }
        self.state.items_filtered_out += rejected.len() as u64;

        if accepted.is_empty() {
            return 0;
        }

        tracing::info!("Saving {} items", accepted.len());

        let writer = &self.writer;
        let results: Vec<_> = stream::iter(accepted)
            .map(|item| {
                let item_id = item.item_id.clone();
                async move { (item_id, writer.write(store, item).await) }
            })
            .buffer_unordered(self.config.crawler.max_concurrent_writes)
            .collect()
            .await;

        let mut written = 0;
        for (item_id, result) in results {
            match result {
                Ok(path) => {
                    tracing::debug!("Saved item {} to {}", item_id, path.display());
                    written += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to save item {}: {}", item_id, e);
                    self.state.write_failures += 1;
                }
            }
        }

        self.state.items_written += written;
        written
    }
}
