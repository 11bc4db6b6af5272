use crate::listing::CrawlPhase;
use crate::CrawlerError;

/// Progress of a single crawl run
///
/// Owned by the coordinator alone; nothing else reads or mutates it while the
/// crawl is running.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Index of the page currently being (or about to be) fetched, 1-based
    pub page: u32,

    /// Pages fetched and parsed
    pub pages_visited: u32,

    /// Records persisted successfully
    pub items_written: u64,

    /// Records emitted by the parser
    pub items_found: u64,

    /// Records rejected by the condition filter
    pub items_filtered_out: u64,

    /// Listing containers the parser had to skip
    pub items_skipped: u64,

    /// Records whose write failed
    pub write_failures: u64,

    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state of a run that has not fetched anything yet
    pub fn new() -> Self {
        Self {
            page: 1,
            pages_visited: 0,
            items_written: 0,
            items_found: 0,
            items_filtered_out: 0,
            items_skipped: 0,
            write_failures: 0,
            phase: CrawlPhase::Init,
        }
    }

    /// The current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn transition(&mut self, next: CrawlPhase) -> crate::Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!("Phase {} -> {} (page {})", self.phase, next, self.page);
        self.phase = next;
        Ok(())
    }

    /// Records a fetched and parsed page and moves the index forward
    pub fn finish_page(&mut self) {
        self.pages_visited += 1;
        self.page += 1;
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
