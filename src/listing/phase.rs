/// Crawl phase definitions for the orchestrator's state machine
///
/// A crawl moves `Init → FetchingPage → Parsing → FilteringAndWriting` and then
/// either loops back to `FetchingPage` or stops in one of the terminal phases.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Configuration is being validated and output directories prepared
    Init,

    /// A listing page is being requested
    FetchingPage,

    /// The fetched HTML is being turned into item records
    Parsing,

    /// Records are being filtered and persisted
    FilteringAndWriting,

    // ===== Terminal Phases =====
    /// The last page has been processed
    Done,

    /// A page fetch failed; counts gathered so far are kept
    Aborted,

    /// The stop flag was raised between two pages
    Cancelled,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Cancelled)
    }

    /// Returns true if the crawl ended without error
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (self, next),
            (Init, FetchingPage)
                | (Init, Cancelled)
                | (FetchingPage, Parsing)
                | (FetchingPage, Aborted)
                | (Parsing, FilteringAndWriting)
                | (FilteringAndWriting, FetchingPage)
                | (FilteringAndWriting, Done)
                | (FilteringAndWriting, Cancelled)
        )
    }

    /// Short lowercase name, used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::FetchingPage => "fetching_page",
            Self::Parsing => "parsing",
            Self::FilteringAndWriting => "filtering_and_writing",
            Self::Done => "done",
            Self::Aborted => "aborted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
