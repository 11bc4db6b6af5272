//! Listing data model and crawl progress tracking
//!
//! # Components
//!
//! - `ItemRecord`: one extracted storefront listing
//! - `Condition`: the condition labels a crawl may be filtered on
//! - `CrawlPhase`: the orchestrator's state machine
//! - `CrawlState`: per-run page index and counters

mod crawl_state;
mod item;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use item::{extract_item_id, Condition, ItemRecord};
pub use phase::CrawlPhase;
