//! Output module for run reports and store statistics
//!
//! This module handles:
//! - Printing the report of a finished crawl
//! - The one-line run summary shared by the console and the log
//! - Statistics over the records already stored for a store

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};

use crate::crawler::{CrawlReport, Outcome};

/// One-line summary of a run
///
/// Always states pages visited and items written; an aborted run also names
/// the failing page and the cause.
pub fn summary_line(report: &CrawlReport) -> String {
    match &report.outcome {
        Outcome::Done => format!(
            "Crawl completed: {} pages visited, {} items written",
            report.pages_visited, report.items_written
        ),
        Outcome::Aborted { page, error } => format!(
            "Crawl aborted on page {} ({}): {} pages visited, {} items written",
            page, error.message, report.pages_visited, report.items_written
        ),
        Outcome::Cancelled => format!(
            "Crawl cancelled: {} pages visited, {} items written",
            report.pages_visited, report.items_written
        ),
    }
}

/// Prints a run report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report: {} ===\n", report.store);

    println!("Pages:");
    println!("  Visited: {}", report.pages_visited);
    println!("  Final phase: {}", report.outcome.phase());
    println!();

    println!("Items:");
    println!("  Found: {}", report.items_found);
    println!("  Filtered out: {}", report.items_filtered_out);
    println!("  Skipped (malformed): {}", report.items_skipped);
    println!("  Write failures: {}", report.write_failures);
    println!("  Written: {}", report.items_written);
    println!();

    println!("Elapsed: {:.1}s\n", report.elapsed.as_secs_f64());
    println!("{}", summary_line(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchError, FetchErrorKind};
    use std::time::Duration;

    fn report(outcome: Outcome) -> CrawlReport {
        CrawlReport {
            store: "shop".to_string(),
            outcome,
            pages_visited: 3,
            items_written: 120,
            items_found: 130,
            items_filtered_out: 8,
            items_skipped: 1,
            write_failures: 2,
            elapsed: Duration::from_secs(4),
        }
    }

    #[test]
    fn test_summary_line_done() {
        let line = summary_line(&report(Outcome::Done));
        assert_eq!(line, "Crawl completed: 3 pages visited, 120 items written");
    }

    #[test]
    fn test_summary_line_aborted_names_page_and_cause() {
        let error = FetchError::new(4, FetchErrorKind::Status(503), "HTTP 503");
        let line = summary_line(&report(Outcome::Aborted { page: 4, error }));
        assert!(line.contains("page 4"));
        assert!(line.contains("HTTP 503"));
        assert!(line.contains("3 pages visited"));
        assert!(line.contains("120 items written"));
    }

    #[test]
    fn test_summary_line_cancelled() {
        let line = summary_line(&report(Outcome::Cancelled));
        assert!(line.starts_with("Crawl cancelled"));
    }
}
