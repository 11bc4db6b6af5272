//! Statistics over stored records
//!
//! This module provides functionality for summarising the records already
//! persisted for a store, without touching the network.

use crate::storage::list_records;
use crate::CrawlerError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Summary of the records stored for one store
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Store name
    pub store: String,

    /// Directory holding the store's records
    pub store_dir: PathBuf,

    /// Number of record files
    pub records: u64,

    /// Combined size of the record files in bytes
    pub total_bytes: u64,

    /// Modification time of the oldest record
    pub oldest: Option<DateTime<Local>>,

    /// Modification time of the most recent record
    pub newest: Option<DateTime<Local>>,
}

/// Loads statistics for `store` below `data_dir`
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Statistics (all zero for a store never crawled)
/// * `Err(CrawlerError)` - The record directory could not be read
pub fn load_statistics(data_dir: &Path, store: &str) -> Result<StoreStatistics, CrawlerError> {
    let mut stats = StoreStatistics {
        store: store.to_string(),
        store_dir: data_dir.join(store),
        records: 0,
        total_bytes: 0,
        oldest: None,
        newest: None,
    };

    for path in list_records(data_dir, store)? {
        let metadata = std::fs::metadata(&path)?;
        stats.records += 1;
        stats.total_bytes += metadata.len();

        if let Ok(modified) = metadata.modified() {
            let modified: DateTime<Local> = modified.into();
            stats.oldest = Some(stats.oldest.map_or(modified, |t| t.min(modified)));
            stats.newest = Some(stats.newest.map_or(modified, |t| t.max(modified)));
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics: {} ===\n", stats.store);

    println!("Records:");
    println!("  Directory: {}", stats.store_dir.display());
    println!("  Stored items: {}", stats.records);
    println!("  Total size: {} bytes", stats.total_bytes);

    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!("  Oldest record: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
        println!("  Newest record: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }
}
