//! Storage module for persisting item records
//!
//! Every item is stored as its own JSON document at
//! `<data_dir>/<store>/<item_id>.json`. This module handles:
//! - The `RecordWriter` seam the coordinator writes through
//! - Atomic, idempotent JSON record files
//! - Listing the records already stored for a store

mod json_writer;
mod traits;

pub use json_writer::{encode_record, JsonFileWriter};
pub use traits::RecordWriter;

use std::path::{Path, PathBuf};

/// File extension of stored records
pub const RECORD_EXTENSION: &str = "json";

/// Path of the record for `item_id` of `store` under `data_dir`
pub fn record_path(data_dir: &Path, store: &str, item_id: &str) -> PathBuf {
    data_dir
        .join(store)
        .join(format!("{}.{}", item_id, RECORD_EXTENSION))
}

/// Lists the record files stored for `store`
///
/// A store that has never been crawled has no records; that is not an error.
pub fn list_records(data_dir: &Path, store: &str) -> std::io::Result<Vec<PathBuf>> {
    let store_dir = data_dir.join(store);
    if !store_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(&store_dir)? {
        let path = entry?.path();
        let is_record = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == RECORD_EXTENSION);
        if is_record {
            records.push(path);
        }
    }

    records.sort();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_path() {
        let path = record_path(Path::new("data"), "garlandcomputer", "12345");
        assert_eq!(path, Path::new("data/garlandcomputer/12345.json"));
    }

    #[test]
    fn test_list_records_missing_store() {
        let dir = TempDir::new().unwrap();
        let records = list_records(dir.path(), "nobody").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_list_records_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join("shop");
        std::fs::create_dir_all(&store_dir).unwrap();
        std::fs::write(store_dir.join("2.json"), "{}").unwrap();
        std::fs::write(store_dir.join("1.json"), "{}").unwrap();
        std::fs::write(store_dir.join("notes.txt"), "x").unwrap();
        std::fs::write(store_dir.join(".3.json.tmp"), "x").unwrap();

        let records = list_records(dir.path(), "shop").unwrap();
        assert_eq!(
            records,
            vec![store_dir.join("1.json"), store_dir.join("2.json")]
        );
    }
}
