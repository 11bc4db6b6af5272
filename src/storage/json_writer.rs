//! JSON record files
//!
//! Records are written to a temporary sibling first and then renamed over the
//! target, so a reader never observes a half-written record and two writes of
//! the same item ID resolve to whichever finished last.

use crate::listing::ItemRecord;
use crate::storage::{record_path, RecordWriter, RECORD_EXTENSION};
use crate::WriteError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

/// Writes each record as a pretty-printed JSON file
#[derive(Debug)]
pub struct JsonFileWriter {
    data_dir: PathBuf,
    sequence: AtomicU64,
}

impl JsonFileWriter {
    /// Creates a writer storing records below `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Base directory of all stores
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn temp_path(&self, target: &Path, item_id: &str) -> PathBuf {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        target.with_file_name(format!(".{}.{}.{}.tmp", item_id, RECORD_EXTENSION, n))
    }
}

/// Encodes a record as JSON with four-space indentation
pub fn encode_record(record: &ItemRecord) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut serializer)?;
    Ok(buf)
}

impl RecordWriter for JsonFileWriter {
    async fn prepare(&self, store: &str) -> Result<(), WriteError> {
        let dir = self.data_dir.join(store);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| WriteError { path: dir, source })
    }

    async fn write(&self, store: &str, record: ItemRecord) -> Result<PathBuf, WriteError> {
        let path = record_path(&self.data_dir, store, &record.item_id);

        let bytes = match encode_record(&record) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(WriteError {
                    path,
                    source: io::Error::from(e),
                })
            }
        };

        let temp = self.temp_path(&path, &record.item_id);

        if let Err(source) = write_file(&temp, &bytes).await {
            discard(&temp).await;
            return Err(WriteError { path, source });
        }

        if let Err(source) = tokio::fs::rename(&temp, &path).await {
            discard(&temp).await;
            return Err(WriteError { path, source });
        }

        Ok(path)
    }
}

/// Writes `bytes` to a fresh file at `path`; the handle is closed on return
async fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Removes a leftover temporary file, ignoring errors
async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}
