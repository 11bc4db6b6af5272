//! Record writer trait
//!
//! The coordinator persists records only through this trait, so the crawl loop
//! can run against the filesystem or against an in-memory writer in tests.

use crate::listing::ItemRecord;
use crate::WriteError;
use std::future::Future;
use std::path::PathBuf;

/// Destination for extracted item records
///
/// Implementations must be safe to call concurrently for distinct records:
/// the coordinator has up to `max_concurrent_writes` writes in flight.
pub trait RecordWriter {
    /// Prepares the destination of `store` (e.g. creates its directory)
    ///
    /// Called once before the first page is fetched.
    fn prepare(&self, store: &str) -> impl Future<Output = Result<(), WriteError>> + Send {
        let _ = store;
        async { Ok(()) }
    }

    /// Persists `record` for `store`, replacing any record with the same ID
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the record was stored
    /// * `Err(WriteError)` - The record could not be stored
    fn write(
        &self,
        store: &str,
        record: ItemRecord,
    ) -> impl Future<Output = Result<PathBuf, WriteError>> + Send;
}
