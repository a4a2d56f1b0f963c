//! Storage traits and error types
//!
//! This module defines the trait interface for record store backends and
//! associated error types.

use crate::extract::EnrichedRecord;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Rejects a batch containing a record without an id
pub(crate) fn ensure_ids(records: &[EnrichedRecord]) -> StorageResult<()> {
    match records.iter().find(|r| r.id().trim().is_empty()) {
        Some(record) => Err(StorageError::InvalidRecord(format!(
            "record '{}' has no id",
            record.listing.title
        ))),
        None => Ok(()),
    }
}

/// Durable, append-only store of captured records
///
/// A store plays two roles for the crawler: it is the dedup source read once
/// at startup, and the sink every newly captured record is appended to.
/// Backends must never rewrite or drop rows that were already written, and a
/// batch interrupted mid-write must not damage earlier rows.
pub trait RecordStore: Send {
    // ===== Dedup =====

    /// Reads the ids of every record already in the store
    fn load_ids(&self) -> StorageResult<HashSet<String>>;

    /// Counts the records currently in the store
    fn count_records(&self) -> StorageResult<u64>;

    // ===== Persistence =====

    /// Appends records and flushes them to the backing file
    ///
    /// Records with an empty id are rejected with [`StorageError::InvalidRecord`]
    /// before anything is written.
    fn append(&mut self, records: &[EnrichedRecord]) -> StorageResult<()>;

    // ===== Run Bookkeeping =====

    /// Records the start of a crawl run
    fn begin_run(&mut self, _config_hash: &str) -> StorageResult<()> {
        Ok(())
    }

    /// Records the end of the current crawl run
    fn finish_run(&mut self, _records_written: u64) -> StorageResult<()> {
        Ok(())
    }
}
