//! Storage module for persisting captured records
//!
//! This module handles everything durable about a crawl:
//! - Loading the ids already captured by earlier runs (the dedup set)
//! - Appending newly captured records without disturbing earlier rows
//! - Repairing a trailing partial row after an interrupted run
//! - Run bookkeeping for the SQLite backend

mod csv_store;
mod schema;
mod sqlite;
mod traits;

pub use csv_store::CsvStorage;
pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the record store described by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
///
/// # Returns
///
/// * `Ok(Box<dyn RecordStore>)` - Successfully opened store
/// * `Err(StorageError)` - Failed to open or repair the store
pub fn open_store(config: &OutputConfig) -> StorageResult<Box<dyn RecordStore>> {
    let path = Path::new(&config.path);
    match config.resolved_format() {
        OutputFormat::Csv => Ok(Box::new(CsvStorage::open(path)?)),
        OutputFormat::Sqlite => Ok(Box::new(SqliteStorage::new(path)?)),
    }
}

/// Counts the records in an existing store without modifying it
///
/// Unlike [`open_store`], this never creates the file, repairs a partial
/// CSV row, or touches SQLite run bookkeeping.
///
/// # Returns
///
/// * `Ok(Some(count))` - The store exists and was counted
/// * `Ok(None)` - Nothing exists at the configured path
/// * `Err(StorageError)` - The store exists but could not be read
pub fn count_existing(config: &OutputConfig) -> StorageResult<Option<u64>> {
    let path = Path::new(&config.path);
    if !path.exists() {
        return Ok(None);
    }

    let count = match config.resolved_format() {
        OutputFormat::Csv => csv_store::count_rows(path)?,
        OutputFormat::Sqlite => SqliteStorage::open_read_only(path)?.count_records()?,
    };
    Ok(Some(count))
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}
