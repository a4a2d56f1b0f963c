//! Run and store statistics
//!
//! This module provides the per-run `CrawlReport` the coordinator fills in,
//! plus the store summary shown by `--stats`.

use crate::crawler::FetchStats;
use crate::state::TerminationReason;
use crate::config::OutputConfig;
use crate::storage::{count_existing, StorageResult};
use std::time::Duration;

/// Counters for a single crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// List pages that yielded content
    pub pages_fetched: u64,

    /// Listings extracted across all pages
    pub listings_seen: u64,

    /// Listings skipped because their id was already captured
    pub duplicates_skipped: u64,

    /// Records appended to the store
    pub records_written: u64,

    /// Listings dropped because their detail page could not be fetched
    pub records_skipped: u64,

    /// Listings persisted without detail after a failed detail fetch
    pub details_failed: u64,

    /// Fetch traffic counters from the retry layer
    pub fetch: FetchStats,

    pub termination: Option<TerminationReason>,

    pub elapsed: Duration,
}

/// Prints the end-of-run summary to stdout
///
/// # Arguments
///
/// * `report` - The report of the finished run
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    if let Some(reason) = &report.termination {
        println!("Stopped: {}", reason);
    }
    println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    println!("Pages:");
    println!("  List pages fetched: {}", report.pages_fetched);
    println!("  Listings seen: {}", report.listings_seen);
    println!("  Already captured: {}", report.duplicates_skipped);
    println!();

    println!("Records:");
    println!("  Written: {}", report.records_written);
    if report.records_skipped > 0 {
        println!("  Skipped (detail unavailable): {}", report.records_skipped);
    }
    if report.details_failed > 0 {
        println!("  Written without detail: {}", report.details_failed);
    }
    println!();

    println!("Fetching:");
    println!("  Requests: {}", report.fetch.requests);
    println!("  Blocked: {}", report.fetch.blocked);
    println!("  Network errors: {}", report.fetch.network_errors);
    println!("  Incomplete pages: {}", report.fetch.incomplete);
    println!("  Identity resets: {}", report.fetch.identity_resets);
    println!();

    println!("Total records written: {}", report.records_written);
}

/// Summary of an existing record store
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    pub total_records: u64,
}

/// Loads statistics from the configured record store
///
/// The store is only read. A missing store is reported as `None` rather than
/// created.
///
/// # Returns
///
/// * `Ok(Some(StoreStatistics))` - Successfully counted
/// * `Ok(None)` - No store exists at the configured path
/// * `Err(StorageError)` - Failed to read the store
pub fn load_statistics(config: &OutputConfig) -> StorageResult<Option<StoreStatistics>> {
    Ok(count_existing(config)?.map(|total_records| StoreStatistics { total_records }))
}

pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");
    println!("Records captured: {}", stats.total_records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{EnrichedRecord, ListingRecord};
    use crate::storage::{CsvStorage, RecordStore};

    #[test]
    fn test_report_defaults() {
        let report = CrawlReport::default();
        assert_eq!(report.records_written, 0);
        assert!(report.termination.is_none());
        assert_eq!(report.fetch, FetchStats::default());
    }

    #[test]
    fn test_load_statistics_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let mut store = CsvStorage::open(&path).unwrap();

        let records: Vec<_> = ["1", "2", "3"]
            .iter()
            .map(|id| {
                EnrichedRecord::new(
                    ListingRecord {
                        id: id.to_string(),
                        ..Default::default()
                    },
                    None,
                    String::new(),
                )
            })
            .collect();
        store.append(&records).unwrap();

        let config = OutputConfig {
            path: path.to_string_lossy().into_owned(),
            format: None,
        };
        let stats = load_statistics(&config).unwrap().unwrap();
        assert_eq!(stats.total_records, 3);
    }

    #[test]
    fn test_statistics_for_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-crawled.csv");
        let config = OutputConfig {
            path: path.to_string_lossy().into_owned(),
            format: None,
        };

        assert!(load_statistics(&config).unwrap().is_none());
        assert!(!path.exists());
    }
}
