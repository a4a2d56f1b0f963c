//! Output module for run reports and store statistics
//!
//! This module handles:
//! - The counters collected while a crawl runs
//! - Printing the end-of-run summary
//! - Summarizing an existing store for `--stats`

pub mod stats;

pub use stats::{load_statistics, print_report, print_statistics, CrawlReport, StoreStatistics};
