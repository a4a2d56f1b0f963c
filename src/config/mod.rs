//! Configuration module for Catalog-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Listing pages come from: {}", config.crawler.list_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BlockingConfig, Config, CrawlerConfig, DetailMode, HttpConfig, OutputConfig, OutputFormat,
    RecoveryConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
