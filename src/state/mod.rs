//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the dedup set and current page, owned by the coordinator
//! - `CrawlPhase`: the phases of the pagination state machine
//! - `TerminationReason`: why a crawl stopped

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use phase::{CrawlPhase, TerminationReason};
