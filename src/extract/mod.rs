//! Extraction of candidate records from raw page content
//!
//! The crawl engine never looks inside page markup itself. Everything
//! layout-specific lives behind the [`Extractor`] trait so that a change in
//! the target's markup only touches the extractor.

mod records;
mod site;

pub use records::{DetailRecord, EnrichedRecord, ListingRecord, RECORD_COLUMNS};
pub use site::{clean_html, SiteExtractor};

/// Maps raw page content to candidate records
///
/// Implementations must be pure: the same content always yields the same
/// records, and malformed content yields fewer records rather than an error.
pub trait Extractor: Send + Sync {
    /// Extracts every listing on a list page, in page order
    fn extract_listings(&self, content: &str) -> Vec<ListingRecord>;

    /// Extracts the detail record from a detail page
    ///
    /// Returns `None` when the page lacks the detail structure entirely, which
    /// the crawler treats as incomplete content worth retrying.
    fn extract_detail(&self, content: &str) -> Option<DetailRecord>;
}
