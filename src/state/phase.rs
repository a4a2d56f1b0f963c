/// Crawl phase definitions
///
/// The coordinator drives pagination as a small state machine over these
/// phases. Per-item filtering, enrichment and persistence all happen inside
/// `Process`.
use crate::extract::ListingRecord;
use std::fmt;

/// Current phase of the pagination loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Fetch list page `page`; `empty_streak` counts earlier empty fetches of it
    FetchList { page: u32, empty_streak: u32 },

    /// Filter, enrich and persist the listings of `page`
    Process {
        page: u32,
        listings: Vec<ListingRecord>,
    },

    /// Politeness delay before moving on to `next_page`
    Throttle { next_page: u32 },

    /// The crawl is over
    Terminated(TerminationReason),
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The page yielded no listings on every confirmation fetch
    EmptyPage(u32),
    /// The configured last page was processed
    LastPage(u32),
    /// A bounded list fetch ran out of attempts
    ListUnavailable(u32),
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage(page) => write!(f, "page {} was empty (end of catalog)", page),
            Self::LastPage(page) => write!(f, "reached last page {}", page),
            Self::ListUnavailable(page) => write!(f, "page {} could not be fetched", page),
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchList { page, .. } => write!(f, "fetch-list({})", page),
            Self::Process { page, listings } => {
                write!(f, "process({}, {} listings)", page, listings.len())
            }
            Self::Throttle { next_page } => write!(f, "throttle(-> {})", next_page),
            Self::Terminated(reason) => write!(f, "terminated: {}", reason),
        }
    }
}
