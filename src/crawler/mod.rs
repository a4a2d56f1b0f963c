//! Crawler module for fetching, recovery and crawl coordination
//!
//! This module contains the core crawling logic, including:
//! - Single-shot fetching with blocked/network classification
//! - Backoff and identity-reset policy
//! - Retrying fetches built from the two
//! - The pagination loop that drives a crawl

mod coordinator;
mod endpoints;
mod fetcher;
mod identity;
mod recovery;
mod retry;

pub use coordinator::{run_crawl, Coordinator, CoordinatorParts};
pub use endpoints::Endpoints;
pub use fetcher::{
    build_http_client, BlockDetector, BlockReason, FetchError, FetchOutcome, HttpResponse,
    PageFetcher, PageKind, ReqwestTransport, Transport,
};
pub use identity::{CommandReset, IdentityReset, NoopReset, Sleeper, TokioSleeper};
pub use recovery::{FailureKind, RecoveryAction, RecoveryController, RecoveryPolicy};
pub use retry::{FetchStats, RetryExhausted, RetryingFetch};
