//! Retrying fetch: page fetcher plus recovery policy
//!
//! # Retry Logic
//!
//! | Outcome | Action |
//! |---------|--------|
//! | Content that parses | Return it, clear the failure streak |
//! | Content that does not parse | Back off like a network error |
//! | Blocked | Reset identity, wait `block-wait-secs` |
//! | Network error, streak <= K | Exponential backoff, no reset |
//! | Network error, streak > K | Reset identity, wait `escalated-wait-secs` |
//!
//! An attempt budget only counts network errors and incomplete content. A
//! blocked response is always retried, so a bounded fetch never gives up on an
//! item merely because the target refused service.
//!
//! The recovery action is carried out even after the final permitted attempt,
//! so the next request does not go out under a burned identity.

use crate::crawler::fetcher::{FetchOutcome, PageFetcher, PageKind};
use crate::crawler::identity::{IdentityReset, Sleeper};
use crate::crawler::recovery::{FailureKind, RecoveryController};
use std::sync::Arc;
use thiserror::Error;

/// Counters describing the fetch traffic of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub requests: u64,
    pub blocked: u64,
    pub network_errors: u64,
    pub incomplete: u64,
    pub identity_resets: u64,
    pub exhausted: u64,
}

/// Returned when a bounded fetch runs out of attempts
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("gave up on {url} after {attempts} attempts")]
pub struct RetryExhausted {
    pub url: String,
    pub attempts: u32,
}

/// Fetches a URL until it yields parseable content
pub struct RetryingFetch {
    fetcher: PageFetcher,
    controller: RecoveryController,
    reset: Box<dyn IdentityReset>,
    sleeper: Arc<dyn Sleeper>,
    stats: FetchStats,
}

impl RetryingFetch {
    pub fn new(
        fetcher: PageFetcher,
        controller: RecoveryController,
        reset: Box<dyn IdentityReset>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            fetcher,
            controller,
            reset,
            sleeper,
            stats: FetchStats::default(),
        }
    }

    /// Fetches `url` and parses it, retrying on any failure
    ///
    /// `parse` returning `None` marks the content as incomplete, which counts
    /// as a failed attempt. Blocked responses are never charged against
    /// `max_attempts`. With `max_attempts` set to `None` the fetch never gives
    /// up.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `kind` - Which structural anchor the page must carry
    /// * `max_attempts` - Budget of non-blocked failures, or `None` for unbounded
    /// * `parse` - Turns genuine content into a value
    pub async fn fetch_with_retry<T, F>(
        &mut self,
        url: &str,
        kind: PageKind,
        max_attempts: Option<u32>,
        mut parse: F,
    ) -> Result<T, RetryExhausted>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let mut attempt = 0u32;
        let mut charged = 0u32;

        loop {
            attempt += 1;
            self.stats.requests += 1;
            tracing::debug!("Fetching {} {} (attempt {})", kind, url, attempt);

            let failure = match self.fetcher.fetch(url, kind).await {
                FetchOutcome::Ok(content) => match parse(&content) {
                    Some(value) => {
                        self.controller.on_success();
                        return Ok(value);
                    }
                    None => {
                        self.stats.incomplete += 1;
                        tracing::warn!("Incomplete {} at {} (attempt {})", kind, url, attempt);
                        FailureKind::Incomplete
                    }
                },
                FetchOutcome::Blocked(reason) => {
                    self.stats.blocked += 1;
                    tracing::warn!("Blocked on {} ({}), attempt {}", url, reason, attempt);
                    FailureKind::Blocked
                }
                FetchOutcome::NetworkError(e) => {
                    self.stats.network_errors += 1;
                    tracing::warn!("Network error on {}: {} (attempt {})", url, e, attempt);
                    FailureKind::Network
                }
            };

            if failure != FailureKind::Blocked {
                charged += 1;
            }

            let action = self.controller.on_failure(failure);
            if action.reset_circuit {
                self.stats.identity_resets += 1;
                self.reset.reset_identity().await;
            }
            if !action.wait.is_zero() {
                tracing::debug!("Waiting {:?} before retrying", action.wait);
                self.sleeper.sleep(action.wait).await;
            }

            if let Some(max) = max_attempts {
                if charged >= max {
                    self.stats.exhausted += 1;
                    return Err(RetryExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                    });
                }
            }
        }
    }

    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }
}
