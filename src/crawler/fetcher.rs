//! HTTP fetcher implementation
//!
//! This module handles the single-request side of crawling:
//! - Building the HTTP client with the configured user agent and timeouts
//! - The [`Transport`] seam the crawler sends requests through
//! - Classifying each response as content, blocked, or network failure
//!
//! Nothing here sleeps, retries, or logs. That is the job of
//! [`RetryingFetch`](crate::crawler::RetryingFetch).

use crate::config::{BlockingConfig, HttpConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Raw HTTP response handed back by a transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Other(String),
}

/// Sends a single GET request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Which kind of page a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    List,
    Detail,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list page"),
            Self::Detail => write!(f, "detail page"),
        }
    }
}

/// Why a response was classified as blocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// The response status is one the target uses to refuse service
    Status(u16),
    /// The body contains a configured blocked signature
    Marker(String),
    /// The body lacks the structural anchor every genuine page carries
    MissingAnchor(String),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {}", status),
            Self::Marker(marker) => write!(f, "marker '{}'", marker),
            Self::MissingAnchor(anchor) => write!(f, "missing anchor '{}'", anchor),
        }
    }
}

/// Result of a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Genuine page content
    Ok(String),
    /// The target refused service
    Blocked(BlockReason),
    /// Timeout, connection failure, or unexpected status
    NetworkError(FetchError),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_error)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Other(e.to_string())
    }
}

/// Recognizes anti-bot responses
#[derive(Debug, Clone)]
pub struct BlockDetector {
    markers: Vec<String>,
    statuses: Vec<u16>,
    list_anchor: Option<String>,
    detail_anchor: Option<String>,
}

impl BlockDetector {
    pub fn new(config: &BlockingConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            statuses: config.blocked_statuses.clone(),
            list_anchor: config.list_anchor.clone(),
            detail_anchor: config.detail_anchor.clone(),
        }
    }

    /// Classifies a transport result for a page of the given kind
    pub fn classify(
        &self,
        result: Result<HttpResponse, FetchError>,
        kind: PageKind,
    ) -> FetchOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => return FetchOutcome::NetworkError(e),
        };

        if self.statuses.contains(&response.status) {
            return FetchOutcome::Blocked(BlockReason::Status(response.status));
        }

        if !(200..300).contains(&response.status) {
            return FetchOutcome::NetworkError(FetchError::Status(response.status));
        }

        if let Some(marker) = self.markers.iter().find(|m| response.body.contains(m.as_str())) {
            return FetchOutcome::Blocked(BlockReason::Marker(marker.clone()));
        }

        let anchor = match kind {
            PageKind::List => &self.list_anchor,
            PageKind::Detail => &self.detail_anchor,
        };
        if let Some(anchor) = anchor {
            if !response.body.contains(anchor.as_str()) {
                return FetchOutcome::Blocked(BlockReason::MissingAnchor(anchor.clone()));
            }
        }

        FetchOutcome::Ok(response.body)
    }
}

/// Performs one request and classifies the outcome
pub struct PageFetcher {
    transport: Box<dyn Transport>,
    detector: BlockDetector,
}

impl PageFetcher {
    pub fn new(transport: Box<dyn Transport>, detector: BlockDetector) -> Self {
        Self {
            transport,
            detector,
        }
    }

    /// Fetches `url` once
    pub async fn fetch(&self, url: &str, kind: PageKind) -> FetchOutcome {
        let result = self.transport.get(url).await;
        self.detector.classify(result, kind)
    }
}
