//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the pagination loop that ties the crawl together:
//! - Loading the dedup set from the record store
//! - Fetching list pages until the catalog ends
//! - Filtering, enriching and persisting each new listing
//! - Throttling between pages and reporting the run

use crate::config::{Config, CrawlerConfig, DetailMode};
use crate::crawler::endpoints::Endpoints;
use crate::crawler::fetcher::{BlockDetector, PageFetcher, PageKind, ReqwestTransport, Transport};
use crate::crawler::identity::{CommandReset, IdentityReset, NoopReset, Sleeper, TokioSleeper};
use crate::crawler::recovery::{RecoveryController, RecoveryPolicy};
use crate::crawler::retry::RetryingFetch;
use crate::extract::{DetailRecord, EnrichedRecord, Extractor, ListingRecord, SiteExtractor};
use crate::output::CrawlReport;
use crate::state::{CrawlPhase, CrawlState, TerminationReason};
use crate::storage::{open_store, RecordStore};
use crate::TrawlError;
use std::sync::Arc;
use std::time::Instant;

/// Collaborators a coordinator is assembled from
///
/// [`Coordinator::new`] builds the production set; tests supply fakes through
/// [`Coordinator::from_parts`].
pub struct CoordinatorParts {
    pub transport: Box<dyn Transport>,
    pub extractor: Arc<dyn Extractor>,
    pub store: Box<dyn RecordStore>,
    pub reset: Box<dyn IdentityReset>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    crawler: CrawlerConfig,
    endpoints: Endpoints,
    fetch: RetryingFetch,
    extractor: Arc<dyn Extractor>,
    store: Box<dyn RecordStore>,
    sleeper: Arc<dyn Sleeper>,
    state: CrawlState,
    report: CrawlReport,
    config_hash: String,
}

impl Coordinator {
    /// Creates a coordinator wired to the network and the configured store
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `config_hash` - Hash of the configuration file, recorded with the run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TrawlError)` - Failed to build the HTTP client or open the store
    pub fn new(config: &Config, config_hash: &str) -> Result<Self, TrawlError> {
        let reset: Box<dyn IdentityReset> = match config
            .recovery
            .reset_command
            .as_deref()
            .and_then(CommandReset::from_argv)
        {
            Some(command) => Box::new(command),
            None => Box::new(NoopReset),
        };

        let parts = CoordinatorParts {
            transport: Box::new(ReqwestTransport::new(&config.http)?),
            extractor: Arc::new(SiteExtractor::new()?),
            store: open_store(&config.output)?,
            reset,
            sleeper: Arc::new(TokioSleeper),
        };

        Self::from_parts(config, config_hash, parts)
    }

    /// Creates a coordinator from explicit collaborators
    pub fn from_parts(
        config: &Config,
        config_hash: &str,
        parts: CoordinatorParts,
    ) -> Result<Self, TrawlError> {
        let endpoints = Endpoints::new(&config.crawler)?;
        let fetcher = PageFetcher::new(parts.transport, BlockDetector::new(&config.blocking));
        let controller = RecoveryController::new(RecoveryPolicy::from_config(&config.recovery));
        let fetch = RetryingFetch::new(fetcher, controller, parts.reset, parts.sleeper.clone());

        Ok(Self {
            crawler: config.crawler.clone(),
            endpoints,
            fetch,
            extractor: parts.extractor,
            store: parts.store,
            sleeper: parts.sleeper,
            state: CrawlState::default(),
            report: CrawlReport::default(),
            config_hash: config_hash.to_string(),
        })
    }

    /// Runs the crawl until the catalog ends
    ///
    /// Network and content failures are absorbed by the retry layer; only
    /// storage failures abort the run.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl reached a terminal phase
    /// * `Err(TrawlError)` - A record could not be persisted
    pub async fn run(&mut self) -> Result<CrawlReport, TrawlError> {
        let start_time = Instant::now();

        self.store.begin_run(&self.config_hash)?;
        self.state = CrawlState::new(self.store.load_ids()?);
        tracing::info!(
            "Starting crawl at page {} ({} records already captured)",
            self.crawler.first_page,
            self.state.seen_count()
        );

        let mut phase = CrawlPhase::FetchList {
            page: self.crawler.first_page,
            empty_streak: 0,
        };

        loop {
            tracing::trace!("Phase: {}", phase);
            phase = match phase {
                CrawlPhase::FetchList { page, empty_streak } => {
                    self.fetch_list(page, empty_streak).await
                }
                CrawlPhase::Process { page, listings } => {
                    self.process_page(page, listings).await?;
                    self.next_after(page)
                }
                CrawlPhase::Throttle { next_page } => {
                    self.throttle().await;
                    CrawlPhase::FetchList {
                        page: next_page,
                        empty_streak: 0,
                    }
                }
                CrawlPhase::Terminated(reason) => {
                    self.report.termination = Some(reason);
                    break;
                }
            };
        }

        self.report.fetch = self.fetch.stats().clone();
        self.report.elapsed = start_time.elapsed();
        self.store.finish_run(self.report.records_written)?;

        tracing::info!(
            "Crawl finished at page {} ({}): {} records written in {:?}",
            self.state.current_page(),
            self.report
                .termination
                .map(|r| r.to_string())
                .unwrap_or_default(),
            self.report.records_written,
            self.report.elapsed
        );

        Ok(self.report.clone())
    }

    /// Current crawl state (dedup set and page)
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Fetches one list page and decides the next phase
    async fn fetch_list(&mut self, page: u32, empty_streak: u32) -> CrawlPhase {
        self.state.set_current_page(page);
        let url = self.endpoints.list_page(page);
        tracing::info!("Fetching list page {}", page);

        let extractor = self.extractor.as_ref();
        let result = self
            .fetch
            .fetch_with_retry(&url, PageKind::List, self.crawler.list_attempts, |content| {
                Some(extractor.extract_listings(content))
            })
            .await;

        let listings = match result {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!("Giving up on list page {}: {}", page, e);
                return CrawlPhase::Terminated(TerminationReason::ListUnavailable(page));
            }
        };

        if !listings.is_empty() {
            self.report.pages_fetched += 1;
            return CrawlPhase::Process { page, listings };
        }

        let empty_streak = empty_streak + 1;
        if empty_streak >= self.crawler.empty_page_confirmations {
            tracing::info!("Page {} has no listings, end of catalog", page);
            return CrawlPhase::Terminated(TerminationReason::EmptyPage(page));
        }

        tracing::warn!(
            "Page {} has no listings ({} of {} confirmations), fetching again",
            page,
            empty_streak,
            self.crawler.empty_page_confirmations
        );
        self.throttle().await;
        CrawlPhase::FetchList { page, empty_streak }
    }

    /// Filters, enriches and persists the listings of one page
    async fn process_page(
        &mut self,
        page: u32,
        listings: Vec<ListingRecord>,
    ) -> Result<(), TrawlError> {
        let found = listings.len();
        let written_before = self.report.records_written;
        self.report.listings_seen += found as u64;

        for mut listing in listings {
            // Ids are compared and stored trimmed so every backend agrees on them
            let trimmed = listing.id.trim();
            if trimmed.len() != listing.id.len() {
                listing.id = trimmed.to_string();
            }

            if listing.id.is_empty() {
                tracing::warn!("Skipping listing without an id on page {}", page);
                continue;
            }
            if self.state.is_seen(&listing.id) {
                tracing::debug!("Listing {} already captured", listing.id);
                self.report.duplicates_skipped += 1;
                continue;
            }

            let detail = match self.crawler.detail_mode {
                DetailMode::None => None,
                mode => match self.fetch_detail(&listing.id).await {
                    Some(detail) => Some(detail),
                    None if mode == DetailMode::Required => {
                        tracing::warn!("Skipping listing {}: detail unavailable", listing.id);
                        self.report.records_skipped += 1;
                        continue;
                    }
                    None => {
                        tracing::warn!("Saving listing {} without detail", listing.id);
                        self.report.details_failed += 1;
                        None
                    }
                },
            };

            let url = self.endpoints.asset(&listing.id);
            self.persist(EnrichedRecord::new(listing, detail, url))?;
        }

        tracing::info!(
            "Page {}: {} listings, {} new records ({} total captured)",
            page,
            found,
            self.report.records_written - written_before,
            self.state.seen_count()
        );

        Ok(())
    }

    async fn fetch_detail(&mut self, id: &str) -> Option<DetailRecord> {
        let url = self.endpoints.detail(id)?;
        let extractor = self.extractor.as_ref();
        let result = self
            .fetch
            .fetch_with_retry(
                &url,
                PageKind::Detail,
                Some(self.crawler.detail_attempts),
                |content| extractor.extract_detail(content),
            )
            .await;

        match result {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!("Detail for listing {} unavailable: {}", id, e);
                None
            }
        }
    }

    /// Appends one record and marks its id as captured
    fn persist(&mut self, record: EnrichedRecord) -> Result<(), TrawlError> {
        if let Err(e) = self.store.append(std::slice::from_ref(&record)) {
            tracing::error!("Failed to persist record {}: {}", record.id(), e);
            return Err(e.into());
        }

        self.state.mark_seen(record.id());
        self.report.records_written += 1;
        tracing::debug!("Saved record {}", record.id());
        Ok(())
    }

    fn next_after(&self, page: u32) -> CrawlPhase {
        match self.crawler.last_page {
            Some(last) if page >= last => CrawlPhase::Terminated(TerminationReason::LastPage(page)),
            _ => CrawlPhase::Throttle {
                next_page: page + 1,
            },
        }
    }

    async fn throttle(&self) {
        let delay = self.crawler.politeness_delay();
        if !delay.is_zero() {
            self.sleeper.sleep(delay).await;
        }
    }
}

/// Runs a complete crawl with the production collaborators
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file
///
/// # Example
///
/// ```no_run
/// use catalog_trawler::config::load_config_with_hash;
/// use catalog_trawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("trawler.toml"))?;
/// let report = run_crawl(&config, &hash).await?;
/// println!("{} records written", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlReport, TrawlError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockingConfig, HttpConfig, OutputConfig, RecoveryConfig};
    use crate::crawler::fetcher::{FetchError, HttpResponse};
    use crate::storage::{CsvStorage, StorageError};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const LIST: &str = "https://cars.test/list";
    const DETAIL: &str = "https://cars.test/detail";

    /// Serves fixed bodies by URL; unknown URLs get an empty catalog page
    #[derive(Default)]
    struct CatalogTransport {
        pages: HashMap<String, String>,
        /// Remaining blocked responses per URL before the real page is served
        blocks: Mutex<HashMap<String, u32>>,
        unreachable: HashSet<String>,
        hits: Mutex<HashMap<String, u32>>,
    }

    impl CatalogTransport {
        fn with_page(mut self, page: u32, ids: &[&str]) -> Self {
            let body = ids
                .iter()
                .map(|id| format!("listing:{}", id))
                .collect::<Vec<_>>()
                .join("\n");
            self.pages
                .insert(format!("{}?page={}", LIST, page), format!("catalog\n{}", body));
            self
        }

        fn with_detail(mut self, id: &str, body: &str) -> Self {
            self.pages
                .insert(format!("{}?id={}", DETAIL, id), body.to_string());
            self
        }

        fn blocked_first(self, url: &str, times: u32) -> Self {
            self.blocks.lock().unwrap().insert(url.to_string(), times);
            self
        }

        fn unreachable(mut self, url: &str) -> Self {
            self.unreachable.insert(url.to_string());
            self
        }
    }

    #[async_trait]
    impl Transport for Arc<CatalogTransport> {
        async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
            *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
            if self.unreachable.contains(url) {
                return Err(FetchError::Timeout);
            }
            if let Some(remaining) = self.blocks.lock().unwrap().get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Ok(HttpResponse {
                        status: 200,
                        body: "catalog Access Denied".to_string(),
                    });
                }
            }
            let body = self
                .pages
                .get(url)
                .cloned()
                .unwrap_or_else(|| "catalog".to_string());
            Ok(HttpResponse { status: 200, body })
        }
    }

    impl CatalogTransport {
        fn hits(&self, url: &str) -> u32 {
            self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    /// Listings are `listing:<id>` lines; a detail page is `model=<name>`
    struct LineExtractor;

    impl Extractor for LineExtractor {
        fn extract_listings(&self, content: &str) -> Vec<ListingRecord> {
            content
                .lines()
                .filter_map(|line| line.strip_prefix("listing:"))
                .map(|id| ListingRecord {
                    id: id.to_string(),
                    title: format!("Car {}", id),
                    ..Default::default()
                })
                .collect()
        }

        fn extract_detail(&self, content: &str) -> Option<DetailRecord> {
            content.strip_prefix("model=").map(|model| DetailRecord {
                model: model.to_string(),
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct CountingSleeper(AtomicU32);

    #[async_trait]
    impl Sleeper for CountingSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Store whose appends always fail
    struct ReadOnlyStore;

    impl RecordStore for ReadOnlyStore {
        fn load_ids(&self) -> crate::storage::StorageResult<HashSet<String>> {
            Ok(HashSet::new())
        }

        fn count_records(&self) -> crate::storage::StorageResult<u64> {
            Ok(0)
        }

        fn append(&mut self, _records: &[EnrichedRecord]) -> crate::storage::StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn create_test_config(mode: DetailMode) -> Config {
        Config {
            crawler: CrawlerConfig {
                list_url: LIST.to_string(),
                detail_url: DETAIL.to_string(),
                asset_url: "https://cars.test/safe".to_string(),
                asset_token: "tok".to_string(),
                page_param: "page".to_string(),
                id_param: "id".to_string(),
                first_page: 1,
                last_page: None,
                politeness_delay_ms: 100,
                detail_mode: mode,
                list_attempts: None,
                detail_attempts: 3,
                empty_page_confirmations: 2,
            },
            http: HttpConfig::default(),
            blocking: BlockingConfig {
                markers: vec!["Access Denied".to_string()],
                list_anchor: Some("catalog".to_string()),
                ..Default::default()
            },
            recovery: RecoveryConfig::default(),
            output: OutputConfig {
                path: "unused.csv".to_string(),
                format: None,
            },
        }
    }

    fn coordinator(
        config: &Config,
        transport: Arc<CatalogTransport>,
        store: Box<dyn RecordStore>,
        sleeper: Arc<CountingSleeper>,
    ) -> Coordinator {
        Coordinator::from_parts(
            config,
            "test-hash",
            CoordinatorParts {
                transport: Box::new(transport),
                extractor: Arc::new(LineExtractor),
                store,
                reset: Box::new(NoopReset),
                sleeper,
            },
        )
        .unwrap()
    }

    fn stored_ids(path: &Path) -> HashSet<String> {
        CsvStorage::open(path).unwrap().load_ids().unwrap()
    }

    #[tokio::test]
    async fn test_terminates_on_confirmed_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let transport = Arc::new(
            CatalogTransport::default()
                .with_page(1, &["1", "2"])
                .with_page(2, &["3"]),
        );
        let sleeper = Arc::new(CountingSleeper::default());
        let config = create_test_config(DetailMode::None);

        let mut coord = coordinator(
            &config,
            transport.clone(),
            Box::new(CsvStorage::open(&path).unwrap()),
            sleeper.clone(),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(report.termination, Some(TerminationReason::EmptyPage(3)));
        assert_eq!(report.records_written, 3);
        assert_eq!(report.pages_fetched, 2);
        assert_eq!(transport.hits(&format!("{}?page=3", LIST)), 2);
        assert_eq!(transport.hits(&format!("{}?page=4", LIST)), 0);
        // page 1 -> 2, page 2 -> 3, and one re-fetch of page 3
        assert_eq!(sleeper.0.load(Ordering::SeqCst), 3);

        let expected: HashSet<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(stored_ids(&path), expected);
    }

    #[tokio::test]
    async fn test_last_page_stops_crawl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let transport = Arc::new(
            CatalogTransport::default()
                .with_page(1, &["1"])
                .with_page(2, &["2"]),
        );
        let mut config = create_test_config(DetailMode::None);
        config.crawler.last_page = Some(1);

        let mut coord = coordinator(
            &config,
            transport.clone(),
            Box::new(CsvStorage::open(&path).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(report.termination, Some(TerminationReason::LastPage(1)));
        assert_eq!(transport.hits(&format!("{}?page=2", LIST)), 0);
        assert_eq!(report.records_written, 1);
        assert_eq!(coord.state().current_page(), 1);
        assert_eq!(coord.state().seen_count(), 1);
    }

    #[tokio::test]
    async fn test_required_detail_skips_listing_after_bounded_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let transport = Arc::new(
            CatalogTransport::default()
                .with_page(1, &["10", "11"])
                .with_detail("10", "<p>temporarily unavailable</p>")
                .with_detail("11", "model=Avante"),
        );

        let mut coord = coordinator(
            &create_test_config(DetailMode::Required),
            transport.clone(),
            Box::new(CsvStorage::open(&path).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(transport.hits(&format!("{}?id=10", DETAIL)), 3);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.records_written, 1);
        assert!(!coord.state().is_seen("10"));

        let expected: HashSet<String> = ["11".to_string()].into_iter().collect();
        assert_eq!(stored_ids(&path), expected);
    }

    #[tokio::test]
    async fn test_optional_detail_saves_listing_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let transport = Arc::new(
            CatalogTransport::default()
                .with_page(1, &["10"])
                .with_detail("10", "<p>temporarily unavailable</p>"),
        );

        let mut coord = coordinator(
            &create_test_config(DetailMode::Optional),
            transport,
            Box::new(CsvStorage::open(&path).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(report.records_written, 1);
        assert_eq!(report.details_failed, 1);
        assert!(coord.state().is_seen("10"));
    }

    #[tokio::test]
    async fn test_seen_and_repeated_ids_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        {
            let mut store = CsvStorage::open(&path).unwrap();
            store
                .append(&[EnrichedRecord::new(
                    ListingRecord {
                        id: "1".to_string(),
                        ..Default::default()
                    },
                    None,
                    String::new(),
                )])
                .unwrap();
        }

        let transport = Arc::new(CatalogTransport::default().with_page(1, &["1", "2", "2", "3"]));
        let mut coord = coordinator(
            &create_test_config(DetailMode::None),
            transport,
            Box::new(CsvStorage::open(&path).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(report.listings_seen, 4);
        assert_eq!(report.duplicates_skipped, 2);
        assert_eq!(report.records_written, 2);
        assert_eq!(coord.state().seen_count(), 3);
        assert_eq!(CsvStorage::open(&path).unwrap().count_records().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_bounded_list_attempts_give_up() {
        let transport =
            Arc::new(CatalogTransport::default().unreachable(&format!("{}?page=1", LIST)));
        let mut config = create_test_config(DetailMode::None);
        config.crawler.list_attempts = Some(2);

        let dir = tempfile::tempdir().unwrap();
        let mut coord = coordinator(
            &config,
            transport.clone(),
            Box::new(CsvStorage::open(&dir.path().join("records.csv")).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(report.termination, Some(TerminationReason::ListUnavailable(1)));
        assert_eq!(transport.hits(&format!("{}?page=1", LIST)), 2);
        assert_eq!(report.fetch.network_errors, 2);
        assert_eq!(report.fetch.identity_resets, 0);
    }

    #[tokio::test]
    async fn test_blocked_detail_is_retried_past_attempt_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let detail_url = format!("{}?id=10", DETAIL);
        let transport = Arc::new(
            CatalogTransport::default()
                .with_page(1, &["10"])
                .with_detail("10", "model=Avante")
                .blocked_first(&detail_url, 5),
        );

        let mut coord = coordinator(
            &create_test_config(DetailMode::Optional),
            transport.clone(),
            Box::new(CsvStorage::open(&path).unwrap()),
            Arc::new(CountingSleeper::default()),
        );
        let report = coord.run().await.unwrap();

        assert_eq!(transport.hits(&detail_url), 6);
        assert_eq!(report.fetch.blocked, 5);
        assert_eq!(report.details_failed, 0);
        assert_eq!(report.records_written, 1);

        let rows: Vec<csv::StringRecord> = csv::Reader::from_path(&path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(&rows[0][5], "Avante");
    }

    #[tokio::test]
    async fn test_padded_ids_are_trimmed_before_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let config = create_test_config(DetailMode::None);

        for _ in 0..2 {
            let transport = Arc::new(CatalogTransport::default().with_page(1, &[" 7 ", "   "]));
            let mut coord = coordinator(
                &config,
                transport,
                Box::new(CsvStorage::open(&path).unwrap()),
                Arc::new(CountingSleeper::default()),
            );
            coord.run().await.unwrap();
        }

        let store = CsvStorage::open(&path).unwrap();
        assert_eq!(store.count_records().unwrap(), 1);
        assert_eq!(store.load_ids().unwrap(), ["7".to_string()].into_iter().collect());
    }

    #[tokio::test]
    async fn test_persistence_failure_is_fatal() {
        let transport = Arc::new(CatalogTransport::default().with_page(1, &["1", "2"]));
        let mut coord = coordinator(
            &create_test_config(DetailMode::None),
            transport,
            Box::new(ReadOnlyStore),
            Arc::new(CountingSleeper::default()),
        );

        let result = coord.run().await;
        assert!(matches!(result, Err(TrawlError::Storage(_))));
        assert!(!coord.state().is_seen("1"));
    }
}
