use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Catalog-Trawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub blocking: BlockingConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    pub output: OutputConfig,
}

/// How detail pages participate in a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailMode {
    /// Never fetch detail pages; persist listings alone
    None,
    /// A listing is persisted only together with its detail record
    Required,
    /// Fetch detail pages, but persist the listing alone when they fail
    Optional,
}

/// Crawl target and pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// List endpoint; the page number is appended as a query parameter
    #[serde(rename = "list-url")]
    pub list_url: String,

    /// Detail endpoint; the listing id is appended as a query parameter.
    /// Unused when `detail-mode = "none"`.
    #[serde(rename = "detail-url", default)]
    pub detail_url: String,

    /// Asset endpoint used to derive each record's `url` column
    #[serde(rename = "asset-url")]
    pub asset_url: String,

    /// Fixed token appended to derived asset URLs
    #[serde(rename = "asset-token", default)]
    pub asset_token: String,

    /// Query parameter carrying the page number on list URLs
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the listing id on detail and asset URLs
    #[serde(rename = "id-param", default = "default_id_param")]
    pub id_param: String,

    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: u32,

    /// Last page to visit (inclusive); unbounded when absent
    #[serde(rename = "last-page", default)]
    pub last_page: Option<u32>,

    /// Delay between list pages (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay")]
    pub politeness_delay_ms: u64,

    #[serde(rename = "detail-mode", default = "default_detail_mode")]
    pub detail_mode: DetailMode,

    /// Maximum fetch attempts per list page; unbounded when absent
    #[serde(rename = "list-attempts", default)]
    pub list_attempts: Option<u32>,

    /// Maximum fetch attempts per detail page
    #[serde(rename = "detail-attempts", default = "default_detail_attempts")]
    pub detail_attempts: u32,

    /// Consecutive empty fetches of a list page required to end the crawl
    #[serde(
        rename = "empty-page-confirmations",
        default = "default_empty_page_confirmations"
    )]
    pub empty_page_confirmations: u32,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Signatures that identify an anti-bot response
#[derive(Debug, Clone, Deserialize)]
pub struct BlockingConfig {
    /// Substrings whose presence marks a page as blocked
    #[serde(default)]
    pub markers: Vec<String>,

    /// HTTP statuses treated as blocked rather than as network errors
    #[serde(rename = "blocked-statuses", default = "default_blocked_statuses")]
    pub blocked_statuses: Vec<u16>,

    /// Substring every genuine list page contains
    #[serde(rename = "list-anchor", default)]
    pub list_anchor: Option<String>,

    /// Substring every genuine detail page contains
    #[serde(rename = "detail-anchor", default)]
    pub detail_anchor: Option<String>,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            blocked_statuses: default_blocked_statuses(),
            list_anchor: None,
            detail_anchor: None,
        }
    }
}

/// Backoff and identity reset policy
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryConfig {
    /// Wait after a blocked response (W_block)
    #[serde(rename = "block-wait-secs", default = "default_block_wait")]
    pub block_wait_secs: u64,

    /// Base wait after a network error (W_net)
    #[serde(rename = "network-wait-secs", default = "default_network_wait")]
    pub network_wait_secs: u64,

    /// Cap for the exponential network backoff
    #[serde(rename = "network-max-wait-secs", default = "default_network_max_wait")]
    pub network_max_wait_secs: u64,

    /// Consecutive network failures tolerated before resetting identity (K)
    #[serde(rename = "escalation-threshold", default = "default_escalation_threshold")]
    pub escalation_threshold: u32,

    /// Wait after an escalated identity reset (W_net_escalated)
    #[serde(rename = "escalated-wait-secs", default = "default_escalated_wait")]
    pub escalated_wait_secs: u64,

    /// Command (argv) that changes the crawler's network identity
    #[serde(rename = "reset-command", default)]
    pub reset_command: Option<Vec<String>>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            block_wait_secs: default_block_wait(),
            network_wait_secs: default_network_wait(),
            network_max_wait_secs: default_network_max_wait(),
            escalation_threshold: default_escalation_threshold(),
            escalated_wait_secs: default_escalated_wait(),
            reset_command: None,
        }
    }
}

/// Storage backend for captured records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Csv,
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the record store
    pub path: String,

    /// Backend; inferred from the path's extension when absent
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    /// Returns the configured format, falling back to the file extension
    pub fn resolved_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }

        match Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("db") | Some("sqlite") | Some("sqlite3") => OutputFormat::Sqlite,
            _ => OutputFormat::Csv,
        }
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_id_param() -> String {
    "id".to_string()
}

fn default_first_page() -> u32 {
    1
}

fn default_politeness_delay() -> u64 {
    1200
}

fn default_detail_mode() -> DetailMode {
    DetailMode::Required
}

fn default_detail_attempts() -> u32 {
    3
}

fn default_empty_page_confirmations() -> u32 {
    2
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 10; Pixel 5) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/115.0.0.0 Mobile Safari/537.36"
        .to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_blocked_statuses() -> Vec<u16> {
    vec![403, 429]
}

fn default_block_wait() -> u64 {
    30
}

fn default_network_wait() -> u64 {
    5
}

fn default_network_max_wait() -> u64 {
    60
}

fn default_escalation_threshold() -> u32 {
    3
}

fn default_escalated_wait() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(path: &str, format: Option<OutputFormat>) -> OutputConfig {
        OutputConfig {
            path: path.to_string(),
            format,
        }
    }

    #[test]
    fn test_format_inferred_from_extension() {
        assert_eq!(output("cars.csv", None).resolved_format(), OutputFormat::Csv);
        assert_eq!(output("cars.db", None).resolved_format(), OutputFormat::Sqlite);
        assert_eq!(
            output("cars.SQLITE", None).resolved_format(),
            OutputFormat::Sqlite
        );
        assert_eq!(output("cars", None).resolved_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_explicit_format_wins() {
        assert_eq!(
            output("cars.csv", Some(OutputFormat::Sqlite)).resolved_format(),
            OutputFormat::Sqlite
        );
    }
}
