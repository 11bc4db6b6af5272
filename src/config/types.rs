use crate::listing::Condition;
use serde::Deserialize;
use std::path::PathBuf;

/// Browser-like user agent sent with every listing request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl and how hard
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Storefront (seller store) name
    #[serde(default = "default_store")]
    pub store: String,

    /// Only persist items in this condition
    #[serde(default)]
    pub condition: Option<Condition>,

    /// Safety cap on the number of listing pages visited
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of record writes in flight for one page
    #[serde(rename = "max-concurrent-writes", default = "default_max_concurrent_writes")]
    pub max_concurrent_writes: usize,
}

/// HTTP settings for the page fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Storefront origin, e.g. `https://www.ebay.com`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Base directory for item records; records land in `<data-dir>/<store>/`
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for per-run log files
    #[serde(rename = "log-dir", default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Config {
    /// Directory holding the records of the configured store
    pub fn store_dir(&self) -> PathBuf {
        self.output.data_dir.join(&self.crawler.store)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            condition: None,
            max_pages: default_max_pages(),
            max_concurrent_writes: default_max_concurrent_writes(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_store() -> String {
    "garlandcomputer".to_string()
}

fn default_max_pages() -> u32 {
    1000
}

fn default_max_concurrent_writes() -> usize {
    16
}

fn default_base_url() -> String {
    "https://www.ebay.com".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
