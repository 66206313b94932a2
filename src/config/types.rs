use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for News Harvester
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

/// Concurrency limits for a batch run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutorConfig {
    /// Maximum number of handlers (browser sessions) alive at once
    #[serde(default = "default_max_concurrent_handlers")]
    pub max_concurrent_handlers: usize,

    /// Maximum number of in-flight tasks, including those queued for a handler slot
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_handlers: default_max_concurrent_handlers(),
            max_workers: default_max_workers(),
        }
    }
}

/// Bounds of the "load more" loop run by every crawler
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PaginationConfig {
    /// Overrides the per-site number of successful "load more" steps
    #[serde(default)]
    pub scroll_limit: Option<u32>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_max_repeated_pages")]
    pub max_repeated_pages: u32,

    /// How long to wait for a control to become interactable (seconds)
    #[serde(default = "default_element_wait_secs")]
    pub element_wait_secs: u64,

    /// Hard wall-clock ceiling per crawl target (seconds)
    #[serde(default = "default_crawl_timeout_secs")]
    pub crawl_timeout_secs: u64,

    /// Pause after each "load more" click (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl PaginationConfig {
    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            scroll_limit: None,
            max_retries: default_max_retries(),
            max_repeated_pages: default_max_repeated_pages(),
            element_wait_secs: default_element_wait_secs(),
            crawl_timeout_secs: default_crawl_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrowserConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Listing pages to crawl for links
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    #[serde(default)]
    pub newspapers: Vec<String>,
}

/// Article scraping configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScrapeConfig {
    /// Maximum number of pending links scraped in one run
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_articles: default_max_articles(),
        }
    }
}

fn default_max_concurrent_handlers() -> usize {
    4
}

fn default_max_workers() -> usize {
    6
}

fn default_max_retries() -> u32 {
    5
}

fn default_max_repeated_pages() -> u32 {
    10
}

fn default_element_wait_secs() -> u64 {
    10
}

fn default_crawl_timeout_secs() -> u64 {
    300
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("news-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_database_path() -> String {
    "./news-harvester.db".to_string()
}

fn default_max_articles() -> usize {
    2000
}
