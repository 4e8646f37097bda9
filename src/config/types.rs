use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Doc-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub oracle: OracleConfig,
    pub download: DownloadConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Crawl bounds and pacing
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host is the target domain
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of pages to visit
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of distinct documents to attempt
    #[serde(rename = "max-documents")]
    pub max_documents: usize,

    /// Extension identifying document links, without the dot
    #[serde(rename = "document-extension", default = "default_extension")]
    pub document_extension: String,

    /// Wait after navigation before reading the page (milliseconds)
    #[serde(rename = "page-settle-ms", default = "default_page_settle_ms")]
    pub page_settle_ms: u64,

    /// Pause between scrolling an element into view and clicking it (milliseconds)
    #[serde(rename = "click-settle-ms", default = "default_click_settle_ms")]
    pub click_settle_ms: u64,

    /// Wait after a successful click for revealed content to load (milliseconds)
    #[serde(rename = "post-click-wait-ms", default = "default_post_click_wait_ms")]
    pub post_click_wait_ms: u64,
}

/// Selector-inference service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Endpoint receiving `{"html": ...}` POST requests
    pub endpoint: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_oracle_timeout")]
    pub timeout_secs: u64,

    /// Characters per chunk sent to the oracle
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[serde(rename = "chunk-overlap", default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Download and artifact output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Directory receiving downloaded documents
    pub directory: PathBuf,

    /// Per-document request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_download_timeout")]
    pub timeout_secs: u64,

    /// Path of the append-only audit log
    #[serde(rename = "audit-log")]
    pub audit_log: PathBuf,

    /// Directory receiving raw page snapshots; disabled when absent
    #[serde(rename = "snapshot-directory", default)]
    pub snapshot_directory: Option<PathBuf>,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            chrome_executable: None,
        }
    }
}

impl CrawlerConfig {
    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn post_click_wait(&self) -> Duration {
        Duration::from_millis(self.post_click_wait_ms)
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_page_settle_ms() -> u64 {
    2000
}

fn default_click_settle_ms() -> u64 {
    500
}

fn default_post_click_wait_ms() -> u64 {
    2000
}

fn default_oracle_timeout() -> u64 {
    120
}

fn default_chunk_size() -> usize {
    4500
}

fn default_chunk_overlap() -> usize {
    400
}

fn default_download_timeout() -> u64 {
    60
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}
