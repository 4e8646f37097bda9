//! Doc-Harvester: an oracle-guided document crawler
//!
//! This crate crawls a single web domain in a real browser session, asks an
//! external selector-inference service which elements are likely to reveal
//! downloadable documents, clicks them, and harvests the documents that
//! appear, keeping an append-only audit log of every download attempt.

pub mod config;
pub mod crawler;
pub mod download;
pub mod driver;
pub mod oracle;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Doc-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Driver(#[from] DriverError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid chunking: chunk size {chunk_size} must be greater than overlap {overlap}")]
    InvalidConfiguration { chunk_size: usize, overlap: usize },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Page driver errors
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to start browser session: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser command failed: {0}")]
    Command(String),

    #[error("Browser session already closed")]
    Closed,
}

/// Result type alias for Doc-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use driver::PageDriver;
pub use crate::url::{extract_domain, resolve_href, target_domain};
