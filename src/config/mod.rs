//! Configuration module for Doc-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every run-scoped bound (start URL, page and document limits, chunking,
//! timeouts, output locations) comes from here; nothing is derived internally
//! except the target domain, which is the start URL's host.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, Config, CrawlerConfig, DownloadConfig, OracleConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_chunking};

use crate::url::target_domain;
use crate::ConfigError;

impl Config {
    /// Returns the crawl's target domain (the start URL's lowercase host)
    pub fn target_domain(&self) -> Result<String, ConfigError> {
        target_domain(&self.crawler.start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid start_url '{}': {}",
                self.crawler.start_url, e
            ))
        })
    }

    /// Replaces the start URL and re-validates the configuration
    pub fn with_start_url(mut self, start_url: &str) -> Result<Self, ConfigError> {
        self.crawler.start_url = start_url.to_string();
        validate(&self)?;
        Ok(self)
    }
}
