use crate::config::types::{BrowserConfig, Config, CrawlerConfig, DownloadConfig, OracleConfig};
use crate::url::target_domain;
use crate::ConfigError;
use url::Url;

/// Longest accepted oracle timeout (seconds)
const MAX_ORACLE_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_oracle_config(&config.oracle)?;
    validate_download_config(&config.download)?;
    validate_browser_config(&config.browser)?;
    Ok(())
}

/// Validates the chunk size / overlap relationship
///
/// Chunking requires `chunk_size > overlap`; anything else would never
/// advance through the markup.
pub fn validate_chunking(chunk_size: usize, overlap: usize) -> Result<(), ConfigError> {
    if chunk_size <= overlap {
        return Err(ConfigError::InvalidConfiguration {
            chunk_size,
            overlap,
        });
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "start_url is required".to_string(),
        ));
    }

    target_domain(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_documents < 1 {
        return Err(ConfigError::Validation(format!(
            "max_documents must be >= 1, got {}",
            config.max_documents
        )));
    }

    let extension = &config.document_extension;
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "document_extension must be a non-empty alphanumeric extension without a dot, got '{}'",
            extension
        )));
    }

    Ok(())
}

/// Validates oracle configuration
fn validate_oracle_config(config: &OracleConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid oracle endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Oracle endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_ORACLE_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "oracle timeout_secs must be between 1 and {}, got {}",
            MAX_ORACLE_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.chunk_size == 0 {
        return Err(ConfigError::Validation(
            "chunk_size must be >= 1".to_string(),
        ));
    }

    validate_chunking(config.chunk_size, config.chunk_overlap)
}

/// Validates download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download directory cannot be empty".to_string(),
        ));
    }

    if config.audit_log.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "audit_log cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "download timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if let Some(dir) = &config.snapshot_directory {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot_directory cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }
    Ok(())
}
