//! HTTP fetching of document bodies
//!
//! This module handles the document side of HTTP:
//! - Building the shared download client
//! - GET requests with a bounded timeout
//! - Error classification into a `FetchResult`

use reqwest::Client;
use std::time::Duration;

/// Result of a document fetch
#[derive(Debug)]
pub enum FetchResult {
    /// The document body was received in full
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value (empty if absent)
        content_type: String,
        body: Vec<u8>,
    },

    /// The server answered with a non-2xx status
    HttpError { status_code: u16 },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError { error: String },
}

impl FetchResult {
    /// Human-readable failure reason, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds the HTTP client used for document downloads
///
/// # Example
///
/// ```no_run
/// use doc_harvester::download::build_download_client;
/// use std::time::Duration;
///
/// let client = build_download_client(Duration::from_secs(60)).unwrap();
/// ```
pub fn build_download_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("doc-harvester/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a document body
///
/// Never fails: every error is classified into a `FetchResult` variant.
/// No retries are attempted.
pub async fn fetch_document(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            content_type,
            body: body.to_vec(),
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
