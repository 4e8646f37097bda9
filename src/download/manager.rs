//! Crawl-wide document download manager

use crate::config::DownloadConfig;
use crate::download::audit::{AuditLog, DownloadOutcome, DownloadRecord};
use crate::download::fetch::{build_download_client, fetch_document, FetchResult};
use crate::download::filename::{document_filename, numbered_variant};
use crate::HarvestError;
use futures::future::join_all;
use reqwest::Client;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Give up on a filename after this many numbered variants exist
const MAX_NAME_VARIANTS: usize = 10_000;

/// Deduplicates, fetches, and persists documents for a whole crawl run
///
/// The attempted set is owned here and only mutated between fan-outs, so a
/// URL is marked attempted before its fetch starts and never fetched twice,
/// whether the first attempt succeeded or not.
pub struct DownloadManager {
    client: Client,
    directory: PathBuf,
    extension: String,
    audit: AuditLog,
    attempted: HashSet<String>,
}

impl DownloadManager {
    /// Creates the download directory and opens the audit log
    pub fn new(config: &DownloadConfig, extension: &str) -> Result<Self, HarvestError> {
        std::fs::create_dir_all(&config.directory)?;
        let audit = AuditLog::open(&config.audit_log)?;
        let client = build_download_client(config.timeout())?;

        Ok(Self {
            client,
            directory: config.directory.clone(),
            extension: extension.to_string(),
            audit,
            attempted: HashSet::new(),
        })
    }

    /// Number of distinct document URLs attempted so far
    pub fn attempted_count(&self) -> usize {
        self.attempted.len()
    }

    pub fn is_attempted(&self, document_url: &str) -> bool {
        self.attempted.contains(document_url)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Attempts one document
    ///
    /// Returns `None` without any network activity if the URL was already
    /// attempted in this run.
    pub async fn attempt(&mut self, document_url: &str, source_page_url: &str) -> Option<DownloadRecord> {
        if !self.attempted.insert(document_url.to_string()) {
            tracing::debug!("Already attempted {}", document_url);
            return None;
        }
        Some(self.fetch_and_record(document_url, source_page_url).await)
    }

    /// Attempts every not-yet-attempted URL concurrently, at most `limit` of them
    ///
    /// All URLs taken into the batch are marked attempted before any fetch
    /// starts. Returns once every attempt has finished, one record per
    /// attempt, in no particular order.
    pub async fn dispatch(
        &mut self,
        document_urls: &[String],
        source_page_url: &str,
        limit: usize,
    ) -> Vec<DownloadRecord> {
        let (batch, skipped) = self.take_batch(document_urls, limit);
        if skipped > 0 {
            tracing::info!(
                "Document limit reached; skipping {} remaining documents from {}",
                skipped,
                source_page_url
            );
        }
        for url in &batch {
            self.attempted.insert(url.to_string());
        }

        if batch.is_empty() {
            return Vec::new();
        }

        tracing::info!("Downloading {} documents from {}", batch.len(), source_page_url);

        let this = &*self;
        join_all(
            batch
                .into_iter()
                .map(|url| this.fetch_and_record(url, source_page_url)),
        )
        .await
    }

    /// Picks the first `limit` distinct URLs not yet attempted
    ///
    /// Also returns how many further new URLs did not fit.
    fn take_batch<'u>(&self, document_urls: &'u [String], limit: usize) -> (Vec<&'u str>, usize) {
        let mut fresh: Vec<&str> = Vec::new();
        for url in document_urls {
            if !self.is_attempted(url) && !fresh.contains(&url.as_str()) {
                fresh.push(url);
            }
        }

        let skipped = fresh.len().saturating_sub(limit);
        fresh.truncate(limit);
        (fresh, skipped)
    }

    async fn fetch_and_record(&self, document_url: &str, source_page_url: &str) -> DownloadRecord {
        let outcome = self.download(document_url).await;

        match &outcome {
            DownloadOutcome::Success(path) => {
                tracing::info!("Downloaded {} -> {}", document_url, path.display())
            }
            DownloadOutcome::Failure(reason) => {
                tracing::warn!("Failed to download {}: {}", document_url, reason)
            }
        }

        let record = DownloadRecord::new(document_url, source_page_url, outcome);
        if let Err(e) = self.audit.append(&record) {
            tracing::error!(
                "Failed to append to audit log {}: {}",
                self.audit.path().display(),
                e
            );
        }
        record
    }

    async fn download(&self, document_url: &str) -> DownloadOutcome {
        let url = match Url::parse(document_url) {
            Ok(url) => url,
            Err(e) => return DownloadOutcome::Failure(format!("Invalid URL: {}", e)),
        };

        let body = match fetch_document(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url,
                content_type,
                body,
            } => {
                if final_url != url.as_str() {
                    tracing::debug!("{} redirected to {}", document_url, final_url);
                }
                tracing::debug!(
                    "Received {} bytes of '{}' from {}",
                    body.len(),
                    content_type,
                    document_url
                );
                body
            }
            failed => {
                return DownloadOutcome::Failure(
                    failed.failure_reason().unwrap_or_else(|| "Unknown error".to_string()),
                )
            }
        };

        let name = document_filename(&url, &self.extension);
        match self.persist(&name, &body).await {
            Ok(path) => DownloadOutcome::Success(path),
            Err(e) => DownloadOutcome::Failure(format!("Failed to write {}: {}", name, e)),
        }
    }

    /// Writes `bytes` under `name`, or the first free numbered variant of it
    ///
    /// Files are created with create-new semantics, so concurrent writers
    /// never clobber each other or an earlier run's file. A partially
    /// written file is removed.
    async fn persist(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        for n in 0..MAX_NAME_VARIANTS {
            let candidate = if n == 0 {
                name.to_string()
            } else {
                numbered_variant(name, n)
            };
            let path = self.directory.join(&candidate);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e);
            }
            return Ok(path);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free filename for {}", name),
        ))
    }
}
