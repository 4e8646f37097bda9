//! Page snapshots taken right after navigation

use crate::download::snapshot_filename;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// The markup observed immediately after navigating to a page
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
    pub fetched_at: DateTime<Utc>,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Writes the snapshot's markup to `directory/<sanitized url>.html`
///
/// An existing snapshot of the same URL is overwritten.
pub async fn save_snapshot(directory: &Path, snapshot: &PageSnapshot) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(directory).await?;
    let path = directory.join(snapshot_filename(&snapshot.url));
    tokio::fs::write(&path, snapshot.html.as_bytes()).await?;
    Ok(path)
}
