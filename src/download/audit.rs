//! Append-only CSV audit log of download attempts
//!
//! Each record is formatted in full and written with a single `write_all`
//! under a lock, then flushed, so concurrent completions may interleave
//! lines but never split one.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Header row written to a new or empty log
pub const AUDIT_HEADER: &str = "documentUrl,sourcePageUrl,outcome,timestamp";

/// Result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Saved to the given path
    Success(PathBuf),

    Failure(String),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    fn as_field(&self) -> String {
        match self {
            Self::Success(_) => "success".to_string(),
            Self::Failure(reason) => format!("failure: {}", reason),
        }
    }
}

/// One audit entry; created once per distinct attempted document URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    pub document_url: String,
    pub source_page_url: String,
    pub outcome: DownloadOutcome,
    pub timestamp: DateTime<Utc>,
}

impl DownloadRecord {
    pub fn new(document_url: &str, source_page_url: &str, outcome: DownloadOutcome) -> Self {
        Self {
            document_url: document_url.to_string(),
            source_page_url: source_page_url.to_string(),
            outcome,
            timestamp: Utc::now(),
        }
    }

    /// Formats the record as one CSV line, newline included
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}\n",
            csv_field(&self.document_url),
            csv_field(&self.source_page_url),
            csv_field(&self.outcome.as_field()),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Quotes a field when it contains a comma, quote, or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Handle to the audit log file
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AuditLog {
    /// Opens the log for appending, writing the header if the file is new or empty
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        if file.metadata()?.len() == 0 {
            file.write_all(format!("{}\n", AUDIT_HEADER).as_bytes())?;
            file.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Appends one record and flushes it
    pub fn append(&self, record: &DownloadRecord) -> io::Result<()> {
        let line = record.to_csv_line();
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "audit log lock poisoned"))?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
