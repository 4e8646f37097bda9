//! Document downloads for Doc-Harvester
//!
//! This module owns everything that happens once a document link is known:
//! - Crawl-wide deduplication of document URLs
//! - Concurrent fetch-and-persist of a page's documents
//! - Filesystem-safe filename derivation
//! - The append-only audit log

mod audit;
mod fetch;
mod filename;
mod manager;

pub use audit::{AuditLog, DownloadOutcome, DownloadRecord, AUDIT_HEADER};
pub use fetch::{build_download_client, fetch_document, FetchResult};
pub use filename::{document_filename, numbered_variant, snapshot_filename};
pub use manager::DownloadManager;
