//! Output module for crawl summaries
//!
//! This module handles:
//! - The counters accumulated over a crawl run
//! - Why the run stopped
//! - Printing the terminal report

pub mod stats;

pub use stats::{print_summary, CrawlSummary, StopReason};
