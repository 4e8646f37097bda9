//! Run summary counters and their terminal report

use std::fmt;
use std::time::Duration;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// No pending URLs remained
    #[default]
    FrontierExhausted,

    /// The maximum number of pages was visited
    PageLimit,

    /// The maximum number of documents was attempted
    DocumentLimit,

    /// An operator interrupt was received
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::PageLimit => "page limit reached",
            Self::DocumentLimit => "document limit reached",
            Self::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

/// Summary of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Pages loaded and processed
    pub pages_visited: u64,

    /// Pages dequeued but abandoned after a driver error
    pub pages_abandoned: u64,

    /// Selector candidates proposed across all pages
    pub selectors_proposed: u64,

    /// Elements successfully clicked across all pages
    pub selectors_clicked: u64,

    /// Same-domain links newly added to the frontier
    pub links_queued: u64,

    pub documents_downloaded: u64,
    pub documents_failed: u64,

    /// URLs still pending when the crawl stopped
    pub frontier_remaining: u64,

    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Total distinct documents attempted
    pub fn documents_attempted(&self) -> u64 {
        self.documents_downloaded + self.documents_failed
    }

    /// Returns the download success rate as a percentage
    pub fn download_success_rate(&self) -> f64 {
        let attempted = self.documents_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.documents_downloaded as f64 / attempted as f64) * 100.0
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Stopped: {} after {:.1}s", summary.stop_reason, summary.elapsed.as_secs_f64());
    println!();

    println!("Pages:");
    println!("  Visited: {}", summary.pages_visited);
    println!("  Abandoned: {}", summary.pages_abandoned);
    println!("  Links queued: {}", summary.links_queued);
    println!("  Still in frontier: {}", summary.frontier_remaining);
    println!();

    println!("Interactions:");
    println!("  Selectors proposed: {}", summary.selectors_proposed);
    println!("  Elements clicked: {}", summary.selectors_clicked);
    println!();

    println!("Documents:");
    println!("  Downloaded: {}", summary.documents_downloaded);
    println!("  Failed: {}", summary.documents_failed);
    println!(
        "  Success Rate: {:.1}% ({} / {} attempted)",
        summary.download_success_rate(),
        summary.documents_downloaded,
        summary.documents_attempted()
    );
}
