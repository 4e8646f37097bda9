//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Advancing the breadth-first frontier one page at a time
//! - Asking the oracle which elements to click and clicking them
//! - Discovering documents and same-domain links on the mutated page
//! - Dispatching document downloads
//! - Enforcing page and document bounds and honoring interrupts
//!
//! Only one page is ever active in the browser. Within a page, inference and
//! downloads fan out and are gathered before the next phase starts; all
//! crawl state is mutated here, between those barriers.

use crate::config::Config;
use crate::crawler::discover::discover;
use crate::crawler::frontier::{Frontier, FrontierEmpty};
use crate::crawler::interact::execute_interactions;
use crate::crawler::snapshot::{save_snapshot, PageSnapshot};
use crate::download::DownloadManager;
use crate::driver::PageDriver;
use crate::oracle::{merge_selectors, SelectorOracle};
use crate::output::{CrawlSummary, StopReason};
use crate::url::normalize_start_url;
use crate::HarvestError;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// How processing of a dequeued page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    /// Every phase ran
    Completed,
    /// The run was interrupted before the page was acted on
    Interrupted,
}

/// Main crawler coordinator structure
///
/// Borrows the page driver and oracle for the duration of a run; releasing
/// the driver is the caller's job (see `run_crawl`).
pub struct Coordinator<'a, D, O: ?Sized> {
    config: Config,
    target_domain: String,
    driver: &'a mut D,
    oracle: &'a O,
    frontier: Frontier,
    downloads: DownloadManager,
    cancel: CancellationToken,
    summary: CrawlSummary,
}

impl<'a, D, O> Coordinator<'a, D, O>
where
    D: PageDriver,
    O: SelectorOracle + ?Sized,
{
    /// Creates a new coordinator instance
    ///
    /// Seeds the frontier with the start URL, in the same normalized form as
    /// discovered links, creates the download directory and opens the audit log.
    pub fn new(
        config: Config,
        driver: &'a mut D,
        oracle: &'a O,
        cancel: CancellationToken,
    ) -> Result<Self, HarvestError> {
        let target_domain = config.target_domain()?;
        let start_url = normalize_start_url(&config.crawler.start_url)?;
        let frontier = Frontier::new(start_url);
        let downloads = DownloadManager::new(&config.download, &config.crawler.document_extension)?;

        Ok(Self {
            config,
            target_domain,
            driver,
            oracle,
            frontier,
            downloads,
            cancel,
            summary: CrawlSummary::new(),
        })
    }

    /// Runs the main crawl loop until the frontier is empty, a bound is
    /// reached, or the cancellation token fires
    ///
    /// Per-page failures never end the run. The only error is a chunking
    /// configuration error surfaced by the selector merge.
    pub async fn run(&mut self) -> Result<CrawlSummary, HarvestError> {
        tracing::info!(
            "Starting crawl of {} from {}",
            self.target_domain,
            self.config.crawler.start_url
        );

        let start_time = Instant::now();
        let mut pages_dequeued: u64 = 0;

        let stop_reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Interrupted;
            }
            if self.frontier.visited_len() >= self.config.crawler.max_pages {
                break StopReason::PageLimit;
            }
            if self.downloads.attempted_count() >= self.config.crawler.max_documents {
                break StopReason::DocumentLimit;
            }

            let url = match self.frontier.dequeue_next() {
                Ok(url) => url,
                Err(FrontierEmpty) => break StopReason::FrontierExhausted,
            };
            self.frontier.mark_visited(&url);
            pages_dequeued += 1;

            match self.process_page(&url).await {
                Ok(PageOutcome::Completed) => self.summary.pages_visited += 1,
                Ok(PageOutcome::Interrupted) => {
                    tracing::info!("Left {} unprocessed after interrupt", url);
                }
                Err(HarvestError::Driver(e)) => {
                    tracing::error!("Abandoning {}: {}", url, e);
                    self.summary.pages_abandoned += 1;
                }
                Err(e) => return Err(e),
            }

            // Progress reporting every 10 pages
            if pages_dequeued % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = pages_dequeued as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} documents attempted, {:.2} pages/sec",
                    pages_dequeued,
                    self.frontier.pending_len(),
                    self.downloads.attempted_count(),
                    rate
                );
            }
        };

        self.summary.stop_reason = stop_reason;
        self.summary.frontier_remaining = self.frontier.pending_len() as u64;
        self.summary.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl stopped ({}): {} pages visited, {} documents downloaded in {:?}",
            stop_reason,
            self.summary.pages_visited,
            self.summary.documents_downloaded,
            self.summary.elapsed
        );

        Ok(self.summary.clone())
    }

    /// Processes a single page
    ///
    /// 1. Navigates and lets the page settle
    /// 2. Snapshots the markup (and persists it if configured)
    /// 3. Merges oracle selectors over the snapshot's chunks
    /// 4. Clicks each candidate element
    /// 5. Discovers documents and links on the mutated page
    /// 6. Downloads new documents, within the document budget
    /// 7. Queues same-domain links
    ///
    /// A driver error at any step abandons the page.
    async fn process_page(&mut self, url: &str) -> Result<PageOutcome, HarvestError> {
        tracing::info!("Processing {}", url);

        self.driver.navigate(url).await?;
        tokio::time::sleep(self.config.crawler.page_settle()).await;

        let snapshot = PageSnapshot::new(url, self.driver.page_source().await?);

        if let Some(directory) = &self.config.download.snapshot_directory {
            match save_snapshot(directory, &snapshot).await {
                Ok(path) => tracing::debug!("Saved snapshot to {}", path.display()),
                Err(e) => tracing::warn!("Failed to save snapshot of {}: {}", url, e),
            }
        }

        let selectors = tokio::select! {
            merged = merge_selectors(self.oracle, &snapshot, &self.config.oracle) => merged?,
            _ = self.cancel.cancelled() => {
                tracing::info!("Interrupted while analyzing {}", url);
                return Ok(PageOutcome::Interrupted);
            }
        };
        self.summary.selectors_proposed += selectors.len() as u64;

        let report = execute_interactions(&selectors, &mut *self.driver, &self.config.crawler).await;
        self.summary.selectors_clicked += report.clicked as u64;

        let links = discover(
            &*self.driver,
            &self.target_domain,
            &self.config.crawler.document_extension,
        )
        .await?;

        let budget = self
            .config
            .crawler
            .max_documents
            .saturating_sub(self.downloads.attempted_count());
        let records = self.downloads.dispatch(&links.document_links, url, budget).await;
        for record in &records {
            if record.outcome.is_success() {
                self.summary.documents_downloaded += 1;
            } else {
                self.summary.documents_failed += 1;
            }
        }

        let mut queued = 0;
        for link in links.same_domain_links {
            if self.frontier.enqueue(link) {
                queued += 1;
            }
        }
        self.summary.links_queued += queued;

        tracing::info!(
            "Finished {}: {} selectors, {} clicked, {} documents, {} new links",
            url,
            selectors.len(),
            report.clicked,
            records.len(),
            queued
        );

        Ok(PageOutcome::Completed)
    }
}

/// Runs a complete crawl with the given driver and oracle
///
/// The driver is closed exactly once when this returns, whichever way the
/// run ended (completion, bound, interrupt, or error).
///
/// # Example
///
/// ```no_run
/// use doc_harvester::config::load_config;
/// use doc_harvester::crawler::run_crawl;
/// use doc_harvester::driver::ChromiumDriver;
/// use doc_harvester::oracle::HttpOracle;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let mut driver = ChromiumDriver::launch(&config.browser).await?;
/// let oracle = HttpOracle::from_config(&config.oracle)?;
/// let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new()).await?;
/// println!("{} documents downloaded", summary.documents_downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<D, O>(
    config: Config,
    driver: &mut D,
    oracle: &O,
    cancel: CancellationToken,
) -> Result<CrawlSummary, HarvestError>
where
    D: PageDriver,
    O: SelectorOracle + ?Sized,
{
    let result = match Coordinator::new(config, &mut *driver, oracle, cancel) {
        Ok(mut coordinator) => coordinator.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = driver.close().await {
        tracing::warn!("Failed to close browser cleanly: {}", e);
    }

    result
}
