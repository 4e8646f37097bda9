//! Clicks the elements behind a page's candidate selectors
//!
//! Candidates are speculative: they are often stale, invalid, or matched by
//! an element hidden behind an overlay. Every failure here is logged and the
//! next selector is tried.

use crate::config::CrawlerConfig;
use crate::driver::PageDriver;
use crate::oracle::SelectorSet;

/// Counts of what happened to each selector on one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionReport {
    /// Selectors whose element was clicked
    pub clicked: usize,
    /// Selectors matching no element
    pub missing: usize,
    /// Selectors that were invalid or whose element could not be scrolled to or clicked
    pub failed: usize,
}

impl InteractionReport {
    pub fn attempted(&self) -> usize {
        self.clicked + self.missing + self.failed
    }
}

/// Locates, scrolls to, and clicks the first element for each selector, in set order
pub async fn execute_interactions<D: PageDriver>(
    selectors: &SelectorSet,
    driver: &mut D,
    config: &CrawlerConfig,
) -> InteractionReport {
    let mut report = InteractionReport::default();

    for selector in selectors {
        let element = match driver.find_first(selector).await {
            Ok(Some(element)) => element,
            Ok(None) => {
                tracing::debug!("No element matches '{}'", selector);
                report.missing += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!("Could not query '{}': {}", selector, e);
                report.failed += 1;
                continue;
            }
        };

        if let Err(e) = driver.scroll_into_view(&element).await {
            tracing::warn!("Could not scroll to '{}': {}", selector, e);
            report.failed += 1;
            continue;
        }

        tokio::time::sleep(config.click_settle()).await;

        if let Err(e) = driver.click(&element).await {
            tracing::warn!("Could not click '{}': {}", selector, e);
            report.failed += 1;
            continue;
        }

        tracing::debug!("Clicked '{}'", selector);
        report.clicked += 1;
        tokio::time::sleep(config.post_click_wait()).await;
    }

    report
}
