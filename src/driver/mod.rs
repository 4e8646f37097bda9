//! Page driver boundary for Doc-Harvester
//!
//! The crawl needs exactly one stateful browser session: navigate to a URL,
//! read the live DOM, locate elements by CSS selector, scroll them into view
//! and click them. `PageDriver` is that boundary. `ChromiumDriver` implements
//! it over the DevTools protocol; tests implement it in memory.
//!
//! A driver is owned by one run and is released with `close()`, which must be
//! safe to call more than once.

mod chromium;

pub use chromium::ChromiumDriver;

use crate::DriverError;
use async_trait::async_trait;

/// Result type alias for page driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A single browser tab driven by the crawler
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Handle to an element located in the current page
    type Element: Send + Sync;

    /// Navigates to `url` and waits for the load to complete
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Returns the serialized live DOM of the current page
    async fn page_source(&self) -> DriverResult<String>;

    /// Returns the URL of the current page after any redirects
    async fn current_url(&self) -> DriverResult<String>;

    /// Locates the first element matching a CSS selector
    ///
    /// `Ok(None)` means the selector is valid but matches nothing. An invalid
    /// selector is an `Err`.
    async fn find_first(&self, selector: &str) -> DriverResult<Option<Self::Element>>;

    async fn scroll_into_view(&self, element: &Self::Element) -> DriverResult<()>;

    async fn click(&mut self, element: &Self::Element) -> DriverResult<()>;

    /// Releases the session; later calls are no-ops
    async fn close(&mut self) -> DriverResult<()>;
}
