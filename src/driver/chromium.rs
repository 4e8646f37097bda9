//! Chromium page driver over the DevTools protocol

use crate::config::BrowserConfig;
use crate::driver::{DriverResult, PageDriver};
use crate::DriverError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Upper bound on a single DevTools request, including navigation
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A single Chromium tab owned by one crawl run
///
/// The CDP event handler runs on its own task and must be aborted once the
/// browser is closed, otherwise it outlives the run.
pub struct ChromiumDriver {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launches Chromium and opens one blank tab
    ///
    /// # Errors
    ///
    /// `DriverError::Launch` if the browser cannot be started; this is
    /// fatal to the run.
    pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
        let mut builder = CdpBrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(REQUEST_TIMEOUT)
            .arg("--disable-notifications")
            .arg("--disable-popup-blocking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| DriverError::Launch(format!("Invalid browser configuration: {}", e)))?;

        tracing::info!(
            "Launching browser ({}, {}x{})",
            if config.headless { "headless" } else { "headed" },
            config.window_width,
            config.window_height
        );

        let (mut browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
            tracing::debug!("Browser event handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Don't leak the process when the first tab can't be opened
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(DriverError::Launch(format!("Failed to open page: {}", e)));
            }
        };

        Ok(Self {
            browser: Some(browser),
            page,
            handler,
        })
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.browser.is_none() {
            return Err(DriverError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;

        let navigation_error = |e: chromiumoxide::error::CdpError| DriverError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        self.page.goto(url).await.map_err(navigation_error)?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(navigation_error)?;

        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        self.ensure_open()?;
        self.page
            .content()
            .await
            .map_err(|e| DriverError::Command(format!("Failed to read page source: {}", e)))
    }

    async fn current_url(&self) -> DriverResult<String> {
        self.ensure_open()?;
        self.page
            .url()
            .await
            .map_err(|e| DriverError::Command(format!("Failed to read current URL: {}", e)))?
            .ok_or_else(|| DriverError::Command("Page has no URL".to_string()))
    }

    async fn find_first(&self, selector: &str) -> DriverResult<Option<Element>> {
        self.ensure_open()?;
        let elements = self.page.find_elements(selector).await.map_err(|e| {
            DriverError::Command(format!("Failed to query '{}': {}", selector, e))
        })?;
        Ok(elements.into_iter().next())
    }

    async fn scroll_into_view(&self, element: &Element) -> DriverResult<()> {
        self.ensure_open()?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| DriverError::Command(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn click(&mut self, element: &Element) -> DriverResult<()> {
        self.ensure_open()?;
        element
            .click()
            .await
            .map_err(|e| DriverError::Command(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn close(&mut self) -> DriverResult<()> {
        let Some(mut browser) = self.browser.take() else {
            tracing::debug!("Browser already closed");
            return Ok(());
        };

        tracing::info!("Closing browser");

        let mut failure = None;
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
            failure = Some(e.to_string());
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
            failure.get_or_insert_with(|| e.to_string());
        }
        self.handler.abort();

        match failure {
            Some(message) => Err(DriverError::Command(message)),
            None => Ok(()),
        }
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        if self.browser.is_some() {
            tracing::warn!("ChromiumDriver dropped without close(); aborting handler task");
        }
        self.handler.abort();
    }
}
