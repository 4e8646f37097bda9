//! Link and document discovery on the live page
//!
//! This module scans the current DOM (after any clicks) for:
//! - Direct document links, recognized by file extension on any domain
//! - Same-domain links eligible for further crawling
//!
//! Discovery is purely observational; it never navigates.

use crate::driver::{DriverResult, PageDriver};
use crate::url::{classify_link, resolve_href, LinkKind};
use crate::DriverError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links found on one page, deduplicated, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredLinks {
    /// Absolute URLs of documents, on any domain
    pub document_links: Vec<String>,

    /// Absolute same-domain URLs eligible for crawling
    pub same_domain_links: Vec<String>,
}

/// Reads the current page from the driver and discovers its links
///
/// Relative hrefs are resolved against the page's current URL, which may
/// differ from the requested one after redirects.
pub async fn discover<D: PageDriver>(
    driver: &D,
    base_domain: &str,
    extension: &str,
) -> DriverResult<DiscoveredLinks> {
    let html = driver.page_source().await?;
    let current_url = driver.current_url().await?;
    let page_url = Url::parse(&current_url).map_err(|e| {
        DriverError::Command(format!("Current URL '{}' is invalid: {}", current_url, e))
    })?;

    Ok(discover_in_html(&html, &page_url, base_domain, extension))
}

/// Discovers links in a serialized DOM
///
/// # Example
///
/// ```
/// use doc_harvester::crawler::discover_in_html;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="https://other.com/b">B</a><a href="/c.pdf">C</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = discover_in_html(html, &page, "example.com", "pdf");
/// assert_eq!(links.document_links, vec!["https://example.com/c.pdf"]);
/// assert_eq!(links.same_domain_links, vec!["https://example.com/a"]);
/// ```
pub fn discover_in_html(
    html: &str,
    page_url: &Url,
    base_domain: &str,
    extension: &str,
) -> DiscoveredLinks {
    let mut links = DiscoveredLinks::default();
    let mut seen = HashSet::new();

    for href in extract_hrefs(html) {
        let Some(url) = resolve_href(&href, page_url) else {
            tracing::trace!("Skipping href '{}'", href);
            continue;
        };

        let url_str = url.to_string();
        if !seen.insert(url_str.clone()) {
            continue;
        }

        match classify_link(&url, base_domain, extension) {
            LinkKind::Document => links.document_links.push(url_str),
            LinkKind::SameDomain => links.same_domain_links.push(url_str),
            LinkKind::Foreign => {}
        }
    }

    links
}

/// Extracts the raw `href` of every anchor in the document
fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
