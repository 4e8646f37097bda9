//! URL handling module for Doc-Harvester
//!
//! This module provides domain extraction, href resolution, and link
//! classification (document vs. crawlable same-domain page).

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, is_same_domain, target_domain};
pub use resolve::{normalize_start_url, resolve_href};

use ::url::Url;

/// Link classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Direct link to a downloadable document, on any domain
    Document,
    /// Same-domain page eligible for further crawling
    SameDomain,
    /// Anything else (other hosts, non-document files elsewhere)
    Foreign,
}

/// Returns true if the URL path ends in `.<extension>` (case-insensitive)
///
/// Only the path is considered, so query strings and fragments never
/// affect the decision.
///
/// # Examples
///
/// ```
/// use doc_harvester::url::is_document_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/files/Report.PDF?v=2").unwrap();
/// assert!(is_document_url(&url, "pdf"));
/// ```
pub fn is_document_url(url: &Url, extension: &str) -> bool {
    let suffix = format!(".{}", extension.to_ascii_lowercase());
    url.path().to_ascii_lowercase().ends_with(&suffix)
}

/// Classifies an absolute URL relative to the crawl's target domain
///
/// Document detection has priority and is independent of the domain;
/// a same-domain document is never a crawlable page.
pub fn classify_link(url: &Url, base_domain: &str, extension: &str) -> LinkKind {
    if is_document_url(url, extension) {
        return LinkKind::Document;
    }

    if is_same_domain(url, base_domain) {
        return LinkKind::SameDomain;
    }

    LinkKind::Foreign
}
