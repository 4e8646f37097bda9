use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an anchor href to an absolute, fragment-free HTTP(S) URL
///
/// Returns None if the link should be skipped:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that fail to resolve against the page URL
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use doc_harvester::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = resolve_href("report.pdf#page=2", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/report.pdf");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}

/// Parses a start URL into the canonical form `resolve_href` produces
///
/// Seeding the crawl with this form keeps a later link back to the start
/// page (`/` for `https://host`, or the page without its fragment) from
/// being queued as a different URL.
///
/// # Examples
///
/// ```
/// use doc_harvester::url::normalize_start_url;
///
/// let url = normalize_start_url("https://Example.com#top").unwrap();
/// assert_eq!(url, "https://example.com/");
/// ```
pub fn normalize_start_url(start_url: &str) -> UrlResult<String> {
    let url = Url::parse(start_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    resolve_href(url.as_str(), &url)
        .map(String::from)
        .ok_or_else(|| UrlError::InvalidScheme(url.scheme().to_string()))
}
