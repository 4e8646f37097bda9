use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_harvester::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the crawl's target domain from the start URL
///
/// The start URL must be an absolute HTTP(S) URL with a host.
///
/// # Examples
///
/// ```
/// use doc_harvester::url::target_domain;
///
/// let domain = target_domain("https://www.govinfo.gov/app/collection/cfr/").unwrap();
/// assert_eq!(domain, "www.govinfo.gov");
/// ```
pub fn target_domain(start_url: &str) -> UrlResult<String> {
    let url = Url::parse(start_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    extract_domain(&url).ok_or(UrlError::MissingDomain)
}

/// Returns true if the URL's host is exactly the given domain
pub fn is_same_domain(url: &Url, base_domain: &str) -> bool {
    extract_domain(url).is_some_and(|d| d == base_domain.to_lowercase())
}
