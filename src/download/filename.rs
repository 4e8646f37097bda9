//! Filesystem-safe names for downloaded documents and page snapshots

use sanitize_filename::{sanitize_with_options, Options};
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

/// Base name used when a URL has no usable final path segment
const FALLBACK_STEM: &str = "downloaded_file";

/// Longest filename most filesystems accept, in bytes
const MAX_NAME_BYTES: usize = 255;

/// Room kept free in document names for a `-n` collision suffix
const VARIANT_RESERVE: usize = 8;

/// Hex digits of the URL hash appended to shortened snapshot names
const SNAPSHOT_HASH_LEN: usize = 16;

fn sanitize(name: &str) -> String {
    sanitize_with_options(
        name,
        Options {
            windows: true,
            truncate: false,
            replacement: "_",
        },
    )
}

/// Cuts `s` to at most `max` bytes on a char boundary
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Derives the on-disk filename of a document from its URL
///
/// Uses the last path segment (the query string never contributes), forces
/// the `.<extension>` suffix when absent, and replaces characters that are
/// illegal in filenames with `_`. Over-long stems are shortened so the
/// extension always survives.
///
/// # Example
///
/// ```
/// use doc_harvester::download::document_filename;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/files/report?id=7").unwrap();
/// assert_eq!(document_filename(&url, "pdf"), "report.pdf");
/// ```
pub fn document_filename(url: &Url, extension: &str) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
        .trim();

    let suffix = format!(".{}", extension);

    // Keep the segment's own spelling of the extension when it has one
    let (base, suffix) = if segment.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        segment.split_at(segment.len() - suffix.len())
    } else {
        (segment, suffix.as_str())
    };

    let base = sanitize(base);
    let base = truncate_bytes(&base, MAX_NAME_BYTES - VARIANT_RESERVE - suffix.len());
    let base = if base.is_empty() { FALLBACK_STEM } else { base };

    format!("{}{}", base, suffix)
}

/// Filename for a page snapshot: the sanitized page URL plus `.html`
///
/// URLs too long for one filename keep a prefix followed by a hash of the
/// full URL, so distinct pages never share a snapshot file.
pub fn snapshot_filename(page_url: &str) -> String {
    const SUFFIX: &str = ".html";

    let name = sanitize(page_url);
    if name.is_empty() {
        return format!("page{}", SUFFIX);
    }
    if name.len() + SUFFIX.len() <= MAX_NAME_BYTES {
        return format!("{}{}", name, SUFFIX);
    }

    let digest = hex::encode(Sha256::digest(page_url.as_bytes()));
    let prefix = truncate_bytes(&name, MAX_NAME_BYTES - SUFFIX.len() - SNAPSHOT_HASH_LEN - 1);
    format!("{}-{}{}", prefix, &digest[..SNAPSHOT_HASH_LEN], SUFFIX)
}

/// Returns `name` with `-n` inserted before its extension
///
/// `numbered_variant("report.pdf", 2)` is `report-2.pdf`.
pub fn numbered_variant(name: &str, n: usize) -> String {
    let path = Path::new(name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{}-{}.{}", stem, n, ext),
        _ => format!("{}-{}", name, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_last_segment_kept() {
        assert_eq!(
            document_filename(&url("https://example.com/a/b/title-12.pdf"), "pdf"),
            "title-12.pdf"
        );
    }

    #[test]
    fn test_query_stripped() {
        assert_eq!(
            document_filename(&url("https://example.com/doc.pdf?download=1&x=y"), "pdf"),
            "doc.pdf"
        );
    }

    #[test]
    fn test_extension_appended_when_missing() {
        assert_eq!(
            document_filename(&url("https://example.com/content/pkg/CFR-2024"), "pdf"),
            "CFR-2024.pdf"
        );
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert_eq!(
            document_filename(&url("https://example.com/REPORT.PDF"), "pdf"),
            "REPORT.PDF"
        );
    }

    #[test]
    fn test_empty_segment_falls_back() {
        assert_eq!(
            document_filename(&url("https://example.com/"), "pdf"),
            "downloaded_file.pdf"
        );
        assert_eq!(
            document_filename(&url("https://example.com/dir/"), "pdf"),
            "downloaded_file.pdf"
        );
    }

    #[test]
    fn test_illegal_characters_replaced() {
        let name = document_filename(&url("https://example.com/a%22b*c|d.pdf"), "pdf");
        assert!(!name.contains('*'));
        assert!(!name.contains('|'));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_snapshot_filename() {
        let name = snapshot_filename("https://example.com/a/b?c=d");
        assert!(name.ends_with(".html"));
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
        assert!(!name.contains('?'));
    }

    #[test]
    fn test_long_segment_keeps_extension() {
        let segment = "a".repeat(300);
        let name = document_filename(&url(&format!("https://example.com/{}", segment)), "pdf");
        assert!(name.len() <= MAX_NAME_BYTES - VARIANT_RESERVE);
        assert!(name.ends_with(".pdf"));
        assert!(name.starts_with("aaaa"));

        let with_ext = document_filename(&url(&format!("https://example.com/{}.PDF", segment)), "pdf");
        assert!(with_ext.ends_with(".PDF"));
        assert!(with_ext.len() <= MAX_NAME_BYTES);
    }

    #[test]
    fn test_long_segment_numbered_variant_fits() {
        let name = document_filename(&url(&format!("https://example.com/{}", "b".repeat(400))), "pdf");
        assert!(numbered_variant(&name, 9999).len() <= MAX_NAME_BYTES);
    }

    #[test]
    fn test_long_snapshot_url_fits_and_stays_distinct() {
        let base = format!("https://example.com/search?q={}", "x".repeat(300));
        let first = snapshot_filename(&format!("{}1", base));
        let second = snapshot_filename(&format!("{}2", base));

        assert!(first.len() <= MAX_NAME_BYTES);
        assert!(first.ends_with(".html"));
        assert!(second.len() <= MAX_NAME_BYTES);
        assert_ne!(first, second);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("abc", 10), "abc");
    }

    #[test]
    fn test_numbered_variant() {
        assert_eq!(numbered_variant("report.pdf", 1), "report-1.pdf");
        assert_eq!(numbered_variant("archive.tar.gz", 2), "archive.tar-2.gz");
        assert_eq!(numbered_variant("README", 3), "README-3");
    }
}
