//! HTML link extraction
//!
//! This module pulls the followable links out of a parsed document. Link
//! targets are absolutized against the page's final URL and normalized so
//! they can be compared with entries in the visited set.

use crate::url::normalize_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Extracts all followable links from the HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not http(s) after resolution
///
/// `rel="nofollow"` links are followed. Results are normalized and
/// deduplicated in document order.
///
/// # Example
///
/// ```
/// use compass_audit::crawler::extract_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/page#top">A</a><a href="/page">B</a>"#);
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(&html, &base_url);
/// assert_eq!(links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    // Resolve, then normalize; normalization rejects non-HTTP(S) schemes
    let absolute_url = base_url.join(href).ok()?;
    normalize_url(absolute_url.as_str())
        .ok()
        .map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(&Html::parse_document(html), &base_url())
    }

    #[test]
    fn test_extract_absolute_link() {
        let links = links(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://other.com/page".to_string()]);
    }

    #[test]
    fn test_extract_relative_link() {
        let links = links(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let links = links(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn test_skip_javascript_link() {
        assert!(links(r#"<a href="javascript:void(0)">Link</a>"#).is_empty());
        assert!(links(r#"<a href="JavaScript:void(0)">Link</a>"#).is_empty());
    }

    #[test]
    fn test_skip_mailto_and_tel() {
        assert!(links(r#"<a href="mailto:test@example.com">Email</a>"#).is_empty());
        assert!(links(r#"<a href="tel:+48123456789">Call</a>"#).is_empty());
    }

    #[test]
    fn test_skip_data_uri() {
        assert!(links(r#"<a href="data:text/html,<h1>Test</h1>">Data</a>"#).is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        assert!(links(r#"<a href="/file.pdf" download>Download</a>"#).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        assert!(links(r##"<a href="#section">Jump</a>"##).is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let links = links(r#"<a href="/page2" rel="nofollow">Link</a>"#);
        assert_eq!(links, vec!["https://example.com/page2".to_string()]);
    }

    #[test]
    fn test_canonical_is_not_a_link() {
        let html = r#"<html><head><link rel="canonical" href="https://example.com/canonical" /></head><body></body></html>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_links_are_normalized_and_deduplicated() {
        let html = r##"
            <a href="/a?b=2&a=1">1</a>
            <a href="/a?a=1&b=2#x">2</a>
            <a href="https://EXAMPLE.com/a?a=1&b=2&utm_source=x">3</a>
            <a href="/z">4</a>
        "##;
        assert_eq!(
            links(html),
            vec![
                "https://example.com/a?a=1&b=2".to_string(),
                "https://example.com/z".to_string(),
            ]
        );
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let html = r#"
            <html>
            <body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Invalid</a>
                <a href="mailto:test@example.com">Invalid</a>
                <a href="/another-valid">Valid</a>
            </body>
            </html>
        "#;
        assert_eq!(links(html).len(), 2);
    }
}
