//! Sitemap discovery and `<loc>` extraction
//!
//! Parsing is a case-insensitive scan for `<loc>` elements. It accepts
//! malformed XML and treats sitemap indexes like urlsets.

use crate::crawler::{FetchOutcome, Fetcher};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Well-known sitemap locations probed relative to the site root
const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>(.*?)</loc>").expect("static regex"));

/// Probes the well-known sitemap locations under `root`
///
/// Keeps the final URL of every response with status < 400 whose content
/// type mentions `xml`. Network failures are skipped.
pub async fn discover_sitemaps(fetcher: &Fetcher, root: &Url) -> Vec<String> {
    let mut found = Vec::new();

    for path in SITEMAP_PATHS {
        let Ok(candidate) = root.join(path) else {
            continue;
        };

        match fetcher.fetch(candidate.as_str()).await {
            FetchOutcome::Response(page)
                if page.is_ok() && page.content_type.to_ascii_lowercase().contains("xml") =>
            {
                tracing::debug!("Found sitemap at {}", page.final_url);
                found.push(page.final_url);
            }
            FetchOutcome::Response(page) => {
                tracing::trace!(
                    "No sitemap at {} (status {}, content-type '{}')",
                    candidate,
                    page.status,
                    page.content_type
                );
            }
            FetchOutcome::Failed(failure) => {
                tracing::debug!("Sitemap probe {} failed: {}", candidate, failure.message);
            }
        }
    }

    found
}

/// Extracts every `<loc>` value from a sitemap document
///
/// # Example
///
/// ```
/// use compass_audit::robots::parse_sitemap_urls;
///
/// let xml = "<urlset><url><LOC> https://example.com/a </LOC></url><url><loc></loc></url></urlset>";
/// assert_eq!(parse_sitemap_urls(xml), vec!["https://example.com/a".to_string()]);
/// ```
pub fn parse_sitemap_urls(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let value = caps.get(1)?.as_str().trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

/// Fetches each sitemap and returns the deduplicated `<loc>` values
///
/// Order follows the sitemaps and the entries within them; failed or
/// error-status sitemaps contribute nothing.
pub async fn fetch_sitemap_urls(fetcher: &Fetcher, sitemaps: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for sitemap in sitemaps {
        match fetcher.fetch(sitemap).await {
            FetchOutcome::Response(page) if page.is_ok() => {
                for loc in parse_sitemap_urls(&page.body) {
                    if seen.insert(loc.clone()) {
                        urls.push(loc);
                    }
                }
            }
            FetchOutcome::Response(page) => {
                tracing::debug!("Sitemap {} returned status {}", sitemap, page.status);
            }
            FetchOutcome::Failed(failure) => {
                tracing::debug!("Sitemap {} failed: {}", sitemap, failure.message);
            }
        }
    }

    tracing::info!(
        "Collected {} URLs from {} sitemap(s)",
        urls.len(),
        sitemaps.len()
    );
    urls
}
