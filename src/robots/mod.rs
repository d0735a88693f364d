//! Compliance gate: robots.txt and sitemaps
//!
//! This module fetches and evaluates robots.txt for the crawl root and
//! discovers sitemap URLs used to seed the frontier. Nothing here can fail
//! a crawl: an unreachable robots.txt means "allow everything" and a missing
//! sitemap means "no extra seeds".

mod parser;
mod sitemap;

pub use parser::RobotsPolicy;
pub use sitemap::{discover_sitemaps, fetch_sitemap_urls, parse_sitemap_urls};

use crate::crawler::{FetchOutcome, Fetcher};
use url::Url;

/// Fetches robots.txt relative to the crawl root
///
/// # Returns
///
/// A policy parsed from the body when the server answers with a status
/// below 400; a permissive policy otherwise. Failures are logged as
/// warnings, never propagated.
pub async fn load_robots(fetcher: &Fetcher, root: &Url) -> RobotsPolicy {
    let robots_url = match root.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Robots unavailable for {}: {}", root, e);
            return RobotsPolicy::allow_all();
        }
    };

    tracing::debug!("Fetching {}", robots_url);

    match fetcher.fetch(robots_url.as_str()).await {
        FetchOutcome::Response(page) if page.is_ok() => {
            tracing::info!("Loaded robots.txt from {}", robots_url);
            RobotsPolicy::from_content(&page.body)
        }
        FetchOutcome::Response(page) => {
            tracing::warn!(
                "Robots unavailable at {} (HTTP {}), allowing all",
                robots_url,
                page.status
            );
            RobotsPolicy::allow_all()
        }
        FetchOutcome::Failed(failure) => {
            tracing::warn!(
                "Robots unavailable at {} ({}), allowing all",
                robots_url,
                failure.message
            );
            RobotsPolicy::allow_all()
        }
    }
}
