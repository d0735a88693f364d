//! URL handling module for Compass
//!
//! This module provides URL normalization, absolutization, domain extraction,
//! same-site comparison and path-pattern matching.

mod domain;
mod matcher;
mod normalize;

use serde::{Deserialize, Serialize};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, registrable_domain};
pub use matcher::PathMatcher;
pub use normalize::{absolutize, normalize_url};

/// How far beyond the start URL's host a crawl may wander
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainScope {
    /// Same scheme, host and port as the start URL
    #[default]
    ExactHost,
    /// Any http(s) URL sharing the registrable domain (subdomains included)
    RegistrableDomain,
}

/// Returns true if `candidate` belongs to the same site as `root`
///
/// # Examples
///
/// ```
/// use compass_audit::url::{same_site, DomainScope};
/// use url::Url;
///
/// let root = Url::parse("https://example.com/").unwrap();
/// let blog = Url::parse("https://blog.example.com/post").unwrap();
///
/// assert!(!same_site(&root, &blog, DomainScope::ExactHost));
/// assert!(same_site(&root, &blog, DomainScope::RegistrableDomain));
/// ```
pub fn same_site(root: &Url, candidate: &Url, scope: DomainScope) -> bool {
    match scope {
        DomainScope::ExactHost => {
            root.scheme() == candidate.scheme()
                && extract_domain(root) == extract_domain(candidate)
                && root.port_or_known_default() == candidate.port_or_known_default()
        }
        DomainScope::RegistrableDomain => {
            matches!(candidate.scheme(), "http" | "https")
                && registrable_domain(candidate).is_some()
                && registrable_domain(root) == registrable_domain(candidate)
        }
    }
}
