use crate::config::ExclusionConfig;
use crate::ConfigError;
use regex::{RegexSet, RegexSetBuilder};
use url::Url;

/// Compiled path patterns for excluded pages and system pages
///
/// Patterns are matched case-insensitively against the lowercased URL path,
/// so `^/cdn-cgi/` anchors at the start of the path, not the URL.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    excluded: RegexSet,
    system: RegexSet,
}

impl PathMatcher {
    /// Compiles both pattern lists from the exclusion configuration
    pub fn new(config: &ExclusionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            excluded: compile(&config.patterns)?,
            system: compile(&config.system_patterns)?,
        })
    }

    /// Returns true if the URL matches any exclusion pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use compass_audit::config::ExclusionConfig;
    /// use compass_audit::url::PathMatcher;
    /// use url::Url;
    ///
    /// let matcher = PathMatcher::new(&ExclusionConfig::default()).unwrap();
    /// assert!(matcher.is_excluded(&Url::parse("https://example.com/Privacy-Policy").unwrap()));
    /// assert!(!matcher.is_excluded(&Url::parse("https://example.com/offer").unwrap()));
    /// ```
    pub fn is_excluded(&self, url: &Url) -> bool {
        self.excluded.is_match(&url.path().to_lowercase())
    }

    /// Returns true if the URL looks like a utility page (cart, login, search...)
    pub fn is_system_page(&self, url: &Url) -> bool {
        self.system.is_match(&url.path().to_lowercase())
    }
}

fn compile(patterns: &[String]) -> Result<RegexSet, ConfigError> {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern(e.to_string()))
}
