//! Robots.txt policy
//!
//! Wraps the robotstxt crate's matcher behind a small policy type that can
//! also represent "no usable robots.txt" (allow everything).

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// This is used when robots.txt cannot be fetched, returns an error
    /// status, or when robots checks are switched off.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this policy came from an actual robots.txt body
    pub fn is_permissive(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks if a URL may be fetched by the given user agent
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The product token robots groups are matched against
    /// * `url` - Absolute URL (or path) to check
    ///
    /// # Example
    ///
    /// ```
    /// use compass_audit::robots::RobotsPolicy;
    ///
    /// let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /private/");
    /// assert!(!robots.can_fetch("CompassBot", "https://example.com/private/page"));
    /// assert!(robots.can_fetch("CompassBot", "https://example.com/public"));
    /// ```
    pub fn can_fetch(&self, user_agent: &str, url: &str) -> bool {
        if self.is_permissive() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Sitemap URLs declared with `Sitemap:` lines, in file order
    pub fn sitemaps(&self) -> Vec<String> {
        self.content
            .lines()
            .filter_map(|line| {
                let (key, value) = line.trim().split_once(':')?;
                if key.trim().eq_ignore_ascii_case("sitemap") {
                    let value = value.trim();
                    (!value.is_empty()).then(|| value.to_string())
                } else {
                    None
                }
            })
            .collect()
    }
}
