use crate::url::DomainScope;
use serde::{Deserialize, Serialize};

/// Main configuration structure for Compass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub exclusions: ExclusionConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Page the crawl starts from; also the root for robots.txt and sitemaps
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of page results recorded in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the start URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of worker tasks pulling from the frontier (defaults to `concurrency`)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Maximum number of simultaneous outbound requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    /// Seed the frontier from /sitemap.xml and /sitemap_index.xml
    #[serde(rename = "use-sitemaps", default)]
    pub use_sitemaps: bool,

    #[serde(rename = "domain-scope", default)]
    pub domain_scope: DomainScope,
}

impl CrawlerConfig {
    /// Effective worker count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or(self.concurrency)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler; also the product token matched against robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Full user agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON audit report
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
            summary_path: default_summary_path(),
        }
    }
}

/// Path patterns that shape what the audit looks at
///
/// Both lists are regular expressions matched case-insensitively against
/// the lowercased URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// Pages matching these are never followed from links or sitemaps, and
    /// are left out of duplicates and issues if reached anyway
    #[serde(default = "default_excluded_patterns")]
    pub patterns: Vec<String>,

    /// Utility pages (cart, login, search...) that skip content-oriented checks
    #[serde(rename = "system-patterns", default = "default_system_patterns")]
    pub system_patterns: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            patterns: default_excluded_patterns(),
            system_patterns: default_system_patterns(),
        }
    }
}

fn default_max_pages() -> usize {
    300
}

fn default_max_depth() -> u32 {
    3
}

fn default_concurrency() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_true() -> bool {
    true
}

fn default_json_path() -> String {
    "./audit-report.json".to_string()
}

fn default_summary_path() -> String {
    "./audit-summary.md".to_string()
}

fn default_excluded_patterns() -> Vec<String> {
    [
        r"/polityka[_-]prywatnosci",
        r"/privacy[_-]policy",
        r"/regulamin",
        r"/terms",
        r"/sitemap",
        r"/robots\.txt",
        r"/cookies?[_-]policy",
        r"/disclaimer",
        r"/terms-of-service",
        r"/legal",
        r"^/cdn-cgi/",
        r"/cdn-cgi/l/email-protection",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_system_patterns() -> Vec<String> {
    [
        r"/konto[_-]?uzytkownika",
        r"/mein[_-]?konto",
        r"/my[_-]?account",
        r"/account",
        r"/cart",
        r"/koszyk",
        r"/warenkorb",
        r"/checkout",
        r"/zamowienie",
        r"/bestellung",
        r"/login",
        r"/logowanie",
        r"/anmelden",
        r"/register",
        r"/rejestracja",
        r"/registrieren",
        r"/wholesale[_-]?login",
        r"/wp-admin",
        r"/wp-login",
        r"/wp-content/uploads/.*\.(pdf|doc|docx|xls|xlsx)$",
        r"/feed/?$",
        r"/rss/?$",
        r"/search",
        r"/suche",
        r"/szukaj",
        r"/404",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
