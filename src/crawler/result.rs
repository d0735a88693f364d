//! Per-page crawl results

use crate::crawler::fetcher::FetchErrorKind;
use crate::signals::PageSignals;
use crate::state::PageState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a page has no usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageError {
    BlockedByRobots,
    Timeout,
    Connection,
    Protocol,
}

impl PageError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockedByRobots => "blocked_by_robots",
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Protocol => "protocol",
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<FetchErrorKind> for PageError {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::Timeout => Self::Timeout,
            FetchErrorKind::Connection => Self::Connection,
            FetchErrorKind::Protocol => Self::Protocol,
        }
    }
}

/// The outcome of processing one crawl task
///
/// Every task popped from the frontier produces exactly one of these, keyed
/// by the URL that was requested (not the final URL after redirects).
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub url: String,
    pub final_url: String,
    pub depth: u32,
    pub state: PageState,
    pub status: Option<u16>,
    pub content_type: String,
    pub headers: BTreeMap<String, String>,
    pub error: Option<PageError>,
    pub error_detail: Option<String>,
    pub note: Option<String>,
    /// Matches an exclusion pattern
    pub excluded: bool,
    /// Utility page (cart, login, search...)
    pub system_page: bool,
    pub signals: Option<PageSignals>,
}

impl PageResult {
    /// A result with no response attached yet
    pub fn new(url: &str, depth: u32, state: PageState) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            depth,
            state,
            status: None,
            content_type: String::new(),
            headers: BTreeMap::new(),
            error: None,
            error_detail: None,
            note: None,
            excluded: false,
            system_page: false,
            signals: None,
        }
    }

    /// Robots meta asked for no indexing
    pub fn is_noindex(&self) -> bool {
        self.signals.as_ref().is_some_and(|s| s.is_noindex())
    }

    /// Response declared HTML, or nothing at all
    pub fn is_html_or_untyped(&self) -> bool {
        self.content_type.is_empty() || self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// No response, or an error status
    pub fn is_broken(&self) -> bool {
        self.status.map_or(true, |status| status >= 400)
    }
}

/// Counters collected while crawling
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlStats {
    pub pages_stored: usize,
    pub robots_blocked: usize,
    pub fetch_failed: usize,
    pub non_html_skipped: usize,
    pub sitemap_seeds: usize,
    pub duration_secs: f64,
}

impl CrawlStats {
    pub fn record(&mut self, state: PageState) {
        match state {
            PageState::Stored => self.pages_stored += 1,
            PageState::RobotsBlocked => self.robots_blocked += 1,
            PageState::FetchFailed => self.fetch_failed += 1,
            PageState::NonHtmlSkipped => self.non_html_skipped += 1,
            PageState::Queued | PageState::InFlight => {}
        }
    }

    pub fn total(&self) -> usize {
        self.pages_stored + self.robots_blocked + self.fetch_failed + self.non_html_skipped
    }
}

/// Everything a crawl run produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutput {
    pub start_url: String,
    pub results: BTreeMap<String, PageResult>,
    pub stats: CrawlStats,
}
