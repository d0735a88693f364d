/// Page state definitions for tracking crawl progress
///
/// A task moves `Queued -> InFlight -> terminal`. Every terminal state
/// produces exactly one page result.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Active States =====
    /// Task is in the frontier waiting for a worker
    Queued,

    /// A worker has reserved the task and is checking robots or fetching
    InFlight,

    // ===== Terminal States =====
    /// HTML page fetched and analyzed
    Stored,

    /// Disallowed by robots.txt; never fetched
    RobotsBlocked,

    /// Timeout, connection or protocol failure
    FetchFailed,

    /// Fetched, but the content type was not HTML
    NonHtmlSkipped,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::InFlight)
    }

    /// Returns true if this represents a successful completion with signals
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Stored)
    }

    /// Returns true if the page was never fetched or the fetch failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::RobotsBlocked | Self::FetchFailed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: PageState) -> bool {
        match self {
            Self::Queued => next == Self::InFlight,
            Self::InFlight => next.is_terminal(),
            _ => false,
        }
    }

    /// Stable lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InFlight => "in_flight",
            Self::Stored => "stored",
            Self::RobotsBlocked => "robots_blocked",
            Self::FetchFailed => "fetch_failed",
            Self::NonHtmlSkipped => "non_html_skipped",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::InFlight,
            Self::Stored,
            Self::RobotsBlocked,
            Self::FetchFailed,
            Self::NonHtmlSkipped,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
