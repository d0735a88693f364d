//! Output handler traits and types
//!
//! This module defines the trait interface for report writers and the
//! document they render.

use crate::audit::AuditReport;
use crate::crawler::CrawlOutput;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a finished run hands to the report writers
#[derive(Debug, Clone, Copy)]
pub struct AuditDocument<'a> {
    /// Audit derived from the crawl
    pub report: &'a AuditReport,

    /// Raw per-page results and crawl counters
    pub crawl: &'a CrawlOutput,

    /// SHA-256 of the configuration file used for the run
    pub config_hash: &'a str,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AuditDocument<'_> {
    /// Wall-clock duration of the run in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds().max(0)
    }
}

/// Trait for report writers
///
/// Writers are called once at the end of a run. A failing writer does not
/// prevent the others from running; the caller decides how to report it.
pub trait OutputHandler {
    /// Short label used in log messages
    fn name(&self) -> &'static str;

    /// Renders and persists the document
    fn write_report(&self, document: &AuditDocument<'_>) -> OutputResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlStats;
    use chrono::TimeZone;

    #[test]
    fn test_duration_seconds() {
        let crawl = CrawlOutput {
            start_url: "https://example.com/".to_string(),
            results: Default::default(),
            stats: CrawlStats::default(),
        };
        let report = crate::audit(&crawl);
        let document = AuditDocument {
            report: &report,
            crawl: &crawl,
            config_hash: "abc123",
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap(),
        };
        assert_eq!(document.duration_seconds(), 90);
    }
}
