//! Output module for writing audit reports
//!
//! This module handles:
//! - The full JSON report (summary, issues, duplicates and every page)
//! - A human-readable Markdown summary
//!
//! Writers only run after the crawl and audit have finished.

mod json;
mod markdown;
mod traits;

pub use json::{to_json_value, JsonReportWriter};
pub use markdown::{format_markdown_summary, MarkdownSummaryWriter};
pub use traits::{AuditDocument, OutputError, OutputHandler, OutputResult};

/// Runs every writer, returning the first failure after all have been tried
pub fn write_all(
    handlers: &[Box<dyn OutputHandler>],
    document: &AuditDocument<'_>,
) -> OutputResult<()> {
    let mut first_error = None;

    for handler in handlers {
        match handler.write_report(document) {
            Ok(()) => tracing::info!("Wrote {} report", handler.name()),
            Err(e) => {
                tracing::error!("Failed to write {} report: {}", handler.name(), e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlOutput, CrawlStats};
    use chrono::Utc;

    #[test]
    fn test_write_all_continues_after_failure() {
        let crawl = CrawlOutput {
            start_url: "https://example.com/".to_string(),
            results: Default::default(),
            stats: CrawlStats::default(),
        };
        let report = crate::audit(&crawl);
        let now = Utc::now();
        let document = AuditDocument {
            report: &report,
            crawl: &crawl,
            config_hash: "abc",
            started_at: now,
            finished_at: now,
        };

        let dir = tempfile::tempdir().unwrap();
        let summary_path = dir.path().join("summary.md");
        let handlers: Vec<Box<dyn OutputHandler>> = vec![
            Box::new(JsonReportWriter::new(dir.path().join("missing/report.json"))),
            Box::new(MarkdownSummaryWriter::new(&summary_path)),
        ];

        assert!(write_all(&handlers, &document).is_err());
        assert!(summary_path.exists());
    }
}
