//! JSON report writer

use crate::audit::{Duplicates, Issues, Summary};
use crate::crawler::{CrawlStats, PageResult};
use crate::output::traits::{AuditDocument, OutputHandler, OutputResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serialized layout of the JSON report
#[derive(Serialize)]
struct JsonReport<'a> {
    start_url: &'a str,
    config_hash: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    duration_seconds: i64,
    stats: &'a CrawlStats,
    summary: &'a Summary,
    issues: &'a Issues,
    duplicates: &'a Duplicates,
    pages: &'a BTreeMap<String, PageResult>,
}

impl<'a> From<&AuditDocument<'a>> for JsonReport<'a> {
    fn from(document: &AuditDocument<'a>) -> Self {
        Self {
            start_url: &document.crawl.start_url,
            config_hash: document.config_hash,
            started_at: document.started_at,
            finished_at: document.finished_at,
            duration_seconds: document.duration_seconds(),
            stats: &document.crawl.stats,
            summary: &document.report.summary,
            issues: &document.report.issues,
            duplicates: &document.report.duplicates,
            pages: &document.crawl.results,
        }
    }
}

/// Writes the full audit as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonReportWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write_report(&self, document: &AuditDocument<'_>) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &JsonReport::from(document))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Renders the document as a JSON value
pub fn to_json_value(document: &AuditDocument<'_>) -> OutputResult<serde_json::Value> {
    Ok(serde_json::to_value(JsonReport::from(document))?)
}
