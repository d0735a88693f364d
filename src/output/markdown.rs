//! Markdown summary generation
//!
//! This module generates a human-readable summary of an audit: the overall
//! score, its components, issue counts and the pages behind the most
//! pressing problems.

use crate::audit::{
    Summary, WEIGHT_AVAILABILITY, WEIGHT_META, WEIGHT_MOBILE, WEIGHT_SCHEMA, WEIGHT_SECURITY,
    WEIGHT_TRUST,
};
use crate::output::traits::{AuditDocument, OutputHandler, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How many URLs to list under each detailed section
const LISTED_URLS: usize = 20;

/// Writes the audit summary as Markdown
#[derive(Debug, Clone)]
pub struct MarkdownSummaryWriter {
    path: PathBuf,
}

impl MarkdownSummaryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for MarkdownSummaryWriter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write_report(&self, document: &AuditDocument<'_>) -> OutputResult<()> {
        let markdown = format_markdown_summary(document);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats an audit document as markdown
pub fn format_markdown_summary(document: &AuditDocument<'_>) -> String {
    let summary = &document.report.summary;
    let issues = &document.report.issues;
    let duplicates = &document.report.duplicates;
    let mut md = String::new();

    md.push_str("# Site Audit Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", summary.start_url));
    md.push_str(&format!("- **Report Date**: {}\n", summary.generated_at));
    md.push_str(&format!("- **Started**: {}\n", document.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", document.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        document.duration_seconds()
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", document.config_hash));

    // Score
    md.push_str("## Overall Score\n\n");
    md.push_str(&format!(
        "**{} / 100** ({})\n\n",
        summary.overall_score, summary.overall_grade
    ));

    let breakdown = &summary.score_breakdown;
    md.push_str("| Component | Weight | Score |\n");
    md.push_str("|-----------|--------|-------|\n");
    for (name, weight, value) in [
        ("Availability", WEIGHT_AVAILABILITY, breakdown.availability),
        ("Metadata", WEIGHT_META, breakdown.meta),
        ("Mobile", WEIGHT_MOBILE, breakdown.mobile),
        ("Structured Data", WEIGHT_SCHEMA, breakdown.schema),
        ("Trust (E-E-A-T)", WEIGHT_TRUST, breakdown.trust),
        ("Security", WEIGHT_SECURITY, breakdown.security),
    ] {
        md.push_str(&format!(
            "| {} | {:.0}% | {:.1}% |\n",
            name,
            weight * 100.0,
            value * 100.0
        ));
    }
    md.push('\n');

    push_page_counts(&mut md, summary, document);

    // Issue counts
    md.push_str("## Issues\n\n");
    md.push_str("| Category | Pages |\n");
    md.push_str("|----------|-------|\n");
    for (category, count) in issues.counts() {
        md.push_str(&format!("| {} | {} |\n", category, count));
    }
    md.push_str(&format!("| **total** | **{}** |\n\n", issues.total()));

    if !issues.critical_errors.is_empty() {
        md.push_str("## Critical Errors\n\n");
        md.push_str("| URL | Status | Error |\n");
        md.push_str("|-----|--------|-------|\n");
        for entry in issues.critical_errors.iter().take(LISTED_URLS) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.url,
                entry
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                entry.error.as_deref().unwrap_or("-")
            ));
        }
        push_overflow(&mut md, issues.critical_errors.len());
    }

    if !duplicates.title.is_empty() {
        md.push_str("## Duplicate Titles\n\n");
        for (title, urls) in duplicates.title.iter().take(LISTED_URLS) {
            md.push_str(&format!("- \"{}\" ({} pages)\n", title, urls.len()));
        }
        push_overflow(&mut md, duplicates.title.len());
    }

    if !duplicates.description.is_empty() {
        md.push_str("## Duplicate Descriptions\n\n");
        for (description, urls) in duplicates.description.iter().take(LISTED_URLS) {
            md.push_str(&format!("- \"{}\" ({} pages)\n", description, urls.len()));
        }
        push_overflow(&mut md, duplicates.description.len());
    }

    // Security
    md.push_str("## Security\n\n");
    md.push_str(&format!(
        "- **Average Security Score**: {:.1}%\n",
        summary.avg_security_score
    ));
    md.push_str(&format!(
        "- **HTTPS Coverage**: {:.1}% ({} pages without TLS)\n",
        summary.ssl_percentage, summary.pages_no_ssl
    ));
    md.push_str(&format!(
        "- **Mixed Content**: {} pages\n",
        summary.pages_with_mixed_content
    ));
    md.push_str(&format!(
        "- **Server Info Disclosure**: {} pages\n\n",
        summary.pages_with_info_disclosure
    ));

    md
}

fn push_page_counts(md: &mut String, summary: &Summary, document: &AuditDocument<'_>) {
    let stats = &document.crawl.stats;

    md.push_str("## Pages\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Crawled | {} |\n", summary.pages_crawled));
    md.push_str(&format!("| Analyzed | {} |\n", summary.pages_analyzed));
    md.push_str(&format!("| OK (200) | {} |\n", summary.pages_ok));
    md.push_str(&format!("| With Errors | {} |\n", summary.pages_with_errors));
    md.push_str(&format!("| Excluded | {} |\n", summary.pages_excluded));
    md.push_str(&format!("| Noindex | {} |\n", summary.pages_noindex));
    md.push_str(&format!("| Blocked by robots.txt | {} |\n", stats.robots_blocked));
    md.push_str(&format!("| Non-HTML Skipped | {} |\n", stats.non_html_skipped));
    md.push_str(&format!("| Sitemap Seeds | {} |\n\n", stats.sitemap_seeds));

    md.push_str("## Averages\n\n");
    md.push_str(&format!(
        "- **Mobile Friendly**: {:.1}%\n",
        summary.mobile_percentage
    ));
    md.push_str(&format!(
        "- **Schema Types per Page**: {:.1}\n",
        summary.avg_schema_types
    ));
    md.push_str(&format!("- **E-E-A-T Score**: {:.1}%\n", summary.avg_eeat_score));
    md.push_str(&format!(
        "- **Local SEO Optimized Pages**: {}\n\n",
        summary.local_optimized_pages
    ));
}

fn push_overflow(md: &mut String, total: usize) {
    if total > LISTED_URLS {
        md.push_str(&format!("\n... and {} more\n\n", total - LISTED_URLS));
    } else {
        md.push('\n');
    }
}
