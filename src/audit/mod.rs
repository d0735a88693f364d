//! Audit stage: from page results to issues, duplicates and a score
//!
//! The audit is a pure function of a finished crawl. It never fetches and
//! never fails.

mod duplicates;
mod issues;
mod summary;

pub use duplicates::{find_duplicates, Duplicates};
pub use issues::{
    analyze_issues, CriticalError, DescriptionIssue, ImagesNoAlt, InfoDisclosure, Issues,
    MissingOpenGraph, MissingSecurityHeaders, MultipleH1, PoorLocalSeo, PoorSecurity,
    ThinContent, TitleIssue, WeakTrust, MIN_SECURITY_HEADERS, POOR_NAP_SCORE,
    POOR_SECURITY_PERCENTAGE, THIN_CONTENT_WORDS, WEAK_TRUST_PERCENTAGE,
};
pub use summary::{
    score_breakdown, summarize, Grade, ScoreBreakdown, Summary, NO_SSL_PENALTY,
    WEIGHT_AVAILABILITY, WEIGHT_META, WEIGHT_MOBILE, WEIGHT_SCHEMA, WEIGHT_SECURITY, WEIGHT_TRUST,
};

use crate::crawler::CrawlOutput;
use serde::Serialize;

/// Everything the audit derives from a crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub summary: Summary,
    pub issues: Issues,
    pub duplicates: Duplicates,
}

/// Audits a finished crawl, dated today
///
/// # Example
///
/// ```
/// use compass_audit::audit;
/// use compass_audit::crawler::CrawlOutput;
///
/// let output = CrawlOutput {
///     start_url: "https://example.com/".to_string(),
///     results: Default::default(),
///     stats: Default::default(),
/// };
/// let report = audit(&output);
/// assert_eq!(report.summary.pages_crawled, 0);
/// ```
pub fn audit(output: &CrawlOutput) -> AuditReport {
    audit_on(output, chrono::Local::now().date_naive())
}

/// Audits a finished crawl with an explicit report date
pub fn audit_on(output: &CrawlOutput, generated_at: chrono::NaiveDate) -> AuditReport {
    let duplicates = find_duplicates(output.results.values());
    let issues = analyze_issues(output.results.values());
    let summary = summarize(
        &output.start_url,
        output.results.values(),
        &issues,
        &duplicates,
        generated_at,
    );

    tracing::info!(
        "Audit complete: score {} ({}), {} issues across {} pages",
        summary.overall_score,
        summary.overall_grade,
        issues.total(),
        summary.pages_analyzed
    );

    AuditReport {
        summary,
        issues,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlStats, PageError, PageResult};
    use crate::signals::analyze_page;
    use crate::state::PageState;
    use crate::DomainScope;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use url::Url;

    fn stored(url: &str, html: &str) -> PageResult {
        let mut result = PageResult::new(url, 0, PageState::Stored);
        result.status = Some(200);
        result.content_type = "text/html".to_string();
        result.signals = Some(analyze_page(
            html,
            &Url::parse(url).unwrap(),
            &BTreeMap::new(),
            DomainScope::ExactHost,
        ));
        result
    }

    fn output(results: Vec<PageResult>) -> CrawlOutput {
        CrawlOutput {
            start_url: "https://example.com/".to_string(),
            results: results.into_iter().map(|r| (r.url.clone(), r)).collect(),
            stats: CrawlStats::default(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_empty_crawl() {
        let report = audit_on(&output(Vec::new()), date());
        assert_eq!(report.summary.pages_crawled, 0);
        assert_eq!(report.issues.total(), 0);
        assert!(report.duplicates.is_empty());
        assert_eq!(report.summary.generated_at, date());
    }

    #[test]
    fn test_duplicates_and_issues_agree() {
        let report = audit_on(
            &output(vec![
                stored("https://example.com/", "<title>Home</title>"),
                stored("https://example.com/about", "<title>Home</title>"),
            ]),
            date(),
        );
        assert_eq!(report.duplicates.title["Home"].len(), 2);
        assert_eq!(report.summary.duplicate_titles, 1);
        assert_eq!(report.issues.missing_description.len(), 2);
    }

    #[test]
    fn test_failed_fetch_is_critical() {
        let mut failed = PageResult::new("https://example.com/down", 1, PageState::FetchFailed);
        failed.error = Some(PageError::Timeout);
        let report = audit_on(
            &output(vec![
                stored("https://example.com/", "<title>Home</title>"),
                failed,
            ]),
            date(),
        );
        assert_eq!(report.issues.critical_errors.len(), 1);
        assert_eq!(report.summary.pages_with_errors, 1);
    }
}
