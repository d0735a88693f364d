//! Audit summary and overall score

use super::duplicates::Duplicates;
use super::issues::{Issues, POOR_NAP_SCORE};
use crate::crawler::PageResult;
use crate::signals::round1;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Component weights of the overall score
pub const WEIGHT_AVAILABILITY: f64 = 0.30;
pub const WEIGHT_META: f64 = 0.15;
pub const WEIGHT_MOBILE: f64 = 0.15;
pub const WEIGHT_SCHEMA: f64 = 0.10;
pub const WEIGHT_TRUST: f64 = 0.10;
pub const WEIGHT_SECURITY: f64 = 0.20;

/// Deducted from the security component when any page lacks TLS
pub const NO_SSL_PENALTY: f64 = 0.10;

/// Each length issue costs this fraction of a page in the metadata component
const META_ISSUE_COST: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    /// Excellent >= 85, Good >= 70, Fair >= 50
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::Excellent,
            70..=84 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        write!(f, "{}", s)
    }
}

/// Overall score components, each in 0.0..=1.0 before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub availability: f64,
    pub meta: f64,
    pub mobile: f64,
    pub schema: f64,
    pub trust: f64,
    /// Average security percentage, minus the no-TLS penalty
    pub security: f64,
}

impl ScoreBreakdown {
    /// Weighted sum scaled to 0..=100, rounded and clamped
    pub fn overall(&self) -> u8 {
        let score = (self.availability * WEIGHT_AVAILABILITY
            + self.meta * WEIGHT_META
            + self.mobile * WEIGHT_MOBILE
            + self.schema * WEIGHT_SCHEMA
            + self.trust * WEIGHT_TRUST
            + self.security * WEIGHT_SECURITY)
            * 100.0;

        score.round().clamp(0.0, 100.0) as u8
    }
}

/// Site-wide rollup of an audit
///
/// Averages and percentages are taken over analyzed pages: everything
/// crawled except excluded and noindex pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub start_url: String,
    pub pages_crawled: usize,
    pub pages_analyzed: usize,
    pub pages_excluded: usize,
    pub pages_noindex: usize,
    pub pages_ok: usize,
    pub pages_with_errors: usize,
    pub missing_title: usize,
    pub missing_description: usize,
    pub title_issues: usize,
    pub description_issues: usize,
    pub duplicate_titles: usize,
    pub duplicate_descriptions: usize,
    pub missing_canonical: usize,
    pub missing_h1: usize,
    pub multiple_h1: usize,
    pub pages_with_alt_issues: usize,
    pub total_images_without_alt: usize,
    pub mobile_friendly_pages: usize,
    pub mobile_percentage: f64,
    pub pages_without_viewport: usize,
    pub pages_without_og: usize,
    pub pages_without_twitter: usize,
    pub pages_with_schema: usize,
    pub pages_without_schema: usize,
    pub avg_schema_types: f64,
    pub avg_eeat_score: f64,
    pub pages_weak_eeat: usize,
    pub local_optimized_pages: usize,
    pub pages_poor_local_seo: usize,
    pub thin_content_pages: usize,
    pub avg_security_score: f64,
    pub pages_with_ssl: usize,
    pub ssl_percentage: f64,
    pub pages_no_ssl: usize,
    pub pages_poor_security: usize,
    pub pages_missing_security_headers: usize,
    pub pages_with_mixed_content: usize,
    pub pages_with_info_disclosure: usize,
    pub generated_at: NaiveDate,
    pub score_breakdown: ScoreBreakdown,
    pub overall_score: u8,
    pub overall_grade: Grade,
}

/// Builds the summary from page results and the derived issues
pub fn summarize<'a, I>(
    start_url: &str,
    results: I,
    issues: &Issues,
    duplicates: &Duplicates,
    generated_at: NaiveDate,
) -> Summary
where
    I: IntoIterator<Item = &'a PageResult>,
{
    let results: Vec<&PageResult> = results.into_iter().collect();
    let analyzed: Vec<&PageResult> = results
        .iter()
        .copied()
        .filter(|r| !r.excluded && !r.is_noindex())
        .collect();

    let pages = analyzed.len().max(1) as f64;
    let signals = || analyzed.iter().filter_map(|r| r.signals.as_ref());

    let mobile_friendly_pages = signals().filter(|s| s.is_mobile_friendly).count();
    let pages_with_schema = signals().filter(|s| s.has_schema()).count();
    let schema_types: usize = signals().map(|s| s.schema_count).sum();
    let trust_total: f64 = signals().map(|s| s.trust.percentage).sum();
    let security_total: f64 = signals().map(|s| s.security.percentage).sum();
    let pages_with_ssl = signals().filter(|s| s.security.has_ssl).count();
    let local_optimized_pages = signals()
        .filter(|s| s.nap.nap_score >= POOR_NAP_SCORE)
        .count();

    let mut summary = Summary {
        start_url: start_url.to_string(),
        pages_crawled: results.len(),
        pages_analyzed: analyzed.len(),
        pages_excluded: results.iter().filter(|r| r.excluded).count(),
        pages_noindex: results.iter().filter(|r| r.is_noindex()).count(),
        pages_ok: analyzed.iter().filter(|r| r.status == Some(200)).count(),
        pages_with_errors: issues.critical_errors.len(),
        missing_title: issues.missing_title.len(),
        missing_description: issues.missing_description.len(),
        title_issues: issues.title_issues.len(),
        description_issues: issues.description_issues.len(),
        duplicate_titles: duplicates.title.len(),
        duplicate_descriptions: duplicates.description.len(),
        missing_canonical: issues.missing_canonical.len(),
        missing_h1: issues.missing_h1.len(),
        multiple_h1: issues.multiple_h1.len(),
        pages_with_alt_issues: issues.images_no_alt.len(),
        total_images_without_alt: issues.images_no_alt.iter().map(|i| i.missing_alt).sum(),
        mobile_friendly_pages,
        mobile_percentage: round1(mobile_friendly_pages as f64 / pages * 100.0),
        pages_without_viewport: issues.no_viewport.len(),
        pages_without_og: issues.no_og_tags.len(),
        pages_without_twitter: issues.no_twitter_cards.len(),
        pages_with_schema,
        pages_without_schema: issues.missing_schema.len(),
        avg_schema_types: round1(schema_types as f64 / pages),
        avg_eeat_score: round1(trust_total / pages),
        pages_weak_eeat: issues.weak_eeat.len(),
        local_optimized_pages,
        pages_poor_local_seo: issues.poor_local_seo.len(),
        thin_content_pages: issues.thin_content.len(),
        avg_security_score: round1(security_total / pages),
        pages_with_ssl,
        ssl_percentage: round1(pages_with_ssl as f64 / pages * 100.0),
        pages_no_ssl: issues.no_ssl.len(),
        pages_poor_security: issues.poor_security.len(),
        pages_missing_security_headers: issues.missing_security_headers.len(),
        pages_with_mixed_content: issues.mixed_content.len(),
        pages_with_info_disclosure: issues.info_disclosure.len(),
        generated_at,
        score_breakdown: ScoreBreakdown::default(),
        overall_score: 0,
        overall_grade: Grade::Poor,
    };

    summary.score_breakdown = score_breakdown(&summary);
    summary.overall_score = summary.score_breakdown.overall();
    summary.overall_grade = Grade::from_score(summary.overall_score);
    summary
}

/// Derives the score components from the summary counters
pub fn score_breakdown(summary: &Summary) -> ScoreBreakdown {
    let pages = summary.pages_analyzed.max(1) as f64;

    let meta_ok_pages = pages - (summary.missing_title + summary.missing_description) as f64;
    let length_issues = (summary.title_issues + summary.description_issues) as f64;
    let meta = ((meta_ok_pages - META_ISSUE_COST * length_issues) / pages).max(0.0);

    let mut security = summary.avg_security_score / 100.0;
    if summary.pages_no_ssl > 0 {
        security = (security - NO_SSL_PENALTY).max(0.0);
    }

    ScoreBreakdown {
        availability: summary.pages_ok as f64 / pages,
        meta,
        mobile: summary.mobile_percentage / 100.0,
        schema: summary.pages_with_schema as f64 / pages,
        trust: summary.avg_eeat_score / 100.0,
        security,
    }
}
