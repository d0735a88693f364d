//! Per-page issue detection
//!
//! One pass over every page result sorts the problems it shows into 21
//! categories. Each category holds typed entries carrying the URL and the
//! details a reader needs to fix the page.

use crate::crawler::PageResult;
use crate::signals::{LengthClass, PageSignals, PageType, SecurityLevel};
use serde::Serialize;

/// Weak trust: percentage below this
pub const WEAK_TRUST_PERCENTAGE: f64 = 50.0;
/// Poor local SEO: normalized NAP score below this
pub const POOR_NAP_SCORE: u8 = 2;
/// Thin content: fewer words than this (but more than zero)
pub const THIN_CONTENT_WORDS: usize = 300;
/// Poor security: percentage below this
pub const POOR_SECURITY_PERCENTAGE: f64 = 50.0;
/// Missing security headers: fewer present than this
pub const MIN_SECURITY_HEADERS: usize = 3;

/// Description excerpt length in issue entries
const DESCRIPTION_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalError {
    pub url: String,
    pub status: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleIssue {
    pub url: String,
    pub title: String,
    pub length: usize,
    pub too_short: bool,
    pub too_long: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionIssue {
    pub url: String,
    /// First 100 characters
    pub description: String,
    pub length: usize,
    pub too_short: bool,
    pub too_long: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipleH1 {
    pub url: String,
    pub h1_count: usize,
    pub h1_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagesNoAlt {
    pub url: String,
    pub missing_alt: usize,
    pub total_images: usize,
    pub alt_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingOpenGraph {
    pub url: String,
    pub has_og_image: bool,
    pub has_og_title: bool,
    pub has_og_description: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakTrust {
    pub url: String,
    pub page_type: PageType,
    pub eeat_score: f64,
    pub eeat_percentage: f64,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoorLocalSeo {
    pub url: String,
    pub nap_score: u8,
    pub phone_numbers: usize,
    pub has_address: bool,
    pub has_local_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThinContent {
    pub url: String,
    pub word_count: usize,
    pub text_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoorSecurity {
    pub url: String,
    pub security_percentage: f64,
    pub security_level: SecurityLevel,
    pub missing_headers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSecurityHeaders {
    pub url: String,
    pub headers_count: usize,
    pub missing_critical: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoDisclosure {
    pub url: String,
    pub server_header: String,
    pub powered_by: String,
}

/// All categorized issues of an audit
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Issues {
    pub critical_errors: Vec<CriticalError>,
    pub missing_title: Vec<String>,
    pub missing_description: Vec<String>,
    pub missing_canonical: Vec<String>,
    pub missing_h1: Vec<String>,
    pub multiple_h1: Vec<MultipleH1>,
    pub images_no_alt: Vec<ImagesNoAlt>,
    pub no_viewport: Vec<String>,
    pub no_og_tags: Vec<MissingOpenGraph>,
    pub no_twitter_cards: Vec<String>,
    pub missing_schema: Vec<String>,
    pub weak_eeat: Vec<WeakTrust>,
    pub poor_local_seo: Vec<PoorLocalSeo>,
    pub thin_content: Vec<ThinContent>,
    pub title_issues: Vec<TitleIssue>,
    pub description_issues: Vec<DescriptionIssue>,
    pub no_ssl: Vec<String>,
    pub missing_security_headers: Vec<MissingSecurityHeaders>,
    pub poor_security: Vec<PoorSecurity>,
    pub mixed_content: Vec<String>,
    pub info_disclosure: Vec<InfoDisclosure>,
}

impl Issues {
    /// (category name, entry count) for every category, in report order
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("critical_errors", self.critical_errors.len()),
            ("missing_title", self.missing_title.len()),
            ("missing_description", self.missing_description.len()),
            ("missing_canonical", self.missing_canonical.len()),
            ("missing_h1", self.missing_h1.len()),
            ("multiple_h1", self.multiple_h1.len()),
            ("images_no_alt", self.images_no_alt.len()),
            ("no_viewport", self.no_viewport.len()),
            ("no_og_tags", self.no_og_tags.len()),
            ("no_twitter_cards", self.no_twitter_cards.len()),
            ("missing_schema", self.missing_schema.len()),
            ("weak_eeat", self.weak_eeat.len()),
            ("poor_local_seo", self.poor_local_seo.len()),
            ("thin_content", self.thin_content.len()),
            ("title_issues", self.title_issues.len()),
            ("description_issues", self.description_issues.len()),
            ("no_ssl", self.no_ssl.len()),
            ("missing_security_headers", self.missing_security_headers.len()),
            ("poor_security", self.poor_security.len()),
            ("mixed_content", self.mixed_content.len()),
            ("info_disclosure", self.info_disclosure.len()),
        ]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, count)| count).sum()
    }

    /// Sorts a page into every category it belongs to
    pub fn record(&mut self, result: &PageResult) {
        if result.excluded || result.is_noindex() {
            return;
        }

        let has_error = result.error.is_some();
        if (has_error || result.is_broken()) && result.is_html_or_untyped() {
            self.critical_errors.push(CriticalError {
                url: result.url.clone(),
                status: result.status,
                error: result
                    .error
                    .map(|e| e.to_string())
                    .or_else(|| result.error_detail.clone()),
            });
        }

        if result.is_broken() {
            return;
        }

        if let Some(signals) = &result.signals {
            self.record_signals(&result.url, signals, result.system_page);
        }
    }

    fn record_signals(&mut self, url: &str, s: &PageSignals, system_page: bool) {
        let url = url.to_string();

        if !s.meta.has_title {
            self.missing_title.push(url.clone());
        } else if s.meta.title_issue() {
            self.title_issues.push(TitleIssue {
                url: url.clone(),
                title: s.title.clone(),
                length: s.meta.title_length,
                too_short: s.meta.title_class == LengthClass::TooShort,
                too_long: s.meta.title_class == LengthClass::TooLong,
            });
        }

        if !system_page {
            if !s.meta.has_description {
                self.missing_description.push(url.clone());
            } else if s.meta.description_issue() {
                self.description_issues.push(DescriptionIssue {
                    url: url.clone(),
                    description: s.description.chars().take(DESCRIPTION_EXCERPT_CHARS).collect(),
                    length: s.meta.description_length,
                    too_short: s.meta.description_class == LengthClass::TooShort,
                    too_long: s.meta.description_class == LengthClass::TooLong,
                });
            }
        }

        if !s.has_canonical() {
            self.missing_canonical.push(url.clone());
        }

        match s.h1_count {
            0 => self.missing_h1.push(url.clone()),
            1 => {}
            count => self.multiple_h1.push(MultipleH1 {
                url: url.clone(),
                h1_count: count,
                h1_list: s.h1.clone(),
            }),
        }

        if s.img_without_alt > 0 {
            self.images_no_alt.push(ImagesNoAlt {
                url: url.clone(),
                missing_alt: s.img_without_alt,
                total_images: s.img_total,
                alt_ratio: s.img_alt_ratio,
            });
        }

        if !s.is_mobile_friendly {
            self.no_viewport.push(url.clone());
        }

        if !s.has_og_image || !s.has_og_title {
            self.no_og_tags.push(MissingOpenGraph {
                url: url.clone(),
                has_og_image: s.has_og_image,
                has_og_title: s.has_og_title,
                has_og_description: s.has_og_description,
            });
        }

        if !s.has_twitter_card {
            self.no_twitter_cards.push(url.clone());
        }

        if !s.has_schema() {
            self.missing_schema.push(url.clone());
        }

        if !system_page {
            if s.trust.percentage < WEAK_TRUST_PERCENTAGE {
                self.weak_eeat.push(WeakTrust {
                    url: url.clone(),
                    page_type: s.trust.page_type,
                    eeat_score: s.trust.score,
                    eeat_percentage: s.trust.percentage,
                    missing: s.trust.missing().into_iter().map(String::from).collect(),
                });
            }

            if s.nap.nap_score < POOR_NAP_SCORE {
                self.poor_local_seo.push(PoorLocalSeo {
                    url: url.clone(),
                    nap_score: s.nap.nap_score,
                    phone_numbers: s.nap.phone_numbers.len(),
                    has_address: s.nap.has_address,
                    has_local_schema: s.nap.has_local_schema,
                });
            }

            if s.word_count > 0 && s.word_count < THIN_CONTENT_WORDS {
                self.thin_content.push(ThinContent {
                    url: url.clone(),
                    word_count: s.word_count,
                    text_len: s.text_len,
                });
            }
        }

        let security = &s.security;

        if !security.has_ssl {
            self.no_ssl.push(url.clone());
        }

        if security.percentage < POOR_SECURITY_PERCENTAGE {
            self.poor_security.push(PoorSecurity {
                url: url.clone(),
                security_percentage: security.percentage,
                security_level: security.level,
                missing_headers: security.missing_critical.clone(),
            });
        }

        if security.headers_count < MIN_SECURITY_HEADERS {
            self.missing_security_headers.push(MissingSecurityHeaders {
                url: url.clone(),
                headers_count: security.headers_count,
                missing_critical: security.missing_critical.clone(),
            });
        }

        if security.has_mixed_content {
            self.mixed_content.push(url.clone());
        }

        if security.has_info_disclosure() {
            self.info_disclosure.push(InfoDisclosure {
                url,
                server_header: security.server_header.clone(),
                powered_by: security.powered_by_header.clone(),
            });
        }
    }
}

/// Runs [`Issues::record`] over every result
pub fn analyze_issues<'a, I>(results: I) -> Issues
where
    I: IntoIterator<Item = &'a PageResult>,
{
    let mut issues = Issues::default();
    for result in results {
        issues.record(result);
    }
    issues
}
