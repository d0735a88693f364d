//! Trust (E-E-A-T) scoring
//!
//! Seven indicators are detected on every page. How much each one is worth
//! depends on the page type: a blog post is expected to name its author, a
//! contact page is not. The weights live in [`TrustProfile`] tables rather
//! than in branching code.

use super::round1;
use super::schema::StructuredData;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

static AUTHOR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)author|autor|redaktor").expect("static regex"));

static CLASS_OR_ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class], [id]").expect("static selector"));

static AUTHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[itemprop="author"], [rel="author"], meta[name="author"][content]"#)
        .expect("static selector")
});

static DATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"time, [itemprop="datePublished"], [itemprop="published"], [itemprop="pubdate"], meta[property="article:published_time"]"#,
    )
    .expect("static selector")
});

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

const EXPERTISE_KEYWORDS: &[&str] = &[
    "certyfikat",
    "certificate",
    "licencja",
    "license",
    "dyplom",
    "diploma",
    "doświadczenie",
    "experience",
    "lat doświadczenia",
    "years of experience",
];

const CONTACT_KEYWORDS: &[&str] = &[
    "kontakt", "contact", "email", "telefon", "phone", "adres", "address",
];

const REVIEW_KEYWORDS: &[&str] = &["recenzja", "review", "opinia", "opinion", "rating", "ocena"];

const BLOG_SEGMENTS: &[&str] = &["blog", "news", "article", "articles", "aktualnosci"];
const ABOUT_SEGMENTS: &[&str] = &["about", "about-us", "o-nas", "o-firmie"];
const LEGAL_CONTACT_SEGMENTS: &[&str] = &[
    "contact",
    "kontakt",
    "privacy",
    "privacy-policy",
    "polityka-prywatnosci",
    "terms",
    "regulamin",
    "imprint",
    "impressum",
];

/// Coarse page classification driving the trust weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Blog,
    /// Home, service and any other commercial page
    Service,
    About,
    LegalContact,
}

impl PageType {
    /// Classifies a page from its URL path and structured data
    ///
    /// Path segments win over structured data; an `Article` schema only
    /// turns an otherwise unclassified page into a blog page.
    pub fn detect(url: &Url, structured: &StructuredData) -> Self {
        let segments: Vec<String> = url
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).map(str::to_lowercase).collect())
            .unwrap_or_default();

        let has_segment = |tokens: &[&str]| segments.iter().any(|s| tokens.contains(&s.as_str()));

        if has_segment(BLOG_SEGMENTS) {
            Self::Blog
        } else if has_segment(LEGAL_CONTACT_SEGMENTS) {
            Self::LegalContact
        } else if has_segment(ABOUT_SEGMENTS) {
            Self::About
        } else if structured.has_article() {
            Self::Blog
        } else {
            Self::Service
        }
    }
}

/// The seven trust indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustIndicator {
    Author,
    Date,
    Expertise,
    QualitySources,
    ContactInfo,
    Ssl,
    Reviews,
}

impl TrustIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Date => "date",
            Self::Expertise => "expertise",
            Self::QualitySources => "quality_sources",
            Self::ContactInfo => "contact_info",
            Self::Ssl => "ssl",
            Self::Reviews => "reviews",
        }
    }
}

/// How an indicator contributes to the score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Credit {
    /// Earned only when the indicator is present
    Weighted(f64),
    /// Always earned; the indicator is not expected on this page type
    Baseline(f64),
}

impl Credit {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Weighted(w) | Self::Baseline(w) => *w,
        }
    }

    fn earned(&self, present: bool) -> f64 {
        match self {
            Self::Weighted(w) if present => *w,
            Self::Weighted(_) => 0.0,
            Self::Baseline(w) => *w,
        }
    }
}

/// Weight table for one page type
#[derive(Debug, Clone, PartialEq)]
pub struct TrustProfile {
    pub page_type: PageType,
    pub credits: [(TrustIndicator, Credit); 7],
}

impl TrustProfile {
    pub fn for_page_type(page_type: PageType) -> Self {
        use Credit::{Baseline, Weighted};
        use TrustIndicator::*;

        let (author, date, expertise, contact) = match page_type {
            PageType::Blog => (Weighted(3.0), Weighted(1.5), Weighted(1.5), Weighted(1.0)),
            PageType::Service => (Baseline(1.5), Baseline(1.0), Weighted(1.5), Weighted(1.0)),
            PageType::About => (Weighted(1.5), Baseline(1.0), Weighted(2.25), Weighted(1.0)),
            PageType::LegalContact => {
                (Baseline(1.5), Baseline(1.0), Weighted(1.5), Weighted(2.5))
            }
        };

        Self {
            page_type,
            credits: [
                (Author, author),
                (Date, date),
                (Expertise, expertise),
                (QualitySources, Weighted(2.0)),
                (ContactInfo, contact),
                (Ssl, Weighted(1.0)),
                (Reviews, Weighted(1.0)),
            ],
        }
    }

    /// Highest reachable score
    pub fn max_score(&self) -> f64 {
        self.credits.iter().map(|(_, credit)| credit.weight()).sum()
    }
}

/// Trust indicators and the score for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustSignals {
    pub page_type: PageType,
    pub has_author: bool,
    pub has_date: bool,
    pub has_expertise_signals: bool,
    pub has_quality_external_links: bool,
    pub has_contact_info: bool,
    pub has_ssl: bool,
    pub has_reviews: bool,
    pub score: f64,
    pub max_score: f64,
    /// score / max_score * 100, rounded to 0.1
    pub percentage: f64,
}

impl TrustSignals {
    pub fn is_present(&self, indicator: TrustIndicator) -> bool {
        match indicator {
            TrustIndicator::Author => self.has_author,
            TrustIndicator::Date => self.has_date,
            TrustIndicator::Expertise => self.has_expertise_signals,
            TrustIndicator::QualitySources => self.has_quality_external_links,
            TrustIndicator::ContactInfo => self.has_contact_info,
            TrustIndicator::Ssl => self.has_ssl,
            TrustIndicator::Reviews => self.has_reviews,
        }
    }

    /// Names of the indicators that were not found
    pub fn missing(&self) -> Vec<&'static str> {
        TrustProfile::for_page_type(self.page_type)
            .credits
            .iter()
            .map(|(indicator, _)| *indicator)
            .filter(|indicator| !self.is_present(*indicator))
            .map(|indicator| indicator.as_str())
            .collect()
    }
}

/// Detects trust indicators and scores them with the page type's profile
pub fn analyze_trust(
    document: &Html,
    text: &str,
    url: &Url,
    structured: &StructuredData,
) -> TrustSignals {
    let lower = text.to_lowercase();
    let page_type = PageType::detect(url, structured);

    let mut signals = TrustSignals {
        page_type,
        has_author: has_author(document),
        has_date: document.select(&DATE_SELECTOR).next().is_some(),
        has_expertise_signals: contains_any(&lower, EXPERTISE_KEYWORDS),
        has_quality_external_links: has_quality_sources(document, url),
        has_contact_info: contains_any(&lower, CONTACT_KEYWORDS),
        has_ssl: url.scheme() == "https",
        has_reviews: contains_any(&lower, REVIEW_KEYWORDS),
        score: 0.0,
        max_score: 0.0,
        percentage: 0.0,
    };

    let profile = TrustProfile::for_page_type(page_type);
    let score: f64 = profile
        .credits
        .iter()
        .map(|(indicator, credit)| credit.earned(signals.is_present(*indicator)))
        .sum();
    let max_score = profile.max_score();

    signals.score = score;
    signals.max_score = max_score;
    signals.percentage = round1(score / max_score * 100.0);
    signals
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn has_author(document: &Html) -> bool {
    if document.select(&AUTHOR_SELECTOR).next().is_some() {
        return true;
    }

    document.select(&CLASS_OR_ID_SELECTOR).any(|element| {
        let value = element.value();
        value.attr("class").is_some_and(|c| AUTHOR_MARKER.is_match(c))
            || value.attr("id").is_some_and(|id| AUTHOR_MARKER.is_match(id))
    })
}

/// Links to government, education, non-profit or Wikipedia hosts other
/// than the page's own host
fn has_quality_sources(document: &Html, page_url: &Url) -> bool {
    let own_host = page_url.host_str().map(str::to_lowercase);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .filter_map(|link| link.host_str().map(str::to_lowercase))
        .filter(|host| Some(host) != own_host.as_ref())
        .any(|host| is_quality_host(&host))
}

fn is_quality_host(host: &str) -> bool {
    host.ends_with(".org")
        || host == "wikipedia.org"
        || host.split('.').any(|label| label == "gov" || label == "edu")
}
