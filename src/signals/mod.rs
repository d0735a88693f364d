//! Page signal extraction
//!
//! Everything in this module is a pure function of one fetched HTML
//! document, its URL and its response headers. [`analyze_page`] runs every
//! extractor and bundles the results into a [`PageSignals`].
//!
//! # Components
//!
//! - `meta`: title and description length scoring
//! - `nap`: local business name/address/phone signals
//! - `trust`: E-E-A-T indicators scored by page type
//! - `security`: response header hardening and TLS
//! - `schema`: JSON-LD structured data inventory

mod meta;
mod nap;
mod schema;
mod security;
mod trust;

pub use meta::{
    classify, classify_description, classify_title, score_meta, LengthBounds, LengthClass,
    MetaScore, DESCRIPTION_BOUNDS, TITLE_BOUNDS,
};
pub use nap::{extract_nap, normalize_nap_score, NapSignals};
pub use schema::{extract_structured_data, is_business_type, StructuredData};
pub use security::{
    analyze_security, HeaderCheck, SecurityHeader, SecurityLevel, SecurityPosture, SecurityRisk,
    Severity, SECURITY_HEADERS, SSL_POINTS,
};
pub use trust::{analyze_trust, Credit, PageType, TrustIndicator, TrustProfile, TrustSignals};

use crate::crawler::extract_links;
use crate::url::{absolutize, same_site, DomainScope};
use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Minimum visible text length for a page to count as substantial
const SUFFICIENT_TEXT_LEN: usize = 1200;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));

static NAMED_META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[name]").expect("static selector"));

static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("static selector"));

static OG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="og:"]"#).expect("static selector"));

static TWITTER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name^="twitter:"]"#).expect("static selector"));

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));

static NAV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav").expect("static selector"));

static HEADING_SELECTORS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    ["h1", "h2", "h3"].map(|tag| Selector::parse(tag).expect("static selector"))
});

/// Signals used by generative engines to quote a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoSignals {
    pub has_faq_schema: bool,
    pub has_article_schema: bool,
    pub has_org_schema: bool,
    pub has_breadcrumbs: bool,
    pub has_review_schema: bool,
    pub has_product_schema: bool,
    /// Exactly one h1 and at least one h2
    pub clear_hierarchy: bool,
    pub sufficient_text: bool,
    pub has_navigation: bool,
}

/// Everything extracted from one HTML page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSignals {
    pub title: String,
    pub description: String,
    /// Lowercased robots meta content
    pub robots_meta: String,
    /// Absolute canonical URL, empty when absent
    pub canonical: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub img_total: usize,
    pub img_without_alt: usize,
    /// Percentage of images with alt text, rounded to 0.1
    pub img_alt_ratio: f64,
    pub has_viewport: bool,
    pub viewport_content: String,
    pub is_mobile_friendly: bool,
    pub open_graph: BTreeMap<String, String>,
    pub twitter_cards: BTreeMap<String, String>,
    pub has_og_image: bool,
    pub has_og_title: bool,
    pub has_og_description: bool,
    pub has_twitter_card: bool,
    pub schema_types: BTreeSet<String>,
    pub schema_count: usize,
    pub links: Vec<String>,
    pub internal_links: usize,
    pub external_links: usize,
    pub text_len: usize,
    pub word_count: usize,
    pub meta: MetaScore,
    pub nap: NapSignals,
    pub trust: TrustSignals,
    pub geo: GeoSignals,
    pub security: SecurityPosture,
}

impl PageSignals {
    /// The page asks not to be indexed
    pub fn is_noindex(&self) -> bool {
        self.robots_meta.contains("noindex")
    }

    pub fn has_canonical(&self) -> bool {
        !self.canonical.is_empty()
    }

    pub fn has_schema(&self) -> bool {
        self.schema_count > 0
    }
}

/// Runs every extractor over one HTML page
///
/// `url` is the page's final URL; relative links and the canonical are
/// resolved against it, and internal/external link counts use `scope`.
///
/// # Example
///
/// ```
/// use compass_audit::signals::analyze_page;
/// use compass_audit::DomainScope;
/// use std::collections::BTreeMap;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// let html = "<html><head><title>Home</title></head><body><h1>Hi</h1></body></html>";
/// let signals = analyze_page(html, &url, &BTreeMap::new(), DomainScope::ExactHost);
/// assert_eq!(signals.title, "Home");
/// assert_eq!(signals.h1_count, 1);
/// ```
pub fn analyze_page(
    html: &str,
    url: &Url,
    headers: &BTreeMap<String, String>,
    scope: DomainScope,
) -> PageSignals {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .unwrap_or_default();
    let description = named_meta(&document, "description")
        .map(|d| d.trim().to_string())
        .unwrap_or_default();
    let robots_meta = named_meta(&document, "robots")
        .map(|r| r.trim().to_lowercase())
        .unwrap_or_default();
    let canonical = canonical_url(&document, url).unwrap_or_default();

    let [h1, h2, h3] = HEADING_SELECTORS.each_ref().map(|selector| {
        document
            .select(selector)
            .map(|h| collapse_whitespace(&h.text().collect::<String>()))
            .collect::<Vec<_>>()
    });

    let img_total = document.select(&IMG_SELECTOR).count();
    let img_without_alt = document
        .select(&IMG_SELECTOR)
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
        .count();
    let img_alt_ratio =
        round1((img_total - img_without_alt) as f64 / img_total.max(1) as f64 * 100.0);

    let viewport = named_meta(&document, "viewport");
    let has_viewport = viewport.is_some();
    let viewport_content = viewport.unwrap_or_default().to_string();
    let is_mobile_friendly = has_viewport
        && viewport_content
            .to_lowercase()
            .split_whitespace()
            .collect::<String>()
            .contains("width=device-width");

    let open_graph = meta_map(&document, &OG_SELECTOR, "property");
    let twitter_cards = meta_map(&document, &TWITTER_SELECTOR, "name");

    let structured = extract_structured_data(&document);

    let links = extract_links(&document, url);
    let internal_links = links
        .iter()
        .filter(|link| Url::parse(link).is_ok_and(|l| same_site(url, &l, scope)))
        .count();

    let text = visible_text(document.root_element());
    let text_len = text.chars().count();

    let geo = GeoSignals {
        has_faq_schema: structured.has_faq(),
        has_article_schema: structured.has_article(),
        has_org_schema: structured.has_organization(),
        has_breadcrumbs: structured.has_breadcrumbs(),
        has_review_schema: structured.has_review(),
        has_product_schema: structured.has_product(),
        clear_hierarchy: h1.len() == 1 && !h2.is_empty(),
        sufficient_text: text_len >= SUFFICIENT_TEXT_LEN,
        has_navigation: document.select(&NAV_SELECTOR).next().is_some(),
    };

    PageSignals {
        meta: score_meta(&title, &description),
        nap: extract_nap(&document, &text, &structured),
        trust: analyze_trust(&document, &text, url, &structured),
        security: analyze_security(headers, url, html),
        geo,
        title,
        description,
        robots_meta,
        canonical,
        h1_count: h1.len(),
        h2_count: h2.len(),
        h3_count: h3.len(),
        h1,
        h2,
        h3,
        img_total,
        img_without_alt,
        img_alt_ratio,
        has_viewport,
        viewport_content,
        is_mobile_friendly,
        has_og_image: open_graph.contains_key("og:image"),
        has_og_title: open_graph.contains_key("og:title"),
        has_og_description: open_graph.contains_key("og:description"),
        has_twitter_card: twitter_cards.contains_key("twitter:card"),
        open_graph,
        twitter_cards,
        schema_count: structured.type_count(),
        schema_types: structured.types,
        external_links: links.len() - internal_links,
        internal_links,
        links,
        text_len,
        word_count: text.split_whitespace().count(),
    }
}

/// Visible text under `root`, whitespace-collapsed
///
/// Text inside script, style and noscript elements is skipped.
pub(crate) fn visible_text(root: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(e) if HIDDEN_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                words.extend(text.split_whitespace());
            }
        }
    }

    words.join(" ")
}

/// Rounds to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content of the first `<meta name=...>` matching `name` case-insensitively
fn named_meta<'a>(document: &'a Html, name: &str) -> Option<&'a str> {
    document
        .select(&NAMED_META_SELECTOR)
        .find(|m| {
            m.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .map(|m| m.value().attr("content").unwrap_or(""))
}

fn canonical_url(document: &Html, base: &Url) -> Option<String> {
    document
        .select(&CANONICAL_SELECTOR)
        .find(|link| {
            link.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| absolutize(base, href))
        .map(String::from)
}

/// Collects `key_attr -> content` pairs, skipping empty values
fn meta_map(document: &Html, selector: &Selector, key_attr: &str) -> BTreeMap<String, String> {
    document
        .select(selector)
        .filter_map(|m| {
            let key = m.value().attr(key_attr)?.trim();
            let content = m.value().attr("content")?.trim();
            (!key.is_empty() && !content.is_empty()).then(|| (key.to_string(), content.to_string()))
        })
        .collect()
}
