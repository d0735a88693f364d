//! Local business signals: Name, Address, Phone
//!
//! Six independent signals are detected (phone, address, e-mail, business
//! schema, footer, business name). Their count is the detail score; the
//! normalized 0..=3 score used by the audit is derived from it with
//! [`normalize_nap_score`].

use super::schema::StructuredData;
use super::visible_text;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static POLISH_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+48[\s\-]?(?:\d[\s\-]?){8}\d").expect("static regex")
});

static US_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{3}\)\s?\d{3}[\s\-]?\d{4}").expect("static regex"));

static GENERIC_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}[\s\-]?\d{3}[\s\-]?\d{4}\b").expect("static regex"));

static INTERNATIONAL_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+\d{1,3}[\s\-]?(?:\d[\s\-]?){6,12}\d").expect("static regex")
});

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(?:ul|al)\.|\b(?:ulica|aleja|street|avenue|road)\b|stra(?:ß|ss)e\b)")
        .expect("static regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("static regex")
});

static LEGAL_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bsp\.\s?z\s?o\.\s?o\.|\bgmbh\b|\bltd\b|\bllc\b|\binc\b|\bs\.a\.)")
        .expect("static regex")
});

static REGION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "main, article, header, footer, [class*=contact], [id*=contact], \
         [class*=kontakt], [id*=kontakt]",
    )
    .expect("static selector")
});

static FOOTER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("footer, #footer, .footer").expect("static selector"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// NAP signals found on one page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NapSignals {
    /// Distinct phone numbers as written on the page
    pub phone_numbers: Vec<String>,
    pub has_address: bool,
    pub has_email: bool,
    pub has_local_schema: bool,
    pub has_footer: bool,
    pub has_business_name: bool,
    /// Count of the six signals, 0..=6
    pub detail_score: u8,
    /// Normalized score, 0..=3
    pub nap_score: u8,
}

impl NapSignals {
    pub fn has_phone(&self) -> bool {
        !self.phone_numbers.is_empty()
    }
}

/// Maps the 0..=6 detail score onto the 0..=3 scale
///
/// | detail | normalized |
/// |--------|------------|
/// | 0, 1   | unchanged  |
/// | 2, 3   | 2          |
/// | 4..=6  | 3          |
pub fn normalize_nap_score(detail: u8) -> u8 {
    match detail {
        d if d >= 4 => 3,
        2 | 3 => 2,
        d => d,
    }
}

/// Extracts NAP signals from a parsed page
///
/// `text` is the page's visible text and is used for address, e-mail and
/// legal-form detection. Phones are searched in the main content, header,
/// footer and contact regions, falling back to `text` when the page has
/// none of those.
pub fn extract_nap(document: &Html, text: &str, structured: &StructuredData) -> NapSignals {
    let region_text = document
        .select(&REGION_SELECTOR)
        .map(visible_text)
        .collect::<Vec<_>>()
        .join(" ");
    let phone_text = if region_text.trim().is_empty() {
        text
    } else {
        region_text.as_str()
    };

    let phone_numbers = find_phones(phone_text);
    let has_address = ADDRESS.is_match(text);
    let has_email = EMAIL.is_match(text) || has_mailto_link(document);
    let has_local_schema = structured.has_business_type();
    let has_footer = document
        .select(&FOOTER_SELECTOR)
        .any(|footer| !visible_text(footer).is_empty());
    let has_business_name = LEGAL_FORM.is_match(text) || !structured.business_names.is_empty();

    let detail_score = [
        !phone_numbers.is_empty(),
        has_address,
        has_email,
        has_local_schema,
        has_footer,
        has_business_name,
    ]
    .iter()
    .filter(|present| **present)
    .count() as u8;

    NapSignals {
        phone_numbers,
        has_address,
        has_email,
        has_local_schema,
        has_footer,
        has_business_name,
        detail_score,
        nap_score: normalize_nap_score(detail_score),
    }
}

/// Runs the specific phone patterns, then the international fallback if
/// none matched. Numbers are deduplicated by their digits.
fn find_phones(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut phones = Vec::new();

    for pattern in [&*POLISH_PHONE, &*US_PHONE, &*GENERIC_PHONE] {
        collect_phones(pattern, text, &mut seen, &mut phones);
    }
    if phones.is_empty() {
        collect_phones(&INTERNATIONAL_PHONE, text, &mut seen, &mut phones);
    }

    phones
}

fn collect_phones(
    pattern: &Regex,
    text: &str,
    seen: &mut BTreeSet<String>,
    phones: &mut Vec<String>,
) {
    for m in pattern.find_iter(text) {
        let raw = m.as_str().trim();
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if seen.insert(digits) {
            phones.push(raw.to_string());
        }
    }
}

fn has_mailto_link(document: &Html) -> bool {
    document.select(&ANCHOR_SELECTOR).any(|a| {
        a.value()
            .attr("href")
            .is_some_and(|href| href.trim().to_ascii_lowercase().starts_with("mailto:"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::extract_structured_data;

    fn analyze(body: &str) -> NapSignals {
        let document = Html::parse_document(body);
        let text = visible_text(document.root_element());
        let structured = extract_structured_data(&document);
        extract_nap(&document, &text, &structured)
    }

    #[test]
    fn test_normalized_mapping() {
        let expected = [0, 1, 2, 2, 3, 3, 3];
        for (detail, want) in expected.iter().enumerate() {
            assert_eq!(normalize_nap_score(detail as u8), *want);
        }
    }

    #[test]
    fn test_normalized_is_monotone() {
        for detail in 0..6u8 {
            assert!(normalize_nap_score(detail) <= normalize_nap_score(detail + 1));
        }
    }

    #[test]
    fn test_empty_page() {
        let nap = analyze("<html><body></body></html>");
        assert_eq!(nap.detail_score, 0);
        assert_eq!(nap.nap_score, 0);
        assert!(!nap.has_phone());
    }

    #[test]
    fn test_phone_formats() {
        let nap = analyze(
            "<main><p>Call +48 123 456 789 or (555) 123-4567 or 555-987-6543.</p></main>",
        );
        assert_eq!(nap.phone_numbers.len(), 3);
        assert!(nap.has_phone());
    }

    #[test]
    fn test_international_fallback_only_when_nothing_else_matches() {
        let nap = analyze("<footer>Tel: +49 30 1234567</footer>");
        assert_eq!(nap.phone_numbers, vec!["+49 30 1234567".to_string()]);
    }

    #[test]
    fn test_duplicate_numbers_counted_once() {
        let nap = analyze("<header>555-123-4567</header><footer>555 123 4567</footer>");
        assert_eq!(nap.phone_numbers.len(), 1);
    }

    #[test]
    fn test_phones_outside_regions_ignored_when_regions_exist() {
        let nap = analyze("<div>555-123-4567</div><main>Welcome</main>");
        assert!(!nap.has_phone());

        let nap = analyze("<div>555-123-4567</div>");
        assert!(nap.has_phone());
    }

    #[test]
    fn test_contact_region_is_scanned() {
        let nap = analyze(
            r#"<div class="site-contact">555-123-4567</div><main>Welcome</main>"#,
        );
        assert!(nap.has_phone());
    }

    #[test]
    fn test_address_tokens() {
        assert!(analyze("<p>ul. Długa 5, Gdańsk</p>").has_address);
        assert!(analyze("<p>12 Baker Street</p>").has_address);
        assert!(analyze("<p>Hauptstraße 3</p>").has_address);
        assert!(!analyze("<p>A beautiful. day</p>").has_address);
    }

    #[test]
    fn test_full_local_business_page() {
        let nap = analyze(
            r#"<html><head>
            <script type="application/ld+json">{"@type": "LocalBusiness", "name": "Acme"}</script>
            </head><body>
            <main>Acme Sp. z o.o.</main>
            <footer>ul. Prosta 1, Warszawa. +48 22 123 45 67.
            <a href="MAILTO:biuro@acme.pl">Write to us</a></footer>
            </body></html>"#,
        );
        assert!(nap.has_phone());
        assert!(nap.has_address);
        assert!(nap.has_email);
        assert!(nap.has_local_schema);
        assert!(nap.has_footer);
        assert!(nap.has_business_name);
        assert_eq!(nap.detail_score, 6);
        assert_eq!(nap.nap_score, 3);
    }
}
