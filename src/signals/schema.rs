//! Structured data (JSON-LD) inventory

use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

/// Schema.org types that mark a page as describing a business entity
const BUSINESS_TYPES: &[&str] = &["LocalBusiness", "Organization", "Store", "Restaurant"];

/// Types and business entities declared by a page's JSON-LD blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredData {
    /// Deduplicated `@type` values
    pub types: BTreeSet<String>,
    /// Non-empty `name` values of business-typed entities
    pub business_names: Vec<String>,
}

impl StructuredData {
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    fn has_any(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|t| self.types.contains(*t))
    }

    pub fn has_faq(&self) -> bool {
        self.has_any(&["FAQPage"])
    }

    pub fn has_article(&self) -> bool {
        self.has_any(&["Article", "NewsArticle", "BlogPosting"])
    }

    pub fn has_organization(&self) -> bool {
        self.has_any(&["Organization", "LocalBusiness"])
    }

    pub fn has_breadcrumbs(&self) -> bool {
        self.has_any(&["BreadcrumbList"])
    }

    pub fn has_review(&self) -> bool {
        self.has_any(&["Review", "AggregateRating"])
    }

    pub fn has_product(&self) -> bool {
        self.has_any(&["Product"])
    }

    /// Any declared type that identifies a business
    pub fn has_business_type(&self) -> bool {
        self.types.iter().any(|t| is_business_type(t))
    }
}

/// LocalBusiness, Organization, Store, Restaurant or any `*Business` subtype
pub fn is_business_type(schema_type: &str) -> bool {
    BUSINESS_TYPES.contains(&schema_type) || schema_type.ends_with("Business")
}

/// Collects structured data from every JSON-LD script in the document
///
/// Scripts that fail to parse are skipped; the remaining scripts still
/// contribute.
///
/// # Example
///
/// ```
/// use compass_audit::signals::extract_structured_data;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     r#"<script type="application/ld+json">{"@type": ["Product", "Thing"]}</script>"#,
/// );
/// let data = extract_structured_data(&html);
/// assert!(data.has_product());
/// assert_eq!(data.type_count(), 2);
/// ```
pub fn extract_structured_data(document: &Html) -> StructuredData {
    let mut data = StructuredData::default();

    for script in document.select(&JSON_LD_SELECTOR) {
        let raw: String = script.text().collect();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => collect_value(&value, &mut data),
            Err(e) => tracing::debug!("Skipping unparseable JSON-LD block: {}", e),
        }
    }

    data
}

fn collect_value(value: &Value, data: &mut StructuredData) {
    match value {
        Value::Array(items) => {
            for item in items {
                if item.is_object() {
                    collect_node(item, data);
                }
            }
        }
        Value::Object(_) => collect_node(value, data),
        _ => {}
    }
}

fn collect_node(node: &Value, data: &mut StructuredData) {
    let types: Vec<&str> = match node.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    for t in &types {
        if !t.is_empty() {
            data.types.insert(t.to_string());
        }
    }

    if types.iter().any(|t| is_business_type(t)) {
        if let Some(name) = node.get("name").and_then(Value::as_str) {
            let name = name.trim();
            if !name.is_empty() {
                data.business_names.push(name.to_string());
            }
        }
    }

    if let Some(Value::Array(graph)) = node.get("@graph") {
        for item in graph {
            if item.is_object() {
                collect_node(item, data);
            }
        }
    }
}
