//! HTTP security posture
//!
//! Scores a response by the hardening headers it carries plus a TLS bonus,
//! and flags mixed content and server information disclosure.

use super::round1;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

static MIXED_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src=["']http://[^"']+["']"#).expect("static regex")
});

static MIXED_STYLESHEET_OR_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=["']http://[^"']+\.(?:css|js)["']"#).expect("static regex")
});

/// Points granted for serving the page over https
pub const SSL_POINTS: u32 = 20;

/// Server values that say nothing about the software stack
const GENERIC_SERVERS: &[&str] = &["cloudflare"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// High and medium severities count as critical when missing
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }
}

/// One scored hardening header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityHeader {
    pub name: &'static str,
    /// Lowercase header name
    pub header: &'static str,
    pub points: u32,
    pub severity: Severity,
}

pub const SECURITY_HEADERS: [SecurityHeader; 7] = [
    SecurityHeader {
        name: "HTTP Strict Transport Security (HSTS)",
        header: "strict-transport-security",
        points: 15,
        severity: Severity::High,
    },
    SecurityHeader {
        name: "X-Frame-Options",
        header: "x-frame-options",
        points: 10,
        severity: Severity::High,
    },
    SecurityHeader {
        name: "X-Content-Type-Options",
        header: "x-content-type-options",
        points: 10,
        severity: Severity::Medium,
    },
    SecurityHeader {
        name: "Content-Security-Policy (CSP)",
        header: "content-security-policy",
        points: 20,
        severity: Severity::High,
    },
    SecurityHeader {
        name: "X-XSS-Protection",
        header: "x-xss-protection",
        points: 5,
        severity: Severity::Low,
    },
    SecurityHeader {
        name: "Referrer-Policy",
        header: "referrer-policy",
        points: 10,
        severity: Severity::Medium,
    },
    SecurityHeader {
        name: "Permissions-Policy",
        header: "permissions-policy",
        points: 10,
        severity: Severity::Low,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SecurityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SecurityLevel {
    /// Poor < 50 <= Fair < 70 <= Good < 90 <= Excellent
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 70.0 {
            Self::Good
        } else if percentage >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for SecurityLevel {
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

/// Actual exposure, as opposed to missing hardening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityRisk {
    /// No TLS, or mixed content on a TLS page
    High,
    Medium,
    Low,
    None,
}

/// Presence and value of one hardening header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCheck {
    pub name: &'static str,
    pub header: &'static str,
    pub present: bool,
    pub value: Option<String>,
    pub score: u32,
    pub max_score: u32,
    pub severity: Severity,
}

/// Security evaluation of one response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityPosture {
    pub checks: Vec<HeaderCheck>,
    pub has_ssl: bool,
    pub ssl_score: u32,
    pub has_mixed_content: bool,
    pub exposes_server_info: bool,
    pub server_header: String,
    pub exposes_tech_stack: bool,
    pub powered_by_header: String,
    pub total_score: u32,
    pub max_score: u32,
    /// Rounded to 0.1
    pub percentage: f64,
    pub level: SecurityLevel,
    /// Names of absent high and medium severity headers
    pub missing_critical: Vec<String>,
    pub headers_count: usize,
    pub total_headers: usize,
    pub risk: SecurityRisk,
}

impl SecurityPosture {
    /// Every absent header with its severity
    pub fn missing(&self) -> Vec<(&'static str, Severity)> {
        self.checks
            .iter()
            .filter(|check| !check.present)
            .map(|check| (check.name, check.severity))
            .collect()
    }

    pub fn has_info_disclosure(&self) -> bool {
        self.exposes_server_info || self.exposes_tech_stack
    }
}

/// Evaluates response headers, the page URL's scheme and the HTML body
///
/// Header lookup is case-insensitive. Mixed content is only checked for
/// https pages with a non-empty body.
///
/// # Example
///
/// ```
/// use compass_audit::signals::{analyze_security, SecurityRisk};
/// use std::collections::BTreeMap;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/").unwrap();
/// let posture = analyze_security(&BTreeMap::new(), &url, "");
/// assert_eq!(posture.total_score, 0);
/// assert_eq!(posture.risk, SecurityRisk::High);
/// ```
pub fn analyze_security(headers: &BTreeMap<String, String>, url: &Url, html: &str) -> SecurityPosture {
    let checks: Vec<HeaderCheck> = SECURITY_HEADERS
        .iter()
        .map(|spec| {
            let value = header_value(headers, spec.header).cloned();
            let present = value.is_some();
            HeaderCheck {
                name: spec.name,
                header: spec.header,
                present,
                value,
                score: if present { spec.points } else { 0 },
                max_score: spec.points,
                severity: spec.severity,
            }
        })
        .collect();

    let has_ssl = url.scheme() == "https";
    let ssl_score = if has_ssl { SSL_POINTS } else { 0 };

    let total_score = checks.iter().map(|c| c.score).sum::<u32>() + ssl_score;
    let max_score = checks.iter().map(|c| c.max_score).sum::<u32>() + SSL_POINTS;
    let percentage = round1(f64::from(total_score) / f64::from(max_score) * 100.0);

    let has_mixed_content = has_ssl
        && !html.is_empty()
        && (MIXED_SRC.is_match(html) || MIXED_STYLESHEET_OR_SCRIPT.is_match(html));

    let server_header = header_value(headers, "server").cloned().unwrap_or_default();
    let exposes_server_info = !server_header.trim().is_empty()
        && !GENERIC_SERVERS.contains(&server_header.trim().to_lowercase().as_str());

    let powered_by_header = header_value(headers, "x-powered-by").cloned().unwrap_or_default();
    let exposes_tech_stack = !powered_by_header.trim().is_empty();

    let missing_critical = checks
        .iter()
        .filter(|c| !c.present && c.severity.is_critical())
        .map(|c| c.name.to_string())
        .collect();

    let risk = if !has_ssl || has_mixed_content {
        SecurityRisk::High
    } else if percentage < 50.0 {
        SecurityRisk::Medium
    } else if percentage < 70.0 {
        SecurityRisk::Low
    } else {
        SecurityRisk::None
    };

    SecurityPosture {
        headers_count: checks.iter().filter(|c| c.present).count(),
        total_headers: checks.len(),
        checks,
        has_ssl,
        ssl_score,
        has_mixed_content,
        exposes_server_info,
        server_header,
        exposes_tech_stack,
        powered_by_header,
        total_score,
        max_score,
        percentage,
        level: SecurityLevel::from_percentage(percentage),
        missing_critical,
        risk,
    }
}

fn header_value<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}
