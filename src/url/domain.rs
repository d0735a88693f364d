use url::{Host, Url};

/// Second-level labels that act as public suffixes under a country TLD
/// (`example.co.uk`, `sklep.com.pl`)
const MULTI_PART_SUFFIX_LABELS: &[&str] = &[
    "co", "com", "net", "org", "gov", "edu", "ac", "or", "ne", "go", "gv", "info", "biz",
];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use compass_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the registrable domain (public suffix + one label) of a URL's host
///
/// Uses the last two labels, or the last three when the second-to-last
/// label is a known second-level suffix under a two-letter country code.
/// IP addresses and single-label hosts are returned unchanged.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use compass_audit::url::registrable_domain;
///
/// let url = Url::parse("https://blog.shop.example.co.uk/").unwrap();
/// assert_eq!(registrable_domain(&url), Some("example.co.uk".to_string()));
/// ```
pub fn registrable_domain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Ipv4(ip) => return Some(ip.to_string()),
        Host::Ipv6(ip) => return Some(ip.to_string()),
        Host::Domain(_) => {}
    }

    let host = extract_domain(url)?;
    let host = host.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    if labels.len() <= 2 {
        return Some(labels.join("."));
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && MULTI_PART_SUFFIX_LABELS.contains(&second) {
        3
    } else {
        2
    };

    Some(labels[labels.len() - keep..].join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_simple_domain() {
        assert_eq!(
            extract_domain(&url("https://example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_with_port() {
        assert_eq!(
            extract_domain(&url("https://example.com:8080/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_mixed_case() {
        assert_eq!(
            extract_domain(&url("https://Example.COM/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_registrable_simple() {
        assert_eq!(
            registrable_domain(&url("https://example.com/")),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_domain(&url("https://blog.example.com/")),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_domain(&url("https://a.b.example.de/")),
            Some("example.de".to_string())
        );
    }

    #[test]
    fn test_registrable_multi_part_suffix() {
        assert_eq!(
            registrable_domain(&url("https://www.example.co.uk/")),
            Some("example.co.uk".to_string())
        );
        assert_eq!(
            registrable_domain(&url("https://sklep.firma.com.pl/")),
            Some("firma.com.pl".to_string())
        );
    }

    #[test]
    fn test_registrable_generic_tld_not_multi_part() {
        // "co" under a generic TLD is an ordinary label
        assert_eq!(
            registrable_domain(&url("https://www.co.example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_registrable_ip_and_localhost() {
        assert_eq!(
            registrable_domain(&url("http://127.0.0.1:8080/")),
            Some("127.0.0.1".to_string())
        );
        assert_eq!(
            registrable_domain(&url("http://localhost/")),
            Some("localhost".to_string())
        );
    }
}
