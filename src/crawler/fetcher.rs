//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the identifying user agent string
//! - A single GET per call, following redirects
//! - Collecting status, final URL, content type, headers and body
//! - Classifying transport failures
//!
//! There is no retry logic here or anywhere else in the crawl: a fetch is
//! attempted exactly once and any HTTP status is returned as a response.

use crate::config::Config;
use reqwest::{header::HeaderMap, redirect::Policy, Client};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A completed HTTP exchange, whatever its status code
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Final URL after redirects
    pub final_url: String,
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Page body content
    pub body: String,
    /// Response headers, keys lowercased, repeated headers joined with ", "
    pub headers: BTreeMap<String, String>,
}

impl FetchedPage {
    /// Returns true when the response declares an HTML body
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// Returns true for 2xx and 3xx statuses
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }
}

/// Why a fetch produced no response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Timeout,
    Connection,
    Protocol,
}

/// A fetch that failed below the HTTP layer
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// The originally requested URL
    pub url: String,
    pub kind: FetchErrorKind,
    pub message: String,
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The server answered (any status code)
    Response(FetchedPage),
    /// Timeout, connection or protocol failure
    Failed(FetchFailure),
}

/// Thin wrapper around a configured `reqwest::Client`
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    /// Builds the HTTP client from the crawler and user-agent configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use compass_audit::config::load_config;
    /// use compass_audit::crawler::Fetcher;
    /// use std::path::Path;
    ///
    /// let config = load_config(Path::new("audit.toml")).unwrap();
    /// let fetcher = Fetcher::new(&config).unwrap();
    /// println!("{}", fetcher.user_agent());
    /// ```
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let user_agent = config.user_agent.header_value();
        let timeout = Duration::from_secs(config.crawler.timeout_secs);

        let client = Client::builder()
            .user_agent(user_agent.clone())
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, user_agent })
    }

    /// The full `User-Agent` header value sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches a URL with exactly one GET
    ///
    /// # Outcomes
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | Any HTTP status (including 4xx/5xx) | `Response` |
    /// | Timeout (request or body) | `Failed(Timeout)` |
    /// | Connection refused, DNS, TLS handshake | `Failed(Connection)` |
    /// | Redirect limit, invalid URL, body decode | `Failed(Protocol)` |
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(classify_error(url, &e)),
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = collect_headers(response.headers());
        let content_type = headers.get("content-type").cloned().unwrap_or_default();

        match response.text().await {
            Ok(body) => FetchOutcome::Response(FetchedPage {
                status,
                final_url,
                content_type,
                body,
                headers,
            }),
            Err(e) => FetchOutcome::Failed(classify_error(url, &e)),
        }
    }
}

/// Maps a reqwest error onto the fetch failure taxonomy
fn classify_error(url: &str, e: &reqwest::Error) -> FetchFailure {
    let kind = if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_connect() {
        FetchErrorKind::Connection
    } else {
        FetchErrorKind::Protocol
    };

    tracing::debug!("Fetch of {} failed ({:?}): {}", url, kind, e);

    FetchFailure {
        url: url.to_string(),
        kind,
        message: e.to_string(),
    }
}

/// Flattens a header map into lowercase keys with comma-joined values
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).trim().to_string();
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    collected
}
