//! Compass: a bounded single-site SEO auditor
//!
//! This crate crawls a limited set of pages on one site, respecting robots.txt,
//! and turns every fetched HTML page into structured quality signals
//! (metadata, mobile readiness, structured data, trust, local business and
//! HTTP security posture). The audit stage then rolls those signals up into
//! categorized issues, duplicate groups and a weighted overall score.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod signals;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Compass operations
///
/// Per-page failures never surface here; they are recorded on the page
/// result instead. These are the errors that stop a run.
#[derive(Debug, Error)]
pub enum CompassError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

// Re-export commonly used types
pub use audit::{audit, AuditReport};
pub use config::Config;
pub use crawler::{CrawlOutput, PageResult};
pub use state::PageState;
pub use url::{extract_domain, normalize_url, same_site, DomainScope};
