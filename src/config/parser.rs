//! TOML loading and config fingerprinting

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates the configuration file at `path`
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use compass_audit::config::load_config;
///
/// let config = load_config(Path::new("audit.toml")).unwrap();
/// println!("Start URL: {}", config.crawler.start_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of the configuration file at `path`
///
/// The hash is recorded in the JSON report so a report can be traced back
/// to the exact configuration that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(hash_content(&std::fs::read_to_string(path)?))
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Loads a configuration together with the hash of the exact text parsed
///
/// The file is read once, so the hash always matches the loaded config.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL_CONFIG: &str = r#"
[crawler]
start-url = "https://example.com/"

[user-agent]
crawler-name = "CompassBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
"#;

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
start-url = "https://example.com/"
max-pages = 50
max-depth = 2
concurrency = 4
workers = 8
timeout-secs = 10
respect-robots = false
use-sitemaps = true
domain-scope = "registrable-domain"

[user-agent]
crawler-name = "CompassBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"

[output]
json-path = "./report.json"
summary-path = "./summary.md"

[exclusions]
patterns = ["/private"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.worker_count(), 8);
        assert!(!config.crawler.respect_robots);
        assert!(config.crawler.use_sitemaps);
        assert_eq!(
            config.crawler.domain_scope,
            crate::url::DomainScope::RegistrableDomain
        );
        assert_eq!(config.exclusions.patterns, vec!["/private".to_string()]);
        assert!(!config.exclusions.system_patterns.is_empty());
        assert_eq!(config.output.json_path, "./report.json");
    }

    #[test]
    fn test_defaults_applied() {
        let file = create_temp_config(MINIMAL_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 300);
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.concurrency, 10);
        assert_eq!(config.crawler.worker_count(), 10);
        assert_eq!(config.crawler.timeout_secs, 25);
        assert!(config.crawler.respect_robots);
        assert!(!config.crawler.use_sitemaps);
        assert_eq!(config.crawler.domain_scope, crate::url::DomainScope::ExactHost);
        assert!(config
            .exclusions
            .patterns
            .iter()
            .any(|p| p == r"/privacy[_-]policy"));
        assert_eq!(
            config.user_agent.header_value(),
            "CompassBot/1.0 (+https://example.com/bot)"
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/audit.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
start-url = "https://example.com/"
max-pages = 0

[user-agent]
crawler-name = "CompassBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_with_bad_pattern() {
        let config_content = format!(
            "{}\n[exclusions]\npatterns = [\"/(unclosed\"]\n",
            MINIMAL_CONFIG
        );
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_load_config_with_hash_matches_file_hash() {
        let file = create_temp_config(MINIMAL_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.crawler.start_url, "https://example.com/");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_parse_config_from_str() {
        let config = parse_config(MINIMAL_CONFIG).unwrap();
        assert_eq!(config.user_agent.crawler_name, "CompassBot");
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
