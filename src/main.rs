//! Compass Audit main entry point
//!
//! This is the command-line interface for the Compass site auditor.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use compass_audit::config::{load_config_with_hash, Config};
use compass_audit::crawler::run_crawl;
use compass_audit::output::{
    write_all, AuditDocument, JsonReportWriter, MarkdownSummaryWriter, OutputHandler,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Compass Audit: an SEO and site-health crawler
///
/// Compass Audit crawls a single site breadth-first, extracts on-page
/// signals from every HTML page and scores the site across availability,
/// metadata, mobile, structured data, trust and security.
#[derive(Parser, Debug)]
#[command(name = "compass-audit")]
#[command(version = "1.0.0")]
#[command(about = "An SEO and site-health crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the JSON report path from the config
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Override the Markdown summary path from the config
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .inspect_err(|e| tracing::error!("Failed to load configuration: {}", e))
        .with_context(|| format!("loading {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(path) = &cli.json {
        config.output.json_path = path.display().to_string();
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = path.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_audit(config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("compass_audit=info,warn"),
            1 => EnvFilter::new("compass_audit=debug,info"),
            2 => EnvFilter::new("compass_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Compass Audit Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.worker_count());
    println!("  Concurrent fetches: {}", config.crawler.concurrency);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  Seed from sitemaps: {}", config.crawler.use_sitemaps);
    println!("  Domain scope: {:?}", config.crawler.domain_scope);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  JSON report: {}", config.output.json_path);
    println!("  Summary: {}", config.output.summary_path);

    println!(
        "\nExcluded Patterns ({}):",
        config.exclusions.patterns.len()
    );
    for pattern in &config.exclusions.patterns {
        println!("  - {}", pattern);
    }

    println!(
        "\nSystem Page Patterns ({}):",
        config.exclusions.system_patterns.len()
    );
    for pattern in &config.exclusions.system_patterns {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Crawls, audits and writes the reports
async fn handle_audit(config: Config, config_hash: &str, quiet: bool) -> anyhow::Result<()> {
    let handlers: Vec<Box<dyn OutputHandler>> = vec![
        Box::new(JsonReportWriter::new(&config.output.json_path)),
        Box::new(MarkdownSummaryWriter::new(&config.output.summary_path)),
    ];

    tracing::info!("Starting audit of {}", config.crawler.start_url);
    let started_at = Utc::now();

    let crawl = run_crawl(config)
        .await
        .inspect_err(|e| tracing::error!("Crawl failed: {}", e))
        .context("crawl failed")?;
    let report = compass_audit::audit(&crawl);
    let finished_at = Utc::now();

    let document = AuditDocument {
        report: &report,
        crawl: &crawl,
        config_hash,
        started_at,
        finished_at,
    };
    write_all(&handlers, &document).context("writing reports")?;

    if !quiet {
        let summary = &report.summary;
        println!(
            "Overall score: {}/100 ({}) across {} pages, {} issues",
            summary.overall_score,
            summary.overall_grade,
            summary.pages_analyzed,
            report.issues.total()
        );
    }

    Ok(())
}
