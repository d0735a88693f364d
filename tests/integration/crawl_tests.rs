//! Integration tests for the crawler and audit
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl and audit cycle end-to-end.

use compass_audit::audit::NO_SSL_PENALTY;
use compass_audit::config::{
    Config, CrawlerConfig, ExclusionConfig, OutputConfig, UserAgentConfig,
};
use compass_audit::crawler::{run_crawl, CrawlOutput, PageError};
use compass_audit::state::PageState;
use compass_audit::{audit, DomainScope};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `start_url`
fn create_test_config(start_url: &str, max_pages: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: start_url.to_string(),
            max_pages,
            max_depth: 3,
            workers: Some(2),
            concurrency: 4,
            timeout_secs: 5,
            respect_robots: true,
            use_sitemaps: false,
            domain_scope: DomainScope::ExactHost,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig::default(),
        exclusions: ExclusionConfig::default(),
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(server)
        .await;
}

fn url_of(base: &str, route: &str) -> String {
    format!("{}{}", base, route)
}

fn result_state(output: &CrawlOutput, url: &str) -> Option<PageState> {
    output.results.get(url).map(|r| r.state)
}

#[tokio::test]
async fn test_single_page_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "<html><head><title>Only page</title></head><body><p>Hi</p></body></html>".to_string(),
    )
    .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");

    assert_eq!(output.results.len(), 1);
    assert_eq!(
        result_state(&output, &url_of(&base, "/")),
        Some(PageState::Stored)
    );

    let report = audit(&output);
    assert_eq!(report.summary.pages_crawled, 1);
    assert_eq!(report.summary.pages_ok, 1);
}

#[tokio::test]
async fn test_missing_metadata_over_plain_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html("<html><body><p>No metadata here</p></body></html>".to_string())
                .insert_header("content-security-policy", "default-src 'self'")
                .insert_header("x-frame-options", "DENY"),
        )
        .mount(&server)
        .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");
    let report = audit(&output);
    let page = url_of(&base, "/");

    assert_eq!(report.issues.missing_title, vec![page.clone()]);
    assert_eq!(report.issues.missing_description, vec![page.clone()]);
    assert_eq!(report.issues.no_ssl, vec![page]);

    let summary = &report.summary;
    assert!(summary.avg_security_score > 0.0);
    let expected = (summary.avg_security_score / 100.0 - NO_SSL_PENALTY).max(0.0);
    assert!((summary.score_breakdown.security - expected).abs() < 1e-9);
    assert!(summary.score_breakdown.security < summary.avg_security_score / 100.0);
}

#[tokio::test]
async fn test_robots_disallowed_page_is_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /private/\n").await;
    mount_page(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{base}/private/page">Private</a>
            <a href="{base}/public">Public</a>
            </body></html>"#
        ),
    )
    .await;
    mount_page(
        &server,
        "/public",
        "<html><head><title>Public</title></head></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html("<html><title>Secret</title></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");

    let blocked = &output.results[&url_of(&base, "/private/page")];
    assert_eq!(blocked.state, PageState::RobotsBlocked);
    assert_eq!(blocked.error, Some(PageError::BlockedByRobots));
    assert_eq!(blocked.status, None);
    assert_eq!(
        result_state(&output, &url_of(&base, "/public")),
        Some(PageState::Stored)
    );
    assert_eq!(output.stats.robots_blocked, 1);

    let report = audit(&output);
    assert!(report
        .issues
        .critical_errors
        .iter()
        .any(|e| e.error.as_deref() == Some("blocked_by_robots")));
}

#[tokio::test]
async fn test_duplicate_titles_across_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/other">Other</a></body></html>"#
        ),
    )
    .await;
    mount_page(
        &server,
        "/other",
        "<html><head><title>Home</title></head><body></body></html>".to_string(),
    )
    .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");
    let report = audit(&output);

    assert_eq!(
        report.duplicates.title["Home"],
        vec![url_of(&base, "/"), url_of(&base, "/other")]
    );
    assert_eq!(report.summary.duplicate_titles, 1);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/page{i}">Page {i}</a>"#))
        .collect();
    mount_page(
        &server,
        "/",
        format!("<html><head><title>Hub</title></head><body>{links}</body></html>"),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(html("<html><head><title>Leaf</title></head></html>".to_string()))
        .mount(&server)
        .await;

    let output = run_crawl(create_test_config(&base, 5))
        .await
        .expect("crawl should succeed");

    assert_eq!(output.results.len(), 5);
    assert_eq!(output.stats.total(), 5);
    assert!(output.results.contains_key(&url_of(&base, "/")));
}

#[tokio::test]
async fn test_depth_limit_stops_link_following() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/one">1</a>"#.to_string()).await;
    mount_page(&server, "/one", r#"<a href="/two">2</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html("<title>Too deep</title>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&base, 10);
    config.crawler.max_depth = 1;
    let output = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(output.results.len(), 2);
    assert_eq!(output.results[&url_of(&base, "/one")].depth, 1);
}

#[tokio::test]
async fn test_non_html_is_skipped_without_signals() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Docs</title></head><body><a href="/guide.pdf">PDF</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/guide.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");

    let pdf = &output.results[&url_of(&base, "/guide.pdf")];
    assert_eq!(pdf.state, PageState::NonHtmlSkipped);
    assert_eq!(pdf.note.as_deref(), Some("skipped (non-HTML)"));
    assert!(pdf.signals.is_none());
    assert_eq!(output.stats.non_html_skipped, 1);

    let report = audit(&output);
    assert!(report.issues.critical_errors.is_empty());
    assert!(!report
        .issues
        .missing_title
        .contains(&url_of(&base, "/guide.pdf")));
}

#[tokio::test]
async fn test_broken_pages_only_reported_as_critical() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home page of the test site</title></head>
        <body><a href="/gone">Gone</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<html><body>Not found</body></html>", "text/html"))
        .mount(&server)
        .await;

    let output = run_crawl(create_test_config(&base, 10))
        .await
        .expect("crawl should succeed");
    let report = audit(&output);
    let gone = url_of(&base, "/gone");

    assert_eq!(output.results[&gone].status, Some(404));
    assert_eq!(report.issues.critical_errors.len(), 1);
    assert_eq!(report.issues.critical_errors[0].url, gone);
    assert!(!report.issues.missing_title.contains(&gone));
    assert!(!report.issues.no_ssl.contains(&gone));
}

#[tokio::test]
async fn test_sitemap_urls_seed_the_frontier() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(
        &server,
        &format!("User-agent: *\nAllow: /\nSitemap: {base}/feeds/pages.xml\n"),
    )
    .await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Home</title></head></html>".to_string(),
    )
    .await;
    mount_page(
        &server,
        "/orphan",
        "<html><head><title>Orphan</title></head></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feeds/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
                <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>{base}/orphan</loc></url>
                <url><loc>https://elsewhere.example/page</loc></url>
                </urlset>"#
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    let mut config = create_test_config(&base, 10);
    config.crawler.use_sitemaps = true;
    let output = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(output.stats.sitemap_seeds, 1);
    let orphan = &output.results[&url_of(&base, "/orphan")];
    assert_eq!(orphan.state, PageState::Stored);
    assert_eq!(orphan.depth, 1);
    assert!(!output
        .results
        .contains_key("https://elsewhere.example/page"));
}

#[tokio::test]
async fn test_robots_checks_can_be_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Home</title></head></html>".to_string(),
    )
    .await;

    let mut config = create_test_config(&base, 10);
    config.crawler.respect_robots = false;
    let output = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(
        result_state(&output, &url_of(&base, "/")),
        Some(PageState::Stored)
    );
}
