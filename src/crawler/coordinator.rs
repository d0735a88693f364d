//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the pieces of a crawl together:
//! - Loading robots.txt and seeding the frontier (start URL, sitemaps)
//! - Running a pool of workers over the shared frontier
//! - Checking robots rules, fetching under the concurrency limit
//! - Extracting signals from HTML pages and following same-site links

use crate::config::Config;
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::result::{CrawlOutput, PageError, PageResult};
use crate::crawler::{FetchOutcome, Fetcher};
use crate::robots::{discover_sitemaps, fetch_sitemap_urls, load_robots, RobotsPolicy};
use crate::signals::analyze_page;
use crate::state::PageState;
use crate::url::{normalize_url, same_site, PathMatcher};
use crate::CompassError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    matcher: PathMatcher,
    /// Normalized start URL; same-site checks are made against it
    root: Url,
    robots: RobotsPolicy,
    frontier: Frontier,
    semaphore: Semaphore,
    processed: AtomicUsize,
    started: Instant,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CompassError)` - Bad start URL, bad patterns or HTTP client failure
    pub fn new(config: Config) -> Result<Self, CompassError> {
        let root = normalize_url(&config.crawler.start_url)?;
        let matcher = PathMatcher::new(&config.exclusions)?;
        let fetcher = Fetcher::new(&config)?;

        tracing::debug!("Crawler user agent: {}", fetcher.user_agent());

        Ok(Self {
            frontier: Frontier::new(config.crawler.max_pages),
            semaphore: Semaphore::new(config.crawler.concurrency),
            config: Arc::new(config),
            fetcher,
            matcher,
            root,
            robots: RobotsPolicy::allow_all(),
            processed: AtomicUsize::new(0),
            started: Instant::now(),
        })
    }

    /// Runs the crawl to completion
    ///
    /// 1. Loads robots.txt (unless robots checks are off)
    /// 2. Seeds the frontier
    /// 3. Runs `workers` tasks until the frontier drains or the budget is hit
    pub async fn run(mut self) -> Result<CrawlOutput, CompassError> {
        tracing::info!("Starting audit crawl of {}", self.root);
        self.started = Instant::now();

        self.robots = if self.config.crawler.respect_robots {
            load_robots(&self.fetcher, &self.root).await
        } else {
            tracing::info!("Robots checks disabled");
            RobotsPolicy::allow_all()
        };

        let sitemap_seeds = self.seed().await;

        let coordinator = Arc::new(self);
        let worker_count = coordinator.config.crawler.worker_count();
        let mut workers = JoinSet::new();

        for worker_id in 0..worker_count {
            let coordinator = Arc::clone(&coordinator);
            workers.spawn(async move { coordinator.worker_loop(worker_id).await });
        }

        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        let (results, mut stats) = coordinator.frontier.take_results();
        stats.sitemap_seeds = sitemap_seeds;
        stats.duration_secs = coordinator.started.elapsed().as_secs_f64();

        tracing::info!(
            "Crawl completed: {} pages in {:.1}s ({} stored, {} blocked, {} failed, {} non-HTML)",
            results.len(),
            stats.duration_secs,
            stats.pages_stored,
            stats.robots_blocked,
            stats.fetch_failed,
            stats.non_html_skipped
        );

        Ok(CrawlOutput {
            start_url: coordinator.root.to_string(),
            results,
            stats,
        })
    }

    /// Seeds the start URL and, when enabled, sitemap URLs
    ///
    /// Returns the number of sitemap seeds accepted.
    async fn seed(&self) -> usize {
        self.frontier.push(CrawlTask::new(self.root.as_str(), 0));

        if !self.config.crawler.use_sitemaps {
            return 0;
        }

        let mut sitemaps = discover_sitemaps(&self.fetcher, &self.root).await;
        for declared in self.robots.sitemaps() {
            if !sitemaps.contains(&declared) {
                sitemaps.push(declared);
            }
        }

        let urls = fetch_sitemap_urls(&self.fetcher, &sitemaps).await;
        let budget = self
            .config
            .crawler
            .max_pages
            .saturating_sub(self.frontier.queued());

        let mut accepted = 0;
        for raw in urls {
            if accepted >= budget {
                break;
            }
            let Ok(url) = normalize_url(&raw) else {
                tracing::debug!("Skipping malformed sitemap URL {}", raw);
                continue;
            };
            if !self.follows(&url) {
                continue;
            }
            if self.frontier.push(CrawlTask::new(url.as_str(), 1)) {
                accepted += 1;
            }
        }

        tracing::info!(
            "Seeded {} URLs from {} sitemap(s)",
            accepted,
            sitemaps.len()
        );
        accepted
    }

    /// Same site as the start URL and not excluded
    fn follows(&self, url: &Url) -> bool {
        same_site(&self.root, url, self.config.crawler.domain_scope)
            && !self.matcher.is_excluded(url)
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!("Worker {} started", worker_id);

        while let Some(task) = self.frontier.next_task().await {
            tracing::debug!(
                "Worker {} processing {} (depth {})",
                worker_id,
                task.url,
                task.depth
            );

            let (result, discovered) = self.process_task(&task).await;
            self.frontier.complete(result, discovered);
            self.report_progress();
        }

        tracing::debug!("Worker {} finished", worker_id);
    }

    fn report_progress(&self) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;

        // Progress reporting every 10 pages
        if processed % 10 == 0 {
            let rate = processed as f64 / self.started.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::info!(
                "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                processed,
                self.frontier.queued(),
                rate
            );
        }
    }

    /// Processes a single task into exactly one result
    ///
    /// Returns the result and the links to enqueue.
    async fn process_task(&self, task: &CrawlTask) -> (PageResult, Vec<CrawlTask>) {
        let mut result = PageResult::new(&task.url, task.depth, PageState::InFlight);

        let url = match Url::parse(&task.url) {
            Ok(url) => url,
            Err(e) => {
                finish(&mut result, PageState::FetchFailed);
                result.error = Some(PageError::Protocol);
                result.error_detail = Some(e.to_string());
                return (result, Vec::new());
            }
        };

        result.excluded = self.matcher.is_excluded(&url);
        result.system_page = self.matcher.is_system_page(&url);

        // Check robots.txt
        if !self
            .robots
            .can_fetch(&self.config.user_agent.crawler_name, url.as_str())
        {
            tracing::info!("URL {} disallowed by robots.txt", url);
            finish(&mut result, PageState::RobotsBlocked);
            result.error = Some(PageError::BlockedByRobots);
            return (result, Vec::new());
        }

        let outcome = match self.semaphore.acquire().await {
            Ok(_permit) => self.fetcher.fetch(url.as_str()).await,
            Err(e) => {
                finish(&mut result, PageState::FetchFailed);
                result.error = Some(PageError::Protocol);
                result.error_detail = Some(e.to_string());
                return (result, Vec::new());
            }
        };

        let page = match outcome {
            FetchOutcome::Response(page) => page,
            FetchOutcome::Failed(failure) => {
                tracing::warn!("Fetch of {} failed: {}", url, failure.message);
                finish(&mut result, PageState::FetchFailed);
                result.error = Some(PageError::from(failure.kind));
                result.error_detail = Some(failure.message);
                return (result, Vec::new());
            }
        };

        result.status = Some(page.status);
        result.final_url = page.final_url.clone();
        result.content_type = page.content_type.clone();

        if !page.is_html() {
            tracing::debug!("Skipping non-HTML {} ({})", url, page.content_type);
            finish(&mut result, PageState::NonHtmlSkipped);
            result.note = Some("skipped (non-HTML)".to_string());
            result.headers = page.headers;
            return (result, Vec::new());
        }

        let page_url = Url::parse(&page.final_url).unwrap_or_else(|_| url.clone());
        let signals = analyze_page(
            &page.body,
            &page_url,
            &page.headers,
            self.config.crawler.domain_scope,
        );

        let next_depth = task.depth + 1;
        let discovered = if next_depth <= self.config.crawler.max_depth {
            signals
                .links
                .iter()
                .filter_map(|link| Url::parse(link).ok())
                .filter(|link| self.follows(link))
                .map(|link| CrawlTask::new(link.as_str(), next_depth))
                .collect()
        } else {
            Vec::new()
        };

        finish(&mut result, PageState::Stored);
        result.headers = page.headers;
        result.signals = Some(signals);

        (result, discovered)
    }
}

fn finish(result: &mut PageResult, state: PageState) {
    debug_assert!(result.state.can_transition_to(state));
    result.state = state;
}

/// Runs a complete crawl
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(CrawlOutput)` - One result per crawled URL
/// * `Err(CompassError)` - The crawl could not start or a worker panicked
pub async fn run_crawl(config: Config) -> Result<CrawlOutput, CompassError> {
    Coordinator::new(config)?.run().await
}
