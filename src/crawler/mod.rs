//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching (one attempt per URL, no retries)
//! - HTML link extraction
//! - The shared breadth-first frontier with its page budget
//! - Overall crawl coordination across workers

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod result;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{FetchErrorKind, FetchFailure, FetchOutcome, FetchedPage, Fetcher};
pub use frontier::{CrawlTask, Frontier, Reservation};
pub use parser::extract_links;
pub use result::{CrawlOutput, CrawlStats, PageError, PageResult};
