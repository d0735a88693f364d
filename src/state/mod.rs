//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: where a single crawl task is in its lifecycle

mod page_state;

// Re-export main types
pub use page_state::PageState;
