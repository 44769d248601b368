//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the frontier and the discovered / visited / HTML-route sets of one run
//! - `PageState`: the terminal outcome of fetching one canonical URL

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
