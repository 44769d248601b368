//! Crawler module for route discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect following and error classification
//! - Link extraction from raw HTML
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod links;

pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{build_http_client, fetch_text, fetch_url, is_html, FetchResult};
pub use links::{
    extract_internal_links, is_navigational, DomHrefScanner, HrefScanner, RegexHrefScanner,
};
