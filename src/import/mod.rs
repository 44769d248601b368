//! Importers turning crawled routes into markdown documents
//!
//! Both importers work one source at a time: fetch the page again, pick its
//! content region, convert it and write `<slug>.md`. A failing page is
//! logged and counted, never fatal. The index is written at the end of every
//! run, even when it is empty.

mod blog;
mod feed;
mod pages;

pub use blog::{run_blog_import, BlogImporter};
pub use feed::{items_from_manifest, parse_feed, unique_by_link, FeedItem};
pub use pages::{run_pages_import, PagesImporter};

use crate::crawler::fetch_url;
use crate::state::PageState;
use crate::HarvestError;
use reqwest::Client;
use std::fmt;

/// Why one source page produced no document
#[derive(Debug)]
pub struct PageFailure {
    pub state: PageState,
    pub error: HarvestError,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<HarvestError> for PageFailure {
    fn from(error: HarvestError) -> Self {
        Self {
            state: PageState::Failed,
            error,
        }
    }
}

impl From<std::io::Error> for PageFailure {
    fn from(error: std::io::Error) -> Self {
        HarvestError::from(error).into()
    }
}

/// Fetches a source page, accepting only 2xx HTML responses
async fn fetch_page(client: &Client, url: &str) -> Result<String, PageFailure> {
    let result = fetch_url(client, url).await;
    let state = result.state();
    result
        .into_html(url)
        .map_err(|error| PageFailure { state, error })
}
