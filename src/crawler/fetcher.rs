//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building HTTP clients with an identifying user agent
//! - GET requests with redirects followed
//! - Content-Type checks
//! - Error classification into page states

use crate::config::UserAgentConfig;
use crate::state::PageState;
use crate::HarvestError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Page answered 2xx but is not HTML
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-2xx HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, unreadable body)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// The terminal page state this result maps to
    pub fn state(&self) -> PageState {
        match self {
            Self::Success { .. } => PageState::Processed,
            Self::ContentMismatch { .. } => PageState::ContentMismatch,
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => *state,
        }
    }

    /// Converts the result into the HTML body, or the reason there is none
    pub fn into_html(self, url: &str) -> Result<String, HarvestError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::ContentMismatch { content_type } => Err(HarvestError::ContentMismatch {
                url: url.to_string(),
                content_type: if content_type.is_empty() {
                    "unknown content-type".to_string()
                } else {
                    content_type
                },
            }),
            Self::HttpError { status_code, .. } => Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { error, .. } => Err(HarvestError::Network {
                url: url.to_string(),
                message: error,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `component` - Pipeline component name appended to the crawler name
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::UserAgentConfig;
/// use site_harvest::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "onxx".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, "site-crawler").unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    component: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent(component))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Checks whether a Content-Type header value denotes HTML
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Fetches a URL expecting HTML
///
/// Redirects are followed by the client. The status is checked before the
/// Content-Type, and the body is only read for HTML responses.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::from_status(status.as_u16()),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        },
    }
}

/// Fetches a URL as text regardless of its Content-Type
///
/// Used for the syndication feed, which sites serve under a variety of
/// XML and text types.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client.get(url).send().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })
}

fn classify_network_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            state: PageState::Unreachable,
        }
    } else if e.is_redirect() {
        FetchResult::NetworkError {
            error: format!("Redirect error: {}", e),
            state: PageState::Failed,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }
    }
}
