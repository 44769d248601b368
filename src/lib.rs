//! Site-Harvest: turns a live website into a local, versioned markdown corpus
//!
//! The pipeline has two stages that only talk to each other through files on
//! disk:
//!
//! 1. The crawler walks every same-origin HTML route reachable from a set of
//!    seeds and writes a route manifest.
//! 2. The importers re-fetch those routes (or the blog's syndication feed),
//!    pull out the main content region, convert it to markdown with a
//!    front-matter header and write a sorted document index.
//!
//! The [`content`] module holds the read half of that round trip.

pub mod config;
pub mod content;
pub mod crawler;
pub mod extract;
pub mod import;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Not HTML ({content_type}) at {url}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Feed error for {url}: {message}")]
    Feed { url: String, message: String },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Route manifest not found at {}", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons the URL normalizer rejects a candidate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Outside the site origin: {0}")]
    CrossOrigin(String),

    #[error("Static asset: {0}")]
    StaticAsset(String),
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlState, PageState};
pub use url::{RouteClassifier, RouteType, UrlNormalizer};
