use serde::Deserialize;
use std::path::PathBuf;

/// Feed location used when the config does not name one
pub const DEFAULT_FEED_PATH: &str = "/blog?format=rss";

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The site being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme + host (+ port) of the site; nothing outside it is crawled
    pub origin: String,

    /// URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Path that classifies as an assessment route
    #[serde(rename = "assessment-path", default)]
    pub assessment_path: Option<String>,

    /// Path (and query) of the blog's syndication feed
    #[serde(rename = "feed-path", default = "default_feed_path")]
    pub feed_path: String,
}

fn default_feed_path() -> String {
    DEFAULT_FEED_PATH.to_string()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name prefix shared by every component's client header
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the client header for one pipeline component
    ///
    /// Format: `name-component/version (+contact)`
    pub fn user_agent(&self, component: &str) -> String {
        format!(
            "{}-{}/{} (+{})",
            self.crawler_name, component, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory every manifest, index and document is written under
    #[serde(rename = "content-dir")]
    pub content_dir: PathBuf,
}

impl OutputConfig {
    pub fn routes_file(&self) -> PathBuf {
        self.content_dir.join("routes.json")
    }

    pub fn blog_dir(&self) -> PathBuf {
        self.content_dir.join("blog")
    }

    pub fn blog_index_file(&self) -> PathBuf {
        self.content_dir.join("blog-index.json")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.content_dir.join("pages")
    }

    pub fn pages_index_file(&self) -> PathBuf {
        self.content_dir.join("pages-index.json")
    }
}
