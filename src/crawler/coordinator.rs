//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Seeding the frontier
//! - Fetching one URL at a time, redirects followed
//! - Link extraction and enqueueing of newly discovered URLs
//! - Building the sorted route manifest

use crate::config::Config;
use crate::crawler::links::{extract_internal_links, HrefScanner, RegexHrefScanner};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{write_json, Route, RouteManifest};
use crate::state::CrawlState;
use crate::url::{RouteClassifier, UrlNormalizer};
use crate::{ConfigError, HarvestError};
use reqwest::Client;
use url::Url;

/// Client header component name for the crawler
const USER_AGENT_COMPONENT: &str = "site-crawler";

/// Main crawler structure
///
/// Owns the stateless collaborators of a crawl. The mutable run state lives
/// in a [`CrawlState`] created per call to [`Crawler::crawl`].
pub struct Crawler {
    client: Client,
    normalizer: UrlNormalizer,
    classifier: RouteClassifier,
    scanner: Box<dyn HrefScanner>,
}

impl Crawler {
    /// Creates a crawler for the configured site
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let normalizer = UrlNormalizer::new(&config.site.origin)?;
        let classifier = RouteClassifier::new(config.site.assessment_path.clone());
        let client = build_http_client(&config.user_agent, USER_AGENT_COMPONENT).map_err(
            |source| HarvestError::Http {
                url: config.site.origin.clone(),
                source,
            },
        )?;

        Ok(Self {
            client,
            normalizer,
            classifier,
            scanner: Box::new(RegexHrefScanner),
        })
    }

    /// Replaces the href scanner used for link extraction
    pub fn with_scanner(mut self, scanner: Box<dyn HrefScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Crawls every same-origin HTML route reachable from `seeds`
    ///
    /// Per-URL failures are logged and skipped. The only fatal error is a
    /// seed list that yields no canonical URL at all.
    pub async fn crawl(&self, seeds: &[String]) -> Result<RouteManifest, HarvestError> {
        let mut state = CrawlState::new();

        for seed in seeds {
            match self.normalizer.normalize(seed) {
                Ok(url) => {
                    state.enqueue(url);
                }
                Err(e) => tracing::warn!("Ignoring seed {} ({})", seed, e),
            }
        }

        if state.frontier_size() == 0 {
            return Err(ConfigError::Validation(
                "No seed URL normalizes to a crawlable page".to_string(),
            )
            .into());
        }

        tracing::info!(
            "Starting crawl of {} with {} seed URLs",
            self.normalizer.origin(),
            state.frontier_size()
        );

        let start_time = std::time::Instant::now();
        let mut pages_crawled = 0usize;

        while let Some(url) = state.next_url() {
            self.process_url(&mut state, &url).await;
            pages_crawled += 1;

            if pages_crawled % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages fetched, {} in frontier, {} discovered",
                    pages_crawled,
                    state.frontier_size(),
                    state.discovered_count()
                );
            }
        }

        tracing::info!(
            "Crawl finished: {} pages fetched in {:?}",
            pages_crawled,
            start_time.elapsed()
        );
        tracing::info!("Outcomes: {}", state.outcome_summary());

        Ok(self.build_manifest(state))
    }

    /// Fetches one dequeued URL and enqueues the links it exposes
    async fn process_url(&self, state: &mut CrawlState, url: &str) {
        tracing::debug!("Processing URL: {}", url);

        let fetch_result = fetch_url(&self.client, url).await;
        state.record_outcome(fetch_result.state());

        match fetch_result {
            FetchResult::Success {
                final_url, body
            } => {
                let route_url = match self.normalizer.normalize(&final_url) {
                    Ok(normalized) => normalized,
                    Err(e) => {
                        tracing::debug!(
                            "Redirect target {} unusable ({}), keeping {}",
                            final_url,
                            e,
                            url
                        );
                        url.to_string()
                    }
                };

                let base = match Url::parse(&route_url) {
                    Ok(base) => base,
                    Err(e) => {
                        tracing::warn!("Skipping links of {} ({})", route_url, e);
                        state.record_html_route(route_url);
                        return;
                    }
                };

                let links =
                    extract_internal_links(self.scanner.as_ref(), &self.normalizer, &body, &base);
                let mut enqueued = 0;
                for link in links {
                    if state.enqueue(link) {
                        enqueued += 1;
                    }
                }
                tracing::debug!("{}: {} new links", route_url, enqueued);

                state.record_html_route(route_url);
            }

            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {} (not HTML: {})", url, content_type);
            }

            FetchResult::HttpError { status_code, .. } => {
                tracing::warn!("Skipping {} (HTTP {})", url, status_code);
            }

            FetchResult::NetworkError { error, .. } => {
                tracing::warn!("Skipping {} (network error: {})", url, error);
            }
        }
    }

    /// Classifies every confirmed HTML route and sorts by path
    fn build_manifest(&self, state: CrawlState) -> RouteManifest {
        let routes = state
            .into_html_routes()
            .into_iter()
            .map(|url| {
                let pathname = self.normalizer.pathname(&url).to_string();
                Route {
                    route_type: self.classifier.classify(&pathname),
                    url,
                    pathname,
                }
            })
            .collect();

        RouteManifest::new(self.normalizer.origin(), routes)
    }
}

/// Runs the crawl and writes the route manifest
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::load_config;
/// use site_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// run_crawl(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<RouteManifest, HarvestError> {
    let crawler = Crawler::new(config)?;
    let manifest = crawler.crawl(&config.site.seeds).await?;

    let routes_file = config.output.routes_file();
    write_json(&routes_file, &manifest)?;

    tracing::info!(
        "Discovered {} HTML routes from {}",
        manifest.routes.len(),
        manifest.origin
    );
    tracing::info!("Wrote {}", routes_file.display());

    Ok(manifest)
}
