use crate::state::PageState;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Mutable context of one crawl run
///
/// Holds the FIFO frontier and the three sets that make the crawl terminate:
/// a URL enters the frontier at most once (`discovered`), is fetched at most
/// once (`visited`), and is reported only if it served HTML (`html_routes`).
/// All keys are canonical URLs.
#[derive(Debug, Default)]
pub struct CrawlState {
    frontier: VecDeque<String>,
    discovered: HashSet<String>,
    visited: HashSet<String>,
    html_routes: HashSet<String>,
    outcomes: BTreeMap<PageState, usize>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to the back of the frontier unless it was discovered before
    ///
    /// Returns true if the URL was newly enqueued.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.discovered.contains(&url) {
            return false;
        }
        self.discovered.insert(url.clone());
        self.frontier.push_back(url);
        true
    }

    /// Dequeues the next URL that has not been visited yet and marks it visited
    pub fn next_url(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Records a canonical URL confirmed to serve HTML
    pub fn record_html_route(&mut self, url: String) {
        self.html_routes.insert(url);
    }

    /// Records the terminal state of one dequeued URL
    pub fn record_outcome(&mut self, state: PageState) {
        *self.outcomes.entry(state).or_insert(0) += 1;
    }

    pub fn outcome_count(&self, state: PageState) -> usize {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// One-line `state=count` listing of the outcomes, or `none`
    pub fn outcome_summary(&self) -> String {
        if self.outcomes.is_empty() {
            return "none".to_string();
        }
        self.outcomes
            .iter()
            .map(|(state, count)| format!("{}={}", state, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Consumes the run and returns the confirmed HTML routes, unordered
    pub fn into_html_routes(self) -> HashSet<String> {
        self.html_routes
    }
}
