//! Run statistics for the importers
//!
//! Each importer tallies per-URL outcomes into an [`ImportReport`] and logs
//! its summary line once the index has been written.

use crate::state::PageState;
use std::collections::BTreeMap;

/// One URL the importer could not turn into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub url: String,
    pub state: PageState,
    pub reason: String,
}

/// Outcome tally of one importer run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Number of documents written
    pub imported: usize,

    /// URLs that were skipped, in processing order
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_imported(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, url: &str, state: PageState, reason: impl Into<String>) {
        self.failures.push(ImportFailure {
            url: url.to_string(),
            state,
            reason: reason.into(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failure counts per outcome, in a stable order
    pub fn failures_by_state(&self) -> BTreeMap<PageState, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.state).or_insert(0) += 1;
        }
        counts
    }

    /// The one-line summary logged at the end of a run
    pub fn summary_line(&self) -> String {
        format!(
            "Import complete: {} imported, {} failed",
            self.imported,
            self.failed()
        )
    }

    /// Logs the summary line and a breakdown of failures
    pub fn log_summary(&self) {
        tracing::info!("{}", self.summary_line());

        for (state, count) in self.failures_by_state() {
            tracing::info!("  {}: {}", state, count);
        }
        for failure in &self.failures {
            tracing::debug!("  {} ({}): {}", failure.url, failure.state, failure.reason);
        }
    }
}
