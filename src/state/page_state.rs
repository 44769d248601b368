/// Page state definitions for tracking crawl progress
///
/// Every canonical URL the crawler dequeues ends in exactly one terminal state.
use std::fmt;

/// Outcome of fetching one canonical URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Page served HTML; its links were followed
    Processed,

    // ===== Skip States =====
    /// Page answered 2xx with a non-HTML Content-Type
    ContentMismatch,

    // ===== Error States =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned HTTP 429
    RateLimited,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Any other non-2xx status or an unreadable body
    Failed,
}

impl PageState {
    /// Short machine-readable name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::ContentMismatch => "content_mismatch",
            Self::DeadLink => "dead_link",
            Self::RateLimited => "rate_limited",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
        }
    }

    /// Maps a non-success HTTP status to its terminal state
    pub fn from_status(status: u16) -> Self {
        match status {
            404 | 410 => Self::DeadLink,
            429 => Self::RateLimited,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
