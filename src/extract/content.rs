//! Content region selection
//!
//! Source pages carry inconsistent markup, so the main content is found by
//! trying structural selectors from most to least specific. Each candidate
//! is stripped of chrome (navigation, headers, forms, scripts) before its
//! visible text is measured. The last selector of a profile is always
//! accepted when present.

use crate::extract::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};

/// Descendants removed from a candidate before measuring or converting it
const STRIPPED_TAGS: &str = "script, style, noscript, iframe, header, footer, nav, aside, form";

/// An ordered selector chain with its acceptance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentProfile {
    pub selectors: &'static [&'static str],
    /// Minimum collapsed text length, in characters
    pub min_text_len: usize,
}

impl ContentProfile {
    /// Chain for blog posts, which favors the article body
    pub const BLOG: ContentProfile = ContentProfile {
        selectors: &[
            "main article",
            "article .blog-item-content",
            "article .entry-content",
            "article .sqs-html-content",
            "article",
            "main .sqs-layout",
            "main",
            "#page",
            "body",
        ],
        min_text_len: 120,
    };

    /// Chain for generic site pages
    pub const PAGES: ContentProfile = ContentProfile {
        selectors: &[
            "main article",
            "main .sqs-layout",
            "main",
            "#page",
            "article",
            ".main-content",
            "body",
        ],
        min_text_len: 100,
    };
}

/// The stripped content region of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Selector that produced the region, if any did
    pub selector: Option<&'static str>,
    /// Inner HTML of the stripped region
    pub html: String,
    /// Visible text of the stripped region, whitespace collapsed
    pub text: String,
}

impl ExtractedContent {
    fn empty() -> Self {
        Self {
            selector: None,
            html: String::new(),
            text: String::new(),
        }
    }
}

/// Outcome of evaluating one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Present with enough text, or the final fallback
    Sufficient(ExtractedContent),
    /// Present, but its text is under the threshold
    Thin { text_len: usize },
    /// No element matches
    Absent,
}

/// Evaluates one selector of a chain against a document
pub fn evaluate_candidate(
    document: &Html,
    selector: &'static str,
    min_text_len: usize,
    is_fallback: bool,
) -> Candidate {
    let Ok(parsed) = Selector::parse(selector) else {
        tracing::debug!("Unusable content selector {}", selector);
        return Candidate::Absent;
    };
    let Some(element) = document.select(&parsed).next() else {
        return Candidate::Absent;
    };

    let mut content = strip_region(document, element);
    let text_len = content.text.chars().count();

    if text_len >= min_text_len || is_fallback {
        content.selector = Some(selector);
        Candidate::Sufficient(content)
    } else {
        Candidate::Thin { text_len }
    }
}

/// Picks the main content region of a page
///
/// Returns an empty region only when not even the final fallback matches.
pub fn extract_content(document: &Html, profile: &ContentProfile) -> ExtractedContent {
    let last = profile.selectors.len().saturating_sub(1);

    for (i, selector) in profile.selectors.iter().enumerate() {
        match evaluate_candidate(document, selector, profile.min_text_len, i == last) {
            Candidate::Sufficient(content) => return content,
            Candidate::Thin { text_len } => {
                tracing::trace!("Content candidate {} too thin ({} chars)", selector, text_len);
            }
            Candidate::Absent => {}
        }
    }

    ExtractedContent::empty()
}

/// Copies a region with its chrome descendants removed
fn strip_region(document: &Html, element: ElementRef) -> ExtractedContent {
    let stripped: Vec<_> = match Selector::parse(STRIPPED_TAGS) {
        Ok(selector) => element
            .select(&selector)
            .map(|e| e.id())
            .filter(|id| *id != element.id())
            .collect(),
        Err(_) => Vec::new(),
    };

    if stripped.is_empty() {
        return region_content(element);
    }

    let mut copy = document.clone();
    for id in stripped {
        if let Some(mut node) = copy.tree.get_mut(id) {
            node.detach();
        }
    }

    match copy.tree.get(element.id()).and_then(ElementRef::wrap) {
        Some(region) => region_content(region),
        None => ExtractedContent::empty(),
    }
}

fn region_content(element: ElementRef) -> ExtractedContent {
    ExtractedContent {
        selector: None,
        html: element.inner_html(),
        text: collapse_whitespace(&element.text().collect::<String>()),
    }
}
