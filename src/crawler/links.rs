//! Link extraction from raw page markup
//!
//! Scanning for anchor hrefs sits behind the [`HrefScanner`] trait. The
//! default [`RegexHrefScanner`] is a best-effort pass over the text that
//! tolerates malformed attributes; [`DomHrefScanner`] walks a parsed DOM
//! instead. Either way, every candidate href then goes through the same
//! filtering and normalization in [`extract_internal_links`].

use crate::url::UrlNormalizer;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\b[^>]*\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("valid regex")
});

/// Schemes that never lead to a page
const NON_NAVIGATIONAL: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Finds the raw href values of anchor elements in a document
pub trait HrefScanner: Send + Sync {
    /// Returns every anchor href in document order, unresolved
    fn scan(&self, html: &str) -> Vec<String>;
}

/// Text scanner over `<a ... href=...>` with double, single or no quotes
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexHrefScanner;

impl HrefScanner for RegexHrefScanner {
    fn scan(&self, html: &str) -> Vec<String> {
        ANCHOR_HREF
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Structural scanner over a parsed DOM
#[derive(Debug, Clone, Copy, Default)]
pub struct DomHrefScanner;

impl HrefScanner for DomHrefScanner {
    fn scan(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

/// Checks whether an href can lead to another page at all
///
/// Excludes empty hrefs, same-page fragments and mail/phone/script links.
pub fn is_navigational(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !NON_NAVIGATIONAL
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Extracts canonical same-origin page links from raw HTML
///
/// # Arguments
///
/// * `scanner` - Finds candidate hrefs in the markup
/// * `normalizer` - Resolves and canonicalizes each href
/// * `html` - The page markup
/// * `page_url` - The page's own canonical URL, used as the resolution base
///
/// # Returns
///
/// Canonical URLs in document order. Duplicates are kept; the crawler's
/// discovered set removes them.
pub fn extract_internal_links(
    scanner: &dyn HrefScanner,
    normalizer: &UrlNormalizer,
    html: &str,
    page_url: &Url,
) -> Vec<String> {
    let mut links = Vec::new();

    for href in scanner.scan(html) {
        if !is_navigational(&href) {
            continue;
        }

        match normalizer.normalize_with_base(href.trim(), page_url) {
            Ok(link) => links.push(link),
            Err(e) => tracing::trace!("Ignoring link {} on {}: {}", href, page_url, e),
        }
    }

    links
}
