//! Blog post sources: the syndication feed and the route manifest

use crate::extract::collapse_whitespace;
use crate::output::RouteManifest;
use crate::url::{is_blog_post_path, RouteClassifier, RouteType, UrlNormalizer};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;

/// One blog post to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Feed title, whitespace collapsed; empty when unknown
    pub title: String,
    /// Canonical post URL
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

/// Canonical link of a blog post, or `None` for anything else
fn blog_post_link(
    normalizer: &UrlNormalizer,
    classifier: &RouteClassifier,
    raw: &str,
) -> Option<String> {
    let link = normalizer.normalize(raw.trim()).ok()?;
    let path = normalizer.pathname(&link);
    (classifier.classify(path) == RouteType::BlogPost).then_some(link)
}

/// Parses an RSS or Atom document into blog post items
///
/// Entries without a link, or whose link is not a same-origin blog post,
/// are skipped.
pub fn parse_feed(
    xml: &str,
    feed_url: &str,
    normalizer: &UrlNormalizer,
    classifier: &RouteClassifier,
) -> Result<Vec<FeedItem>, HarvestError> {
    let feed = feed_rs::parser::parse(xml.as_bytes()).map_err(|e| HarvestError::Feed {
        url: feed_url.to_string(),
        message: e.to_string(),
    })?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let raw_link = entry.links.first().map(|link| link.href.clone())?;
            let Some(link) = blog_post_link(normalizer, classifier, &raw_link) else {
                tracing::debug!("Ignoring feed entry {}", raw_link);
                return None;
            };

            Some(FeedItem {
                title: entry
                    .title
                    .map(|t| collapse_whitespace(&t.content))
                    .unwrap_or_default(),
                link,
                published: entry.published,
            })
        })
        .collect();

    Ok(items)
}

/// Blog post items derived from a crawled route manifest
///
/// Routes typed `blogPost`, or whose path has the `/blog/<slug>` shape, are
/// kept. A missing or unreadable manifest yields no items.
pub fn items_from_manifest(
    path: &Path,
    normalizer: &UrlNormalizer,
    classifier: &RouteClassifier,
) -> Vec<FeedItem> {
    let manifest = match RouteManifest::load(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("Routes fallback unavailable ({})", e);
            return Vec::new();
        }
    };

    let items: Vec<FeedItem> = manifest
        .routes
        .into_iter()
        .filter(|route| {
            route.route_type == RouteType::BlogPost || is_blog_post_path(&route.pathname)
        })
        .filter_map(|route| blog_post_link(normalizer, classifier, &route.url))
        .map(|link| FeedItem {
            title: String::new(),
            link,
            published: None,
        })
        .collect();

    tracing::info!("Routes fallback: parsed {} posts", items.len());
    items
}

/// Drops repeated links, keeping the first occurrence
pub fn unique_by_link(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.link.clone()))
        .collect()
}
