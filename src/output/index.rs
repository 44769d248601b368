use crate::output::{iso8601, parse_iso_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_page_type() -> String {
    "page".to_string()
}

/// Summary of one imported blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogIndexEntry {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub excerpt: String,
}

/// The blog document index, newest post first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogIndex {
    #[serde(default)]
    pub source: String,
    #[serde(rename = "generatedAtISO", with = "iso8601", default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub posts: Vec<BlogIndexEntry>,
}

impl BlogIndex {
    pub fn new(source: &str, mut posts: Vec<BlogIndexEntry>) -> Self {
        sort_by_date_desc(&mut posts);
        Self {
            source: source.to_string(),
            generated_at: Utc::now(),
            posts,
        }
    }
}

/// Sorts posts newest first
///
/// Entries whose date does not parse go last, keeping their relative order.
pub fn sort_by_date_desc(posts: &mut [BlogIndexEntry]) {
    posts.sort_by_cached_key(|post| std::cmp::Reverse(parse_iso_timestamp(&post.date)));
}

/// Summary of one imported page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesIndexEntry {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default = "default_page_type")]
    pub page_type: String,
    #[serde(default)]
    pub source: String,
}

/// The pages document index, sorted by slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesIndex {
    #[serde(rename = "generatedAtISO", with = "iso8601", default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub pages: Vec<PagesIndexEntry>,
}

impl PagesIndex {
    pub fn new(mut pages: Vec<PagesIndexEntry>) -> Self {
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        Self {
            generated_at: Utc::now(),
            pages,
        }
    }
}
