//! Read interface over an imported content directory
//!
//! Indexes and documents are read from disk on every call; nothing is
//! cached between lookups. Slugs are checked before any path is built.

use crate::config::OutputConfig;
use crate::content::frontmatter::{self, Document};
use crate::content::is_valid_slug;
use crate::output::{read_json, sort_by_date_desc, BlogIndex, BlogIndexEntry, PagesIndex, PagesIndexEntry};
use crate::HarvestError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

static MARKDOWN_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"));
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid regex"));
static MARKUP_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[`*_>#~-]").expect("valid regex"));

/// A blog post read back from disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub source: String,
    pub excerpt: String,
    pub content_markdown: String,
}

/// A site page read back from disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPage {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub source: String,
    pub content_markdown: String,
}

/// Plain-text excerpt of a markdown body
///
/// Images are dropped, links reduced to their text, markup punctuation
/// removed and whitespace collapsed before taking 200 characters.
pub fn excerpt_from_markdown(markdown: &str) -> String {
    let plain = MARKDOWN_IMAGE.replace_all(markdown, "");
    let plain = MARKDOWN_LINK.replace_all(&plain, "$1");
    let plain = MARKUP_PUNCTUATION.replace_all(&plain, "");
    crate::extract::collapse_whitespace(&plain)
        .chars()
        .take(crate::extract::EXCERPT_LENGTH)
        .collect()
}

fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

/// Returns the first non-empty candidate, trimmed
fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reads documents written by the importers
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    output: OutputConfig,
}

impl ContentLibrary {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Library rooted at a content directory
    pub fn at(content_dir: impl Into<PathBuf>) -> Self {
        Self::new(OutputConfig {
            content_dir: content_dir.into(),
        })
    }

    /// The blog index, newest first
    ///
    /// A missing or malformed index file is an error.
    pub fn blog_index(&self) -> Result<Vec<BlogIndexEntry>, HarvestError> {
        let index: BlogIndex = read_json(&self.output.blog_index_file())?;

        let mut posts: Vec<BlogIndexEntry> = index
            .posts
            .into_iter()
            .map(|post| BlogIndexEntry {
                slug: normalize_slug(&post.slug),
                title: post.title.trim().to_string(),
                date: post.date.trim().to_string(),
                source: post.source.trim().to_string(),
                excerpt: post.excerpt.trim().to_string(),
            })
            .filter(|post| !post.slug.is_empty())
            .collect();

        sort_by_date_desc(&mut posts);
        Ok(posts)
    }

    /// One blog post by slug, or `None` if the slug is invalid or unknown
    pub fn blog_post(&self, slug: &str) -> Result<Option<BlogPost>, HarvestError> {
        let slug = normalize_slug(slug);
        if !is_valid_slug(&slug) {
            return Ok(None);
        }

        let Some(document) = read_document(&self.output.blog_dir(), &slug)? else {
            return Ok(None);
        };
        let fields = &document.front_matter;

        Ok(Some(BlogPost {
            slug: first_present([fields.slug.as_deref()]).unwrap_or_else(|| slug.clone()),
            title: first_present([fields.title.as_deref()]).unwrap_or_else(|| slug.clone()),
            date: first_present([fields.date.as_deref()]).unwrap_or_default(),
            source: first_present([fields.source.as_deref()]).unwrap_or_default(),
            excerpt: first_present([fields.excerpt.as_deref()])
                .unwrap_or_else(|| excerpt_from_markdown(&document.body)),
            content_markdown: document.body,
        }))
    }

    /// The pages index, in file order
    ///
    /// A missing or unparseable index file reads as empty.
    pub fn pages_index(&self) -> Result<Vec<PagesIndexEntry>, HarvestError> {
        let path = self.output.pages_index_file();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let index: PagesIndex = match serde_json::from_str(&raw) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Ignoring unreadable pages index {}: {}", path.display(), e);
                return Ok(Vec::new());
            }
        };

        Ok(index
            .pages
            .into_iter()
            .map(|page| PagesIndexEntry {
                slug: normalize_slug(&page.slug),
                title: page.title.trim().to_string(),
                page_type: page.page_type.trim().to_string(),
                source: page.source.trim().to_string(),
            })
            .filter(|page| !page.slug.is_empty())
            .collect())
    }

    /// One page by slug, or `None` if the slug is invalid or unknown
    ///
    /// Each field comes from the front-matter, then the pages index entry,
    /// then a default.
    pub fn page(&self, slug: &str) -> Result<Option<ImportedPage>, HarvestError> {
        let slug = normalize_slug(slug);
        if !is_valid_slug(&slug) {
            return Ok(None);
        }

        let Some(document) = read_document(&self.output.pages_dir(), &slug)? else {
            return Ok(None);
        };
        let pages = self.pages_index()?;
        let indexed = pages.iter().find(|page| page.slug == slug);
        let fields = &document.front_matter;

        Ok(Some(ImportedPage {
            slug: first_present([fields.slug.as_deref(), indexed.map(|p| p.slug.as_str())])
                .unwrap_or_else(|| slug.clone()),
            title: first_present([fields.title.as_deref(), indexed.map(|p| p.title.as_str())])
                .unwrap_or_else(|| slug.clone()),
            page_type: first_present([
                fields.page_type.as_deref(),
                indexed.map(|p| p.page_type.as_str()),
            ])
            .unwrap_or_else(|| "page".to_string()),
            source: first_present([fields.source.as_deref(), indexed.map(|p| p.source.as_str())])
                .unwrap_or_default(),
            content_markdown: document.body,
        }))
    }

    /// Resolves the site's home page
    ///
    /// Tries `home`, `index`, the first home-typed index entry and then the
    /// first index entry, each slug at most once.
    pub fn home_page(&self) -> Result<Option<ImportedPage>, HarvestError> {
        let pages = self.pages_index()?;
        let candidates = [
            Some("home"),
            Some("index"),
            pages
                .iter()
                .find(|page| page.page_type.eq_ignore_ascii_case("home"))
                .map(|page| page.slug.as_str()),
            pages.first().map(|page| page.slug.as_str()),
        ];

        let mut tried: Vec<String> = Vec::new();
        for candidate in candidates.into_iter().flatten() {
            let slug = normalize_slug(candidate);
            if slug.is_empty() || tried.contains(&slug) {
                continue;
            }
            if let Some(page) = self.page(&slug)? {
                return Ok(Some(page));
            }
            tried.push(slug);
        }

        Ok(None)
    }
}

/// Reads and parses `<dir>/<slug>.md`, or `None` if it does not exist
fn read_document(dir: &Path, slug: &str) -> Result<Option<Document>, HarvestError> {
    let path = dir.join(format!("{}.md", slug));
    match std::fs::read_to_string(&path) {
        Ok(raw) => Ok(Some(frontmatter::parse(&raw))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
