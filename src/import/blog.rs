//! Blog importer
//!
//! Sources come from the syndication feed, or from the route manifest when
//! the feed is unavailable or empty. Each post is written to
//! `blog/<slug>.md` and summarized in `blog-index.json`, newest first.

use crate::config::{Config, OutputConfig};
use crate::content::{frontmatter, slug_from_url, FrontMatter, SlugAllocator};
use crate::crawler::{build_http_client, fetch_text};
use crate::extract::{
    excerpt_from_text, extract_content, first_attr, first_text, meta_content, parse_date,
    ContentProfile, MarkdownConverter, EXCERPT_LENGTH,
};
use crate::import::feed::{items_from_manifest, parse_feed, unique_by_link, FeedItem};
use crate::import::{fetch_page, PageFailure};
use crate::output::{iso_timestamp, write_json, BlogIndex, BlogIndexEntry, ImportReport};
use crate::url::{RouteClassifier, UrlNormalizer};
use crate::HarvestError;
use chrono::Utc;
use reqwest::Client;
use scraper::Html;

/// Client header component name for the blog importer
const USER_AGENT_COMPONENT: &str = "blog-importer";

/// Slug used when a post URL yields none
const FALLBACK_SLUG: &str = "post";

/// A post's fields resolved from its page, before a slug is assigned
#[derive(Debug)]
struct PostContent {
    title: String,
    date: String,
    excerpt: String,
    body: String,
}

pub struct BlogImporter {
    client: Client,
    normalizer: UrlNormalizer,
    classifier: RouteClassifier,
    converter: MarkdownConverter,
    output: OutputConfig,
    feed_url: String,
}

impl BlogImporter {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let normalizer = UrlNormalizer::new(&config.site.origin)?;
        let feed_url = format!("{}{}", normalizer.origin(), config.site.feed_path);
        let client = build_http_client(&config.user_agent, USER_AGENT_COMPONENT).map_err(
            |source| HarvestError::Http {
                url: feed_url.clone(),
                source,
            },
        )?;

        Ok(Self {
            client,
            normalizer,
            classifier: RouteClassifier::new(config.site.assessment_path.clone()),
            converter: MarkdownConverter::new(),
            output: config.output.clone(),
            feed_url,
        })
    }

    /// Items from the feed, never failing
    async fn load_from_feed(&self) -> Vec<FeedItem> {
        let parsed = match fetch_text(&self.client, &self.feed_url).await {
            Ok(xml) => parse_feed(&xml, &self.feed_url, &self.normalizer, &self.classifier),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(items) => {
                tracing::info!("Feed: parsed {} items", items.len());
                items
            }
            Err(e) => {
                tracing::warn!("Feed unavailable ({})", e);
                Vec::new()
            }
        }
    }

    /// Deduplicated posts to import
    ///
    /// The route manifest is consulted only when the feed yields nothing.
    pub async fn load_items(&self) -> Vec<FeedItem> {
        let mut items = self.load_from_feed().await;
        if items.is_empty() {
            items = items_from_manifest(
                &self.output.routes_file(),
                &self.normalizer,
                &self.classifier,
            );
        }
        unique_by_link(items)
    }

    /// Imports every post and writes the blog index
    pub async fn run(&self) -> Result<ImportReport, HarvestError> {
        let blog_dir = self.output.blog_dir();
        std::fs::create_dir_all(&blog_dir)?;

        let items = self.load_items().await;
        let mut report = ImportReport::new();
        let mut slugs = SlugAllocator::new();
        let mut posts = Vec::with_capacity(items.len());

        for item in &items {
            match self.import_post(item, &mut slugs).await {
                Ok(entry) => {
                    tracing::debug!("Imported {} as {}", item.link, entry.slug);
                    report.record_imported();
                    posts.push(entry);
                }
                Err(failure) => {
                    tracing::warn!("Failed {} ({})", item.link, failure);
                    report.record_failure(&item.link, failure.state, failure.to_string());
                }
            }
        }

        let index_file = self.output.blog_index_file();
        let index = BlogIndex::new(self.normalizer.origin(), posts);
        write_json(&index_file, &index)?;

        report.log_summary();
        tracing::info!("Wrote {}", index_file.display());
        tracing::info!(
            "Wrote {} markdown files to {}",
            index.posts.len(),
            blog_dir.display()
        );

        Ok(report)
    }

    async fn import_post(
        &self,
        item: &FeedItem,
        slugs: &mut SlugAllocator,
    ) -> Result<BlogIndexEntry, PageFailure> {
        let html = fetch_page(&self.client, &item.link).await?;
        let post = self.read_post(&html, item);

        let slug = slugs.allocate(&slug_from_url(&item.link, FALLBACK_SLUG));
        let fields = FrontMatter {
            title: Some(post.title.clone()),
            date: Some(post.date.clone()),
            slug: Some(slug.clone()),
            source: Some(item.link.clone()),
            excerpt: Some(post.excerpt.clone()),
            page_type: None,
        };

        let path = self.output.blog_dir().join(format!("{}.md", slug));
        std::fs::write(&path, frontmatter::encode(&fields, &post.body))?;

        Ok(BlogIndexEntry {
            slug,
            title: post.title,
            date: post.date,
            source: item.link.clone(),
            excerpt: post.excerpt,
        })
    }

    /// Resolves title, date, excerpt and body from a fetched page
    fn read_post(&self, html: &str, item: &FeedItem) -> PostContent {
        let document = Html::parse_document(html);
        let content = extract_content(&document, &ContentProfile::BLOG);

        let title = Some(item.title.clone())
            .filter(|title| !title.is_empty())
            .or_else(|| meta_content(&document, "og:title"))
            .or_else(|| first_text(&document, "article h1"))
            .or_else(|| first_text(&document, "h1"))
            .unwrap_or_else(|| slug_from_url(&item.link, FALLBACK_SLUG));

        let date = item
            .published
            .or_else(|| {
                meta_content(&document, "article:published_time").and_then(|d| parse_date(&d))
            })
            .or_else(|| {
                first_attr(&document, "time[datetime]", "datetime").and_then(|d| parse_date(&d))
            })
            .unwrap_or_else(Utc::now);

        PostContent {
            title,
            date: iso_timestamp(&date),
            excerpt: excerpt_from_text(&content.text, EXCERPT_LENGTH),
            body: self.converter.body_for(&content),
        }
    }
}

/// Runs the blog importer for a configuration
pub async fn run_blog_import(config: &Config) -> Result<ImportReport, HarvestError> {
    BlogImporter::new(config)?.run().await
}
