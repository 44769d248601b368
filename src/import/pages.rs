//! Pages importer
//!
//! Imports every `home`, `page` and `assessment` route of the manifest into
//! `pages/<slug>.md` and writes `pages-index.json` sorted by slug. A missing
//! manifest aborts the run.

use crate::config::{Config, OutputConfig};
use crate::content::{frontmatter, slug_from_pathname, FrontMatter, SlugAllocator};
use crate::crawler::build_http_client;
use crate::extract::{extract_content, first_text, meta_content, ContentProfile, MarkdownConverter};
use crate::import::{fetch_page, PageFailure};
use crate::output::{write_json, ImportReport, PagesIndex, PagesIndexEntry, Route, RouteManifest};
use crate::HarvestError;
use reqwest::Client;
use scraper::Html;

/// Client header component name for the pages importer
const USER_AGENT_COMPONENT: &str = "pages-importer";

pub struct PagesImporter {
    client: Client,
    converter: MarkdownConverter,
    output: OutputConfig,
}

impl PagesImporter {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, USER_AGENT_COMPONENT).map_err(
            |source| HarvestError::Http {
                url: config.site.origin.clone(),
                source,
            },
        )?;

        Ok(Self {
            client,
            converter: MarkdownConverter::new(),
            output: config.output.clone(),
        })
    }

    /// Routes to import as pages, in manifest order
    pub fn load_routes(&self) -> Result<Vec<Route>, HarvestError> {
        let manifest = RouteManifest::load(&self.output.routes_file())?;
        Ok(manifest
            .routes
            .into_iter()
            .filter(|route| route.route_type.is_page_like())
            .filter(|route| !route.url.is_empty() && !route.pathname.is_empty())
            .collect())
    }

    /// Imports every page route and writes the pages index
    pub async fn run(&self) -> Result<ImportReport, HarvestError> {
        let pages_dir = self.output.pages_dir();
        std::fs::create_dir_all(&pages_dir)?;

        let routes = self.load_routes()?;
        tracing::info!("Importing {} page routes", routes.len());

        let mut report = ImportReport::new();
        let mut slugs = SlugAllocator::new();
        let mut pages = Vec::with_capacity(routes.len());

        for route in &routes {
            match self.import_page(route, &mut slugs).await {
                Ok(entry) => {
                    tracing::debug!("Imported {} as {}", route.url, entry.slug);
                    report.record_imported();
                    pages.push(entry);
                }
                Err(failure) => {
                    tracing::warn!("Failed {} ({})", route.url, failure);
                    report.record_failure(&route.url, failure.state, failure.to_string());
                }
            }
        }

        let index_file = self.output.pages_index_file();
        let index = PagesIndex::new(pages);
        write_json(&index_file, &index)?;

        report.log_summary();
        tracing::info!("Wrote {}", index_file.display());
        tracing::info!(
            "Wrote {} markdown files to {}",
            index.pages.len(),
            pages_dir.display()
        );

        Ok(report)
    }

    async fn import_page(
        &self,
        route: &Route,
        slugs: &mut SlugAllocator,
    ) -> Result<PagesIndexEntry, PageFailure> {
        let html = fetch_page(&self.client, &route.url).await?;

        let base_slug = slug_from_pathname(&route.pathname);
        let (title, body) = self.read_page(&html, &base_slug);
        let slug = slugs.allocate(&base_slug);
        let page_type = route.route_type.as_str().to_string();

        let fields = FrontMatter {
            title: Some(title.clone()),
            slug: Some(slug.clone()),
            source: Some(route.url.clone()),
            page_type: Some(page_type.clone()),
            ..Default::default()
        };

        let path = self.output.pages_dir().join(format!("{}.md", slug));
        std::fs::write(&path, frontmatter::encode(&fields, &body))?;

        Ok(PagesIndexEntry {
            slug,
            title,
            page_type,
            source: route.url.clone(),
        })
    }

    /// Title and markdown body of a fetched page
    fn read_page(&self, html: &str, fallback_title: &str) -> (String, String) {
        let document = Html::parse_document(html);

        let title = first_text(&document, "title")
            .or_else(|| meta_content(&document, "og:title"))
            .or_else(|| first_text(&document, "main h1"))
            .or_else(|| first_text(&document, "h1"))
            .unwrap_or_else(|| fallback_title.to_string());

        let content = extract_content(&document, &ContentProfile::PAGES);
        (title, self.converter.body_for(&content))
    }
}

/// Runs the pages importer for a configuration
pub async fn run_pages_import(config: &Config) -> Result<ImportReport, HarvestError> {
    PagesImporter::new(config)?.run().await
}
