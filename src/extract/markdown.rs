//! HTML to markdown conversion

use crate::extract::ExtractedContent;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;

/// Converts content regions to markdown bodies
pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl MarkdownConverter {
    /// Builds a converter emitting ATX headings and fenced code blocks
    pub fn new() -> Self {
        let inner = HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .skip_tags(vec!["script", "style", "noscript"])
            .build();

        Self { inner }
    }

    /// Converts an HTML fragment, returning `None` when nothing survives
    pub fn convert(&self, html: &str) -> Option<String> {
        match self.inner.convert(html) {
            Ok(markdown) => {
                let markdown = markdown.trim();
                (!markdown.is_empty()).then(|| markdown.to_string())
            }
            Err(e) => {
                tracing::debug!("Markdown conversion failed: {}", e);
                None
            }
        }
    }

    /// Markdown body for an extracted region
    ///
    /// Falls back to the region's plain text when conversion yields nothing.
    pub fn body_for(&self, content: &ExtractedContent) -> String {
        self.convert(&content.html)
            .unwrap_or_else(|| content.text.clone())
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}
