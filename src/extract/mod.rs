//! Main-content extraction from fetched pages
//!
//! This module handles:
//! - Picking the primary content region through an ordered selector chain
//! - Page metadata lookups (titles, publication dates, meta tags)
//! - Conversion of the content region to markdown
//! - Plain-text helpers shared by the importers and the reader

mod content;
mod markdown;
mod meta;

pub use content::{evaluate_candidate, extract_content, Candidate, ContentProfile, ExtractedContent};
pub use markdown::MarkdownConverter;
pub use meta::{
    collapse_whitespace, excerpt_from_text, first_attr, first_text, meta_content, parse_date,
    EXCERPT_LENGTH,
};
