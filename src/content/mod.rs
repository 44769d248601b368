//! Document identity, encoding and read-back
//!
//! This module handles:
//! - Slug derivation and per-run collision handling
//! - The front-matter codec used for every imported document
//! - The read interface over an imported content directory

pub mod frontmatter;
mod reader;
mod slug;

pub use frontmatter::{Document, FrontMatter};
pub use reader::{excerpt_from_markdown, BlogPost, ContentLibrary, ImportedPage};
pub use slug::{is_valid_slug, slug_from_pathname, slug_from_url, slugify, SlugAllocator};
