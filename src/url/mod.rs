//! URL handling module for Site-Harvest
//!
//! This module provides origin-bound URL normalization and the mapping from
//! normalized paths to semantic route types. Both are pure functions.

mod classify;
mod normalize;

pub use classify::{is_blog_post_path, RouteClassifier, RouteType};
pub use normalize::{is_static_asset, normalize_pathname, UrlNormalizer};
