use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static BLOG_POST_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/blog/[^/]+$").expect("valid regex"));

/// Semantic type of a crawled route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteType {
    /// The site root
    Home,
    /// `/blog`
    BlogIndex,
    /// `/blog/<slug>`
    BlogPost,
    /// Any other content page
    Page,
    /// The configured assessment path
    Assessment,
}

impl RouteType {
    /// The wire name, as written to manifests and front-matter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::BlogIndex => "blogIndex",
            Self::BlogPost => "blogPost",
            Self::Page => "page",
            Self::Assessment => "assessment",
        }
    }

    /// Returns true if routes of this type are imported as standalone pages
    pub fn is_page_like(&self) -> bool {
        matches!(self, Self::Home | Self::Page | Self::Assessment)
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks whether a normalized path has the `/blog/<single-segment>` shape
pub fn is_blog_post_path(path: &str) -> bool {
    BLOG_POST_PATH.is_match(path)
}

/// Maps normalized paths to route types
///
/// Rules are checked in order; the first match wins and `Page` is the
/// default, so every path maps to exactly one type.
#[derive(Debug, Clone, Default)]
pub struct RouteClassifier {
    assessment_path: Option<String>,
}

impl RouteClassifier {
    pub fn new(assessment_path: Option<String>) -> Self {
        Self { assessment_path }
    }

    /// Classifies a normalized path
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::url::{RouteClassifier, RouteType};
    ///
    /// let classifier = RouteClassifier::new(None);
    /// assert_eq!(classifier.classify("/"), RouteType::Home);
    /// assert_eq!(classifier.classify("/blog/my-post"), RouteType::BlogPost);
    /// assert_eq!(classifier.classify("/blog/a/b"), RouteType::Page);
    /// ```
    pub fn classify(&self, path: &str) -> RouteType {
        if path == "/" {
            return RouteType::Home;
        }
        if path == "/blog" {
            return RouteType::BlogIndex;
        }
        if is_blog_post_path(path) {
            return RouteType::BlogPost;
        }
        if self.assessment_path.as_deref() == Some(path) {
            return RouteType::Assessment;
        }
        RouteType::Page
    }
}
