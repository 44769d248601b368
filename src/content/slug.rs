//! Filesystem-safe document identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

static OUTSIDE_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]+").expect("valid regex"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid regex"));
static VALID_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// Turns a candidate string into a slug
///
/// The candidate is percent-decoded and lower-cased, every run of
/// characters outside `[a-z0-9-]` becomes one hyphen, and hyphens are
/// trimmed from the ends. An empty result yields `fallback`.
///
/// ```
/// use site_harvest::content::slugify;
///
/// assert_eq!(slugify("Caf%C3%A9 Hours!", "post"), "caf-hours");
/// assert_eq!(slugify("%%%", "post"), "post");
/// ```
pub fn slugify(candidate: &str, fallback: &str) -> String {
    let decoded = percent_decode(candidate).to_lowercase();
    let replaced = OUTSIDE_SLUG_CHARS.replace_all(&decoded, "-");
    let slug = replaced.trim_matches('-');

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// Slug for a blog post, from the last segment of its URL path
pub fn slug_from_url(url: &str, fallback: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return fallback.to_string();
    };

    match parsed.path().split('/').filter(|s| !s.is_empty()).last() {
        Some(segment) => slugify(segment, fallback),
        None => fallback.to_string(),
    }
}

/// Slug for a site page, from its whole normalized path
///
/// `/` becomes `home`; path separators and `+` become hyphens.
///
/// ```
/// use site_harvest::content::slug_from_pathname;
///
/// assert_eq!(slug_from_pathname("/"), "home");
/// assert_eq!(slug_from_pathname("/services/personal-training"), "services-personal-training");
/// ```
pub fn slug_from_pathname(pathname: &str) -> String {
    let pathname = if pathname == "/" { "/home" } else { pathname };
    let decoded = percent_decode(pathname);
    let flattened = decoded
        .strip_prefix('/')
        .unwrap_or(decoded.as_ref())
        .replace(['/', '+'], "-");

    let slug = slugify(&flattened, "page");
    HYPHEN_RUNS.replace_all(&slug, "-").into_owned()
}

/// Checks a slug against `^[a-z0-9-]+$`
pub fn is_valid_slug(slug: &str) -> bool {
    VALID_SLUG.is_match(slug)
}

fn percent_decode(input: &str) -> Cow<'_, str> {
    urlencoding::decode(input).unwrap_or(Cow::Borrowed(input))
}

/// Hands out slugs that are unique within one import run
///
/// Collisions get `-2`, `-3`, ... suffixes in first-come order.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base` or the first free suffixed form, and reserves it
    pub fn allocate(&mut self, base: &str) -> String {
        let mut slug = base.to_string();
        let mut n = 2;
        while self.used.contains(&slug) {
            slug = format!("{}-{}", base, n);
            n += 1;
        }
        self.used.insert(slug.clone());
        slug
    }

    pub fn is_used(&self, slug: &str) -> bool {
        self.used.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
