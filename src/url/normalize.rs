use crate::UrlError;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// File extensions that never serve a crawlable page
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "svg", "ico", "avif", "css", "js", "woff", "woff2",
    "ttf", "otf", "eot", "pdf",
];

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").expect("valid regex"));

/// Canonicalizes URLs against one configured site origin
///
/// The canonical form is `origin + normalized path` with no query or
/// fragment. It is the key used by every set and map in the crawler and the
/// importers.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    origin_url: Url,
    origin: String,
}

impl UrlNormalizer {
    /// Creates a normalizer bound to `origin` (e.g. `https://example.com`)
    pub fn new(origin: &str) -> Result<Self, UrlError> {
        let origin_url = Url::parse(origin).map_err(|e| UrlError::Parse(e.to_string()))?;
        if origin_url.scheme() != "http" && origin_url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(origin_url.scheme().to_string()));
        }
        let origin = origin_url.origin().ascii_serialization();
        Ok(Self { origin_url, origin })
    }

    /// The serialized origin, without a trailing slash
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Normalizes a URL relative to the site origin
    pub fn normalize(&self, input: &str) -> Result<String, UrlError> {
        self.normalize_with_base(input, &self.origin_url)
    }

    /// Normalizes a possibly-relative URL resolved against `base`
    ///
    /// # Normalization Steps
    ///
    /// 1. Resolve against the base; reject if malformed
    /// 2. Reject anything that is not http or https
    /// 3. Reject anything outside the configured origin
    /// 4. Drop fragment and query
    /// 5. Normalize the path: leading slash, repeated slashes collapsed,
    ///    single trailing slash removed (root stays `/`)
    /// 6. Reject static asset extensions
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::url::UrlNormalizer;
    ///
    /// let normalizer = UrlNormalizer::new("https://site.test").unwrap();
    /// assert_eq!(
    ///     normalizer.normalize("https://site.test/a//b/?q=1#top").unwrap(),
    ///     "https://site.test/a/b"
    /// );
    /// assert!(normalizer.normalize("/logo.png").is_err());
    /// ```
    pub fn normalize_with_base(&self, input: &str, base: &Url) -> Result<String, UrlError> {
        let resolved = base
            .join(input.trim())
            .map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            return Err(UrlError::InvalidScheme(resolved.scheme().to_string()));
        }

        if resolved.origin().ascii_serialization() != self.origin {
            return Err(UrlError::CrossOrigin(resolved.to_string()));
        }

        let path = normalize_pathname(resolved.path());
        if is_static_asset(&path) {
            return Err(UrlError::StaticAsset(path));
        }

        Ok(format!("{}{}", self.origin, path))
    }

    /// Normalizes a URL resolved against another canonical URL string
    pub fn normalize_relative(&self, input: &str, base: &str) -> Result<String, UrlError> {
        let base = Url::parse(base).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;
        self.normalize_with_base(input, &base)
    }

    /// Returns the path half of a canonical URL produced by this normalizer
    pub fn pathname<'a>(&self, canonical: &'a str) -> &'a str {
        match canonical.strip_prefix(self.origin.as_str()) {
            Some(path) if path.starts_with('/') => path,
            _ => "/",
        }
    }
}

/// Normalizes a URL path
///
/// Ensures a leading slash, collapses repeated slashes and strips a single
/// trailing slash. The root path is always `/`, never empty.
pub fn normalize_pathname(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    normalized = REPEATED_SLASHES.replace_all(&normalized, "/").into_owned();

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Checks whether the path ends in a known static-asset extension
pub fn is_static_asset(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ASSET_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
