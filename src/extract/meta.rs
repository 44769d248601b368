//! Page metadata lookups and text helpers

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::{Html, Selector};

/// Maximum number of characters in an excerpt, before the ellipsis
pub const EXCERPT_LENGTH: usize = 200;

/// Collapses every whitespace run to one space and trims the ends
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds an excerpt from plain text
///
/// Text longer than `max_chars` is cut at that many characters, trailing
/// whitespace is dropped and `...` appended.
///
/// ```
/// use site_harvest::extract::excerpt_from_text;
///
/// assert_eq!(excerpt_from_text("  short   text ", 200), "short text");
/// assert_eq!(excerpt_from_text("one two three", 4), "one...");
/// ```
pub fn excerpt_from_text(input: &str, max_chars: usize) -> String {
    let clean = collapse_whitespace(input);
    if clean.chars().count() <= max_chars {
        return clean;
    }

    let cut: String = clean.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Collapsed text of the first element matching `selector`, if non-empty
pub fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text = collapse_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Collapsed value of `attr` on the first element matching `selector`
pub fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let value = document.select(&selector).next()?.value().attr(attr)?;
    let value = collapse_whitespace(value);
    (!value.is_empty()).then_some(value)
}

/// Content of the first `<meta property="...">` tag with the given property
pub fn meta_content(document: &Html, property: &str) -> Option<String> {
    first_attr(document, &format!(r#"meta[property="{}"]"#, property), "content")
}

/// Parses a date as published by feeds and page markup
///
/// Accepts RFC 3339, RFC 2822 and bare `YYYY-MM-DD` dates. Timestamps
/// without an offset are read as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
