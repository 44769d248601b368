//! Front-matter codec for imported documents
//!
//! A document is a block of `key: "value"` lines fenced by `---`, a blank
//! line, then the markdown body. Only the fields of [`FrontMatter`] are
//! written or read back; other keys are ignored.

use once_cell::sync::Lazy;
use regex::Regex;

const DELIMITER: &str = "---";

static FIELD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_-]+):\s*(.*)$").expect("valid regex"));

/// Known metadata fields, written in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub slug: Option<String>,
    pub source: Option<String>,
    pub excerpt: Option<String>,
    pub page_type: Option<String>,
}

impl FrontMatter {
    fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("title", self.title.as_deref()),
            ("date", self.date.as_deref()),
            ("slug", self.slug.as_deref()),
            ("source", self.source.as_deref()),
            ("excerpt", self.excerpt.as_deref()),
            ("type", self.page_type.as_deref()),
        ]
    }

    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "title" => &mut self.title,
            "date" => &mut self.date,
            "slug" => &mut self.slug,
            "source" => &mut self.source,
            "excerpt" => &mut self.excerpt,
            "type" => &mut self.page_type,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

/// A parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub front_matter: FrontMatter,
    /// Markdown body, trimmed
    pub body: String,
}

/// Quotes a value for a front-matter line
///
/// Backslashes and double quotes are escaped, line breaks become spaces
/// and the result is trimmed inside the quotes.
///
/// Because of the trim and the line-break folding, only single-line values
/// without surrounding whitespace survive [`parse`] unchanged. The importers
/// only write whitespace-collapsed text.
pub fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", " ")
        .replace('\n', " ");
    format!("\"{}\"", escaped.trim())
}

/// Strips one layer of matching quotes from a raw value
///
/// Escapes written by [`quote`] are undone inside double quotes.
pub fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() < 2 {
        return raw.to_string();
    }

    if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return unescape(inner);
    }
    if let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        return inner.to_string();
    }
    raw.to_string()
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '"')) => out.push(next),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Serializes metadata and a markdown body into a document
pub fn encode(front_matter: &FrontMatter, body: &str) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');

    for (key, value) in front_matter.fields() {
        if let Some(value) = value {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(&quote(value));
            out.push('\n');
        }
    }

    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body);
    out.push('\n');
    out
}

/// Parses a document back into metadata and body
///
/// Input without an opening delimiter line is all body. Lines that are
/// not `key: value` are skipped. Without a closing delimiter the fields
/// read so far are kept and the whole input is the body.
pub fn parse(input: &str) -> Document {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = input.lines();

    match lines.next() {
        Some(first) if input.starts_with(DELIMITER) && first.trim() == DELIMITER => {}
        _ => {
            return Document {
                front_matter: FrontMatter::default(),
                body: input.trim().to_string(),
            }
        }
    }

    let mut front_matter = FrontMatter::default();
    let mut closed = false;

    for line in lines.by_ref() {
        if line.trim() == DELIMITER {
            closed = true;
            break;
        }
        if let Some(caps) = FIELD_LINE.captures(line) {
            front_matter.set(&caps[1], unquote(&caps[2]));
        }
    }

    let body = if closed {
        lines.collect::<Vec<_>>().join("\n").trim().to_string()
    } else {
        input.trim().to_string()
    };

    Document { front_matter, body }
}
