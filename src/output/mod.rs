//! Output module for the persisted pipeline records
//!
//! This module handles:
//! - The route manifest written by the crawler
//! - The blog and pages document indexes written by the importers
//! - Pretty-printed JSON persistence
//! - Run statistics reported at the end of an import

mod index;
mod manifest;
pub mod stats;

pub use index::{sort_by_date_desc, BlogIndex, BlogIndexEntry, PagesIndex, PagesIndexEntry};
pub use manifest::{Route, RouteManifest};
pub use stats::ImportReport;

use crate::HarvestError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Formats a timestamp as ISO-8601 UTC with millisecond precision
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use site_harvest::output::iso_timestamp;
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(iso_timestamp(&dt), "2024-01-02T03:04:05.000Z");
/// ```
pub fn iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp into UTC
pub fn parse_iso_timestamp(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapter writing timestamps the way [`iso_timestamp`] formats them
pub(crate) mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::iso_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp '{}'", raw)))
    }
}

/// Writes a value as pretty-printed JSON with a trailing newline
///
/// Parent directories are created as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut json = serde_json::to_string_pretty(value).map_err(|source| HarvestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    std::fs::write(path, json)?;
    Ok(())
}

/// Reads and deserializes a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, HarvestError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| HarvestError::Json {
        path: path.to_path_buf(),
        source,
    })
}
