use crate::output::{iso8601, read_json};
use crate::url::RouteType;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// One canonical URL confirmed to serve HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub url: String,
    pub pathname: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
}

/// Every HTML route found by one crawl, sorted by pathname
///
/// Regenerated wholesale on each crawl and never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteManifest {
    pub origin: String,
    #[serde(rename = "discoveredAtISO", with = "iso8601")]
    pub discovered_at: DateTime<Utc>,
    #[serde(deserialize_with = "known_routes")]
    pub routes: Vec<Route>,
}

/// Reads the route list, skipping entries that do not parse as a [`Route`]
///
/// One route with an unknown `type` must not hide the others.
fn known_routes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Route>, D::Error> {
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Route>(value.clone()) {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::warn!("Skipping manifest route {} ({})", value, e);
                None
            }
        })
        .collect())
}

impl RouteManifest {
    /// Builds a manifest stamped with the current time
    ///
    /// Routes are sorted by pathname here, independent of fetch order.
    pub fn new(origin: &str, mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| a.pathname.cmp(&b.pathname));
        Self {
            origin: origin.to_string(),
            discovered_at: Utc::now(),
            routes,
        }
    }

    /// Loads a manifest written by a previous crawl
    pub fn load(path: &Path) -> Result<Self, HarvestError> {
        if !path.exists() {
            return Err(HarvestError::ManifestMissing {
                path: path.to_path_buf(),
            });
        }
        read_json(path)
    }
}
