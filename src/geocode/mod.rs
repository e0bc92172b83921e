//! Geocoding gateway.
//!
//! Resolves a free-text place query against one of two interchangeable
//! providers and returns normalized [`LocationCandidate`]s. Provider failures
//! never propagate as panics or session-terminating errors; the outcome enum
//! keeps "no matches", "not attempted", and "call failed" distinguishable so
//! callers and tests can observe which one happened.

mod locationiq;
mod nominatim;

use serde::Deserialize;
use std::sync::Arc;

use crate::config::{GeocoderKind, MIN_QUERY_LEN};
use crate::error_handling::GeocodeError;
use crate::models::LocationCandidate;

pub use locationiq::LocationIq;
pub use nominatim::Nominatim;

/// Outcome of a single geocoding call.
#[derive(Debug)]
pub enum GeocodeOutcome {
    /// No call was issued: the query was too short or the provider's API key
    /// is absent.
    NotAttempted,
    /// The provider answered but produced no usable candidate.
    NoMatches,
    /// The provider answered with at least one usable candidate.
    Matches(Vec<LocationCandidate>),
    /// All attempts failed (network, HTTP status, or malformed payload).
    Failed(GeocodeError),
}

impl GeocodeOutcome {
    /// The candidates of a `Matches` outcome, or an empty slice.
    pub fn candidates(&self) -> &[LocationCandidate] {
        match self {
            GeocodeOutcome::Matches(candidates) => candidates,
            _ => &[],
        }
    }

    /// Whether this outcome is a failed call (as opposed to an empty result).
    pub fn is_failed(&self) -> bool {
        matches!(self, GeocodeOutcome::Failed(_))
    }
}

/// A geocoding provider selected by configuration.
pub enum Geocoder {
    /// OpenStreetMap Nominatim free-text search.
    Nominatim(Nominatim),
    /// LocationIQ autocomplete-by-prefix.
    Autocomplete(LocationIq),
}

impl Geocoder {
    /// Builds the provider named by `kind` over the shared HTTP client.
    ///
    /// The autocomplete provider reads its API key from the environment at
    /// construction time; a missing key is not an error here, it makes every
    /// later call return [`GeocodeOutcome::NotAttempted`].
    pub fn from_config(kind: GeocoderKind, client: Arc<reqwest::Client>) -> Self {
        match kind {
            GeocoderKind::Nominatim => Geocoder::Nominatim(Nominatim::new(client)),
            GeocoderKind::Autocomplete => Geocoder::Autocomplete(LocationIq::from_env(client)),
        }
    }

    /// Resolves a free-text query to at most `limit` candidates.
    pub async fn resolve(&self, query: &str, limit: usize) -> GeocodeOutcome {
        match self {
            Geocoder::Nominatim(provider) => provider.resolve(query, limit).await,
            Geocoder::Autocomplete(provider) => provider.resolve(query, limit).await,
        }
    }
}

/// Whether the trimmed query is below the minimum length gate.
pub(crate) fn query_below_minimum(query: &str) -> bool {
    query.trim().chars().count() < MIN_QUERY_LEN
}

/// One place object as both providers return it: Nominatim's `jsonv2` search
/// results and LocationIQ's autocomplete results share this subset.
/// Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    display_name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    address: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAddress {
    country: Option<String>,
}

/// Normalizes raw provider places into candidates.
///
/// Malformed places (missing name, unparseable or out-of-range coordinates)
/// are dropped individually rather than failing the whole call. Duplicate
/// display names are removed, keeping the first occurrence: selection later
/// resolves a candidate by exact display-name match, so names within one
/// response must be unique.
pub(crate) fn normalize(places: Vec<RawPlace>, limit: usize) -> Vec<LocationCandidate> {
    let mut candidates: Vec<LocationCandidate> = Vec::new();

    for place in places {
        let Some(display_name) = place.display_name.filter(|n| !n.trim().is_empty()) else {
            log::debug!("Dropping candidate without a display name");
            continue;
        };

        let latitude = place.lat.as_deref().and_then(|v| v.parse::<f64>().ok());
        let longitude = place.lon.as_deref().and_then(|v| v.parse::<f64>().ok());
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            log::debug!("Dropping candidate \"{}\": unparseable coordinates", display_name);
            continue;
        };

        let candidate = LocationCandidate {
            display_name,
            latitude,
            longitude,
            country: place
                .address
                .and_then(|a| a.country)
                .unwrap_or_default(),
        };

        if !candidate.has_valid_coordinates() {
            log::debug!(
                "Dropping candidate \"{}\": coordinates ({}, {}) out of range",
                candidate.display_name,
                candidate.latitude,
                candidate.longitude
            );
            continue;
        }

        if candidates
            .iter()
            .any(|c| c.display_name == candidate.display_name)
        {
            continue;
        }

        candidates.push(candidate);
        if candidates.len() >= limit {
            break;
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: Option<&str>, lat: Option<&str>, lon: Option<&str>, country: Option<&str>) -> RawPlace {
        RawPlace {
            display_name: name.map(String::from),
            lat: lat.map(String::from),
            lon: lon.map(String::from),
            address: country.map(|c| RawAddress {
                country: Some(c.to_string()),
            }),
        }
    }

    #[test]
    fn test_query_below_minimum() {
        assert!(query_below_minimum(""));
        assert!(query_below_minimum("a"));
        assert!(query_below_minimum("  a  "));
        assert!(query_below_minimum("   "));
        assert!(!query_below_minimum("ab"));
        assert!(!query_below_minimum("Austin"));
    }

    #[test]
    fn test_normalize_parses_string_coordinates() {
        let candidates = normalize(
            vec![raw(
                Some("Austin, Texas, USA"),
                Some("30.27"),
                Some("-97.74"),
                Some("USA"),
            )],
            5,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "Austin, Texas, USA");
        assert_eq!(candidates[0].latitude, 30.27);
        assert_eq!(candidates[0].longitude, -97.74);
        assert_eq!(candidates[0].country, "USA");
    }

    #[test]
    fn test_normalize_drops_malformed_candidates() {
        let candidates = normalize(
            vec![
                raw(Some("No coords"), None, None, Some("France")),
                raw(Some("Bad coords"), Some("abc"), Some("2.0"), None),
                raw(None, Some("1.0"), Some("2.0"), None),
                raw(Some("Good"), Some("1.0"), Some("2.0"), None),
            ],
            5,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "Good");
    }

    #[test]
    fn test_normalize_drops_out_of_range_coordinates() {
        let candidates = normalize(
            vec![
                raw(Some("North of north"), Some("95.0"), Some("0.0"), None),
                raw(Some("Too far east"), Some("0.0"), Some("181.0"), None),
            ],
            5,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_normalize_deduplicates_display_names() {
        let candidates = normalize(
            vec![
                raw(Some("Springfield, USA"), Some("39.8"), Some("-89.6"), None),
                raw(Some("Springfield, USA"), Some("37.2"), Some("-93.3"), None),
            ],
            5,
        );
        // First occurrence wins; the tie would otherwise make selection ambiguous
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, 39.8);
    }

    #[test]
    fn test_normalize_respects_limit() {
        let places = (0..10)
            .map(|i| raw(Some(&format!("Place {}", i)), Some("1.0"), Some("2.0"), None))
            .collect();
        let candidates = normalize(places, 3);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_missing_country_becomes_empty_string() {
        let candidates = normalize(vec![raw(Some("Somewhere"), Some("1.0"), Some("2.0"), None)], 5);
        assert_eq!(candidates[0].country, "");
    }
}
