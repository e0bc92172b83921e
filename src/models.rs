//! Core data model: geocoding candidates, persisted entries, and the dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unconfirmed location match returned by a geocoding provider.
///
/// Candidates are ephemeral: they live for one query-response cycle and are
/// discarded when the query changes or a candidate is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCandidate {
    /// Provider-formatted place name (e.g. "Austin, Texas, USA").
    pub display_name: String,
    /// Latitude in degrees, -90..=90.
    pub latitude: f64,
    /// Longitude in degrees, -180..=180.
    pub longitude: f64,
    /// Country name; empty when the provider did not return one.
    pub country: String,
}

impl LocationCandidate {
    /// Whether the candidate's coordinates are finite and within valid
    /// geographic ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        coordinates_in_range(self.latitude, self.longitude)
    }
}

/// A confirmed, persisted submission.
///
/// Entries are immutable after creation; there is no update or delete path.
/// Field order is the canonical CSV column order and must not change, so the
/// backing file stays readable by external consumers and archived snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique id, generated once at creation (UUID v4).
    pub id: String,
    /// Contributor name, or the "Anonymous" sentinel.
    pub username: String,
    /// Display name of the confirmed location.
    pub city: String,
    /// Country name; may be empty.
    pub country: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Derived continent; empty placeholder when unknown.
    pub continent: String,
    /// Derived UN region; empty placeholder when unknown.
    pub un_region: String,
    /// Creation timestamp (UTC), immutable.
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Whether the entry's coordinates are finite and within valid ranges.
    ///
    /// Out-of-range rows are filtered at read/render boundaries rather than
    /// rejected outright: the backing file can be edited externally, and a
    /// bad row must never block rendering the rest.
    pub fn has_valid_coordinates(&self) -> bool {
        coordinates_in_range(self.latitude, self.longitude)
    }
}

/// Returns true when `latitude`/`longitude` are finite and inside the valid
/// geographic ranges (-90..=90 / -180..=180).
pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Content fingerprint of a dataset: row count plus a coordinate checksum.
///
/// Used as the render-cache key. Any append changes the row count; any
/// coordinate edit changes the checksum. Comparing fingerprints is how the
/// map layer decides whether a cached view is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetFingerprint {
    /// Number of rows in the dataset.
    pub rows: usize,
    /// Wrapping sum of all coordinates scaled to micro-degrees.
    pub coord_checksum: i64,
}

/// The ordered collection of all entries.
///
/// Insertion order is preserved incidentally but carries no semantics. There
/// is no secondary index; every read loads the full set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDataset {
    entries: Vec<Entry>,
}

impl EntryDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing list of entries.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Number of entries, including rows with invalid coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Appends an entry, preserving insertion order.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Entries whose coordinates are finite and in range.
    pub fn valid_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.has_valid_coordinates())
    }

    /// Entry counts grouped by continent, largest groups first (ties broken
    /// alphabetically). Rows with no derived continent group as "Unknown".
    pub fn continent_counts(&self) -> Vec<(String, usize)> {
        Self::tally(self.entries.iter().map(|e| e.continent.as_str()))
    }

    /// Entry counts grouped by country, largest groups first (ties broken
    /// alphabetically). Rows without a country group as "Unknown".
    pub fn country_counts(&self) -> Vec<(String, usize)> {
        Self::tally(self.entries.iter().map(|e| e.country.as_str()))
    }

    fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for key in keys {
            let key = if key.is_empty() { "Unknown" } else { key };
            *counts.entry(key).or_default() += 1;
        }
        let mut groups: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        groups
    }

    /// Computes the content fingerprint over all rows.
    ///
    /// Non-finite coordinates contribute zero so that a coerced-to-NaN row
    /// still participates in the row count without poisoning the checksum.
    pub fn fingerprint(&self) -> DatasetFingerprint {
        let mut checksum: i64 = 0;
        for entry in &self.entries {
            for coord in [entry.latitude, entry.longitude] {
                if coord.is_finite() {
                    checksum = checksum.wrapping_add((coord * 1_000_000.0).round() as i64);
                }
            }
        }
        DatasetFingerprint {
            rows: self.entries.len(),
            coord_checksum: checksum,
        }
    }
}
