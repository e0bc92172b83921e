//! Map materialization.
//!
//! Turns the dataset into a renderable view: one marker per entry with valid
//! coordinates, grid-clustered, inside a fitted viewport. An empty (or
//! all-invalid) dataset falls back to a default world view instead of
//! failing. [`MapRenderer`] caches the last view keyed by the dataset's
//! content fingerprint, so redraws over unchanged data skip the rebuild.

mod bounds;
mod cluster;

pub use bounds::Bounds;
pub use cluster::{cluster, Cluster};

use crate::config::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM};
use crate::models::{DatasetFingerprint, Entry, EntryDataset};

/// One renderable map point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Popup label, e.g. "Bo - Austin, Texas, USA".
    pub label: String,
}

impl Marker {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            latitude: entry.latitude,
            longitude: entry.longitude,
            label: label(entry),
        }
    }
}

/// Popup label for an entry: contributor plus place, with the derived region
/// appended when known.
fn label(entry: &Entry) -> String {
    let mut label = format!("{} - {}", entry.username, entry.city);
    if !entry.un_region.is_empty() {
        label.push_str(&format!(" [{}]", entry.un_region));
    }
    label
}

/// A fully materialized map: clusters plus viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Clustered markers, in deterministic cell order.
    pub clusters: Vec<Cluster>,
    /// Fitted bounds, `None` when the default world view is in effect.
    pub bounds: Option<Bounds>,
    /// Viewport center.
    pub center: (f64, f64),
    /// Viewport zoom level.
    pub zoom: u8,
}

impl MapView {
    /// Total marker count across all clusters.
    pub fn marker_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// Builds the view for `dataset`.
///
/// Rows with non-finite or out-of-range coordinates are skipped, never
/// fatal: a hand-edited row with latitude 200 drops out silently and the
/// rest of the dataset still renders.
pub fn render(dataset: &EntryDataset) -> MapView {
    let markers: Vec<Marker> = dataset.valid_entries().map(Marker::from_entry).collect();
    let points: Vec<(f64, f64)> = markers.iter().map(|m| (m.latitude, m.longitude)).collect();

    match Bounds::fit(&points) {
        Some(bounds) => MapView {
            clusters: cluster(markers),
            center: bounds.center(),
            zoom: bounds.zoom(),
            bounds: Some(bounds),
        },
        None => MapView {
            clusters: Vec::new(),
            bounds: None,
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
        },
    }
}

/// Fingerprint-keyed render cache.
///
/// Holds the last rendered view together with the fingerprint of the dataset
/// it came from. A render request with a matching fingerprint returns the
/// cached view; any content change (append, coordinate edit) misses and
/// rebuilds.
#[derive(Default)]
pub struct MapRenderer {
    cached: Option<(DatasetFingerprint, MapView)>,
}

impl MapRenderer {
    /// Creates a renderer with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `dataset`, reusing the cached view when the fingerprint is
    /// unchanged.
    pub fn render(&mut self, dataset: &EntryDataset) -> &MapView {
        let fingerprint = dataset.fingerprint();
        if !matches!(&self.cached, Some((cached, _)) if *cached == fingerprint) {
            log::debug!(
                "Rebuilding map view for {} rows (checksum {})",
                fingerprint.rows,
                fingerprint.coord_checksum
            );
            self.cached = None;
        }
        let (_, view) = self
            .cached
            .get_or_insert_with(|| (fingerprint, render(dataset)));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(username: &str, lat: f64, lon: f64) -> Entry {
        Entry {
            id: "x".to_string(),
            username: username.to_string(),
            city: "Austin, Texas, USA".to_string(),
            country: "USA".to_string(),
            latitude: lat,
            longitude: lon,
            continent: "America".to_string(),
            un_region: "Northern America".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_dataset_renders_default_world_view() {
        let view = render(&EntryDataset::new());
        assert!(view.clusters.is_empty());
        assert!(view.bounds.is_none());
        assert_eq!(view.center, (20.0, 0.0));
        assert_eq!(view.zoom, 2);
    }

    #[test]
    fn test_invalid_rows_are_skipped_not_fatal() {
        let dataset = EntryDataset::from_entries(vec![
            entry("Bo", 30.27, -97.74),
            entry("Broken", 200.0, 0.0),
            entry("AlsoBroken", f64::NAN, 10.0),
        ]);
        let view = render(&dataset);
        assert_eq!(view.marker_count(), 1);
        assert!(view.bounds.is_some());
    }

    #[test]
    fn test_all_invalid_falls_back_to_world_view() {
        let dataset = EntryDataset::from_entries(vec![entry("Broken", 200.0, 0.0)]);
        let view = render(&dataset);
        assert!(view.bounds.is_none());
        assert_eq!(view.center, (20.0, 0.0));
    }

    #[test]
    fn test_marker_label_names_contributor_and_place() {
        let dataset = EntryDataset::from_entries(vec![entry("Bo", 30.27, -97.74)]);
        let view = render(&dataset);
        let marker = &view.clusters[0].markers[0];
        assert_eq!(marker.label, "Bo - Austin, Texas, USA [Northern America]");
    }

    #[test]
    fn test_renderer_cache_hit_on_unchanged_fingerprint() {
        let dataset = EntryDataset::from_entries(vec![entry("Bo", 30.27, -97.74)]);
        let mut renderer = MapRenderer::new();

        let first = renderer.render(&dataset).clone();
        let second = renderer.render(&dataset).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_renderer_rebuilds_on_content_change() {
        let mut dataset = EntryDataset::from_entries(vec![entry("Bo", 30.27, -97.74)]);
        let mut renderer = MapRenderer::new();
        assert_eq!(renderer.render(&dataset).marker_count(), 1);

        dataset.push(entry("Alice", 48.85, 2.35));
        assert_eq!(renderer.render(&dataset).marker_count(), 2);
    }
}
