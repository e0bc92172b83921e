//! Grid clustering for nearby markers.

use std::collections::BTreeMap;

use crate::config::CLUSTER_CELL_DEG;

use super::Marker;

/// A group of markers that render as one aggregated point.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Centroid latitude of the member markers.
    pub latitude: f64,
    /// Centroid longitude of the member markers.
    pub longitude: f64,
    /// Member markers, in dataset order.
    pub markers: Vec<Marker>,
}

impl Cluster {
    /// Number of member markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the cluster has no members (never produced by `cluster`).
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Groups markers into fixed-size grid cells and aggregates each cell into a
/// cluster at the members' centroid.
///
/// Keyed by a `BTreeMap` so the output order is deterministic regardless of
/// input order, which keeps fingerprint-equal datasets rendering identically.
pub fn cluster(markers: Vec<Marker>) -> Vec<Cluster> {
    let mut cells: BTreeMap<(i64, i64), Vec<Marker>> = BTreeMap::new();
    for marker in markers {
        let cell = (
            (marker.latitude / CLUSTER_CELL_DEG).floor() as i64,
            (marker.longitude / CLUSTER_CELL_DEG).floor() as i64,
        );
        cells.entry(cell).or_default().push(marker);
    }

    cells
        .into_values()
        .map(|markers| {
            let n = markers.len() as f64;
            let latitude = markers.iter().map(|m| m.latitude).sum::<f64>() / n;
            let longitude = markers.iter().map(|m| m.longitude).sum::<f64>() / n;
            Cluster {
                latitude,
                longitude,
                markers,
            }
        })
        .collect()
}
