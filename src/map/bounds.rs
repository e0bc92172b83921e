//! Viewport fitting.

use crate::config::{BOUNDS_PADDING_DEG, DEFAULT_MAP_ZOOM};

/// A geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Southern edge latitude.
    pub south: f64,
    /// Western edge longitude.
    pub west: f64,
    /// Northern edge latitude.
    pub north: f64,
    /// Eastern edge longitude.
    pub east: f64,
}

impl Bounds {
    /// Fits a padded box around `points`, or `None` for an empty slice.
    ///
    /// The padding keeps edge markers away from the viewport border and is
    /// clamped so the box never leaves the valid coordinate ranges.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let (mut south, mut west, mut north, mut east) =
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(lat, lon) in points {
            south = south.min(lat);
            north = north.max(lat);
            west = west.min(lon);
            east = east.max(lon);
        }
        if !south.is_finite() {
            return None;
        }
        Some(Self {
            south: (south - BOUNDS_PADDING_DEG).max(-90.0),
            west: (west - BOUNDS_PADDING_DEG).max(-180.0),
            north: (north + BOUNDS_PADDING_DEG).min(90.0),
            east: (east + BOUNDS_PADDING_DEG).min(180.0),
        })
    }

    /// The box's center point.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Zoom level that roughly fits the box: wider spans zoom further out.
    pub fn zoom(&self) -> u8 {
        let span = (self.north - self.south).max(self.east - self.west);
        match span {
            s if s > 90.0 => DEFAULT_MAP_ZOOM,
            s if s > 45.0 => 3,
            s if s > 20.0 => 4,
            s if s > 10.0 => 5,
            s if s > 5.0 => 6,
            s if s > 2.5 => 7,
            _ => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_empty_is_none() {
        assert!(Bounds::fit(&[]).is_none());
    }

    #[test]
    fn test_fit_single_point_pads_around_it() {
        let bounds = Bounds::fit(&[(30.27, -97.74)]).unwrap();
        assert_eq!(bounds.south, 29.27);
        assert_eq!(bounds.north, 31.27);
        assert_eq!(bounds.west, -98.74);
        assert_eq!(bounds.east, -96.74);
        assert_eq!(bounds.center(), (30.27, -97.74));
    }

    #[test]
    fn test_fit_clamps_to_valid_ranges() {
        let bounds = Bounds::fit(&[(89.5, 179.5), (-89.5, -179.5)]).unwrap();
        assert_eq!(bounds.north, 90.0);
        assert_eq!(bounds.south, -90.0);
        assert_eq!(bounds.east, 180.0);
        assert_eq!(bounds.west, -180.0);
    }

    #[test]
    fn test_zoom_scales_with_span() {
        let world = Bounds::fit(&[(60.0, -120.0), (-40.0, 150.0)]).unwrap();
        assert_eq!(world.zoom(), DEFAULT_MAP_ZOOM);

        let city = Bounds::fit(&[(30.27, -97.74)]).unwrap();
        assert!(city.zoom() > world.zoom());
    }
}
