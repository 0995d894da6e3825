//! Padded geographic viewport bounds.
//!
//! Grid lines that start off-screen must still render their on-screen
//! portion, and edge labels must be detected even when a crossing sits
//! right on the viewport border. Both needs are served by computing a
//! geographic bounding box that over-covers the visible viewport by a
//! padding margin on all four sides.

use crate::geo::ScreenPoint;
use crate::host::HostMap;

/// A padded geographic bounding box of the current viewport.
///
/// `west < east` always holds as a plain numeric interval: when the view
/// straddles the antimeridian, `east` is shifted by +360° so ascending
/// iteration from `west` to `east` visits every visible meridian. Values
/// above 180° therefore denote meridians east of ±180° and are normalized
/// only at display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    /// Southern edge, degrees, padded and clamped to −90.
    pub south: f64,
    /// Northern edge, degrees, padded and clamped to +90.
    pub north: f64,
    /// Western edge, degrees, padded.
    pub west: f64,
    /// Eastern edge, degrees, padded; may exceed 180 after antimeridian
    /// correction.
    pub east: f64,
    /// Latitude padding delta applied to each side, floored at 1°.
    pub lat_pad: f64,
    /// Longitude padding delta applied to each side, floored at 1°.
    pub lng_pad: f64,
}

impl ViewportBounds {
    /// Compute padded bounds from the host map's current viewport.
    ///
    /// `padding_fraction` scales the margin relative to the viewport
    /// extent (`0.2` pads by roughly a fifth of the visible span); the
    /// per-axis delta is floored at 1° so degenerate or zero-sized
    /// viewports still produce a finite, usable box.
    pub fn compute<M: HostMap + ?Sized>(map: &M, padding_fraction: f64) -> Self {
        let size = map.size();
        let width = size.width_f64();
        let height = size.height_f64();

        let top_left = map.container_point_to_lat_lng(ScreenPoint::ZERO);
        let top_right = map.container_point_to_lat_lng(ScreenPoint::new(width, 0.0));
        let bottom_right = map.container_point_to_lat_lng(ScreenPoint::new(width, height));

        let mut south = top_left.lat.min(top_right.lat).min(bottom_right.lat);
        let mut north = top_left.lat.max(top_right.lat).max(bottom_right.lat);
        let mut west = top_left.lng;
        let mut east = top_right.lng;

        // NaN from a zero-height viewport loses against the 1° floor.
        let lat_pad = ((north - south) / (height * padding_fraction)).max(1.0);
        south = (south - lat_pad).max(-90.0);
        north = (north + lat_pad).min(90.0);

        let lng_pad = ((east - west) / (width * padding_fraction)).max(1.0);
        // A wrapping host reports a positive west and a negative east
        // when the view straddles ±180°.
        if west > 0.0 && east < 0.0 {
            east += 360.0;
        }
        west -= lng_pad;
        east += lng_pad;

        Self {
            south,
            north,
            west,
            east,
            lat_pad,
            lng_pad,
        }
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Whether a latitude falls inside the padded box.
    pub fn contains_lat(&self, lat: f64) -> bool {
        self.south <= lat && lat <= self.north
    }

    /// Whether a longitude tick (in the box's unfolded frame) falls inside
    /// the padded box.
    pub fn contains_lng(&self, lng: f64) -> bool {
        self.west <= lng && lng <= self.east
    }
}

impl std::fmt::Display for ViewportBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.3}..{:.3}]°lat × [{:.3}..{:.3}]°lng",
            self.south, self.north, self.west, self.east
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LatLng, SurfaceSize};
    use crate::host::stub::StubMap;

    const PADDING: f64 = 0.2;

    #[test]
    fn test_over_covers_the_visible_viewport() {
        let map = StubMap::new(SurfaceSize::new(800, 600), LatLng::new(46.0, 2.5), 6.0);
        let bounds = ViewportBounds::compute(&map, PADDING);

        let top_left = map.container_point_to_lat_lng(ScreenPoint::ZERO);
        let bottom_right =
            map.container_point_to_lat_lng(ScreenPoint::new(800.0, 600.0));

        assert!(bounds.north > top_left.lat);
        assert!(bounds.south < bottom_right.lat);
        assert!(bounds.west < top_left.lng);
        assert!(bounds.east > bottom_right.lng);
    }

    #[test]
    fn test_padding_delta_floored_at_one_degree() {
        // Zoom 10: the viewport spans well under a degree, so the raw
        // delta is tiny and the floor must kick in.
        let map = StubMap::new(SurfaceSize::new(400, 400), LatLng::new(46.0, 2.5), 10.0);
        let bounds = ViewportBounds::compute(&map, PADDING);
        assert_eq!(bounds.lat_pad, 1.0);
        assert_eq!(bounds.lng_pad, 1.0);
    }

    #[test]
    fn test_antimeridian_straddle_keeps_west_lt_east() {
        let map = StubMap::new(SurfaceSize::new(800, 600), LatLng::new(0.0, 179.0), 5.0);
        let bounds = ViewportBounds::compute(&map, PADDING);
        assert!(
            bounds.west < bounds.east,
            "expected west < east, got {} .. {}",
            bounds.west,
            bounds.east
        );
        // The unfolded east edge sits beyond 180°.
        assert!(bounds.east > 180.0);
    }

    #[test]
    fn test_latitude_clamped_at_poles() {
        let map = StubMap::new(SurfaceSize::new(800, 600), LatLng::new(89.0, 0.0), 3.0);
        let bounds = ViewportBounds::compute(&map, PADDING);
        assert_eq!(bounds.north, 90.0);
        assert!(bounds.south >= -90.0);
    }

    #[test]
    fn test_zero_sized_viewport_stays_finite() {
        let map = StubMap::new(SurfaceSize::new(0, 0), LatLng::new(46.0, 2.5), 6.0);
        let bounds = ViewportBounds::compute(&map, PADDING);
        assert!(bounds.south.is_finite());
        assert!(bounds.north.is_finite());
        assert!(bounds.west.is_finite());
        assert!(bounds.east.is_finite());
        assert!(bounds.west < bounds.east);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_west_always_lt_east(
                lat in -80.0..80.0_f64,
                lng in -180.0..180.0_f64,
                zoom in 3.0..12.0_f64
            ) {
                let map = StubMap::new(
                    SurfaceSize::new(800, 600),
                    LatLng::new(lat, lng),
                    zoom,
                );
                let bounds = ViewportBounds::compute(&map, PADDING);
                prop_assert!(bounds.west < bounds.east);
                prop_assert!(bounds.south < bounds.north);
            }
        }
    }
}
