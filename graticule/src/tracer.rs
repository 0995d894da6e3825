//! Grid line tracing.
//!
//! For one axis tick value this module produces the pixel path of the
//! corresponding latitude or longitude line. In straight mode a line is a
//! single projected chord; in curved mode the tracer walks the other
//! coordinate at a configured geographic increment and projects every
//! sample, so the rendered polyline follows the host map's actual
//! projection.

use serde::{Deserialize, Serialize};

use crate::bounds::ViewportBounds;
use crate::geo::{LatLng, ScreenPoint};
use crate::host::HostMap;

/// Pixel inset applied to straight chord endpoints so strokes stay inside
/// the surface edge.
const CHORD_INSET: f64 = 1.0;

/// How a grid line is traced along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveMode {
    /// One straight chord between the two projected endpoints.
    #[default]
    Straight,
    /// A stepped polyline sampled every `step` degrees along the line.
    Sampled(f64),
}

impl CurveMode {
    /// The sampling step, when curved tracing is active.
    pub fn step(&self) -> Option<f64> {
        match self {
            CurveMode::Straight => None,
            CurveMode::Sampled(step) => Some(*step),
        }
    }

    /// Whether this mode samples intermediate points.
    pub fn is_curved(&self) -> bool {
        matches!(self, CurveMode::Sampled(_))
    }
}

/// Generate the tick values of one axis covering `[lower, upper]`.
///
/// Ticks are whole multiples of `interval`, produced by two walks from the
/// origin value: upward starting at `interval`, then downward starting at
/// `0`, so zero appears exactly once. A non-positive or non-finite
/// interval yields no ticks.
pub fn ticks(lower: f64, upper: f64, interval: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if interval <= 0.0 || !interval.is_finite() || lower > upper {
        return out;
    }

    let mut value = interval;
    while value <= upper {
        if value >= lower {
            out.push(value);
        }
        value += interval;
    }

    let mut value = 0.0;
    while value >= lower {
        if value <= upper {
            out.push(value);
        }
        value -= interval;
    }

    out
}

/// Trace the pixel path of one parallel (constant-latitude line).
///
/// In curved mode the walk range widens when the projected west endpoint
/// lies inside the viewport: the left viewport edge is reprojected to a
/// longitude and the walk starts one padding increment further out, so
/// partially-visible curved lines are not clipped prematurely. The east
/// side widens symmetrically, re-applying the antimeridian unfold when the
/// widened range straddles ±180°.
pub fn trace_parallel<M: HostMap + ?Sized>(
    map: &M,
    lat: f64,
    bounds: &ViewportBounds,
    mode: CurveMode,
) -> Vec<ScreenPoint> {
    let start = map.lat_lng_to_container_point(LatLng::new(lat, bounds.west));

    let Some(step) = mode.step() else {
        let end = map.lat_lng_to_container_point(LatLng::new(lat, bounds.east));
        return vec![
            ScreenPoint::new(start.x + CHORD_INSET, start.y),
            ScreenPoint::new(end.x - CHORD_INSET, end.y),
        ];
    };

    let width = map.size().width_f64();
    let mut lng_from = bounds.west;
    let mut lng_to = bounds.east;
    let mut first = start;

    if first.x > 0.0 {
        let edge = map.container_point_to_lat_lng(ScreenPoint::new(0.0, first.y));
        lng_from = edge.lng - bounds.lng_pad;
        first.x = 0.0;
    }
    let east_point = map.lat_lng_to_container_point(LatLng::new(lat, lng_to));
    if east_point.x < width {
        let edge = map.container_point_to_lat_lng(ScreenPoint::new(width, east_point.y));
        lng_to = edge.lng + bounds.lng_pad;
        if lng_from > 0.0 && lng_to < 0.0 {
            lng_to += 360.0;
        }
    }

    let mut points = vec![first];
    let mut lng = lng_from;
    while lng <= lng_to {
        points.push(map.lat_lng_to_container_point(LatLng::new(lat, lng)));
        lng += step;
    }
    points
}

/// Trace the pixel path of one meridian (constant-longitude line).
///
/// `lat_mode` is the curve mode of the *other* axis: when parallels are
/// curved, a straight meridian clamps its endpoints to the reprojected
/// top/bottom viewport edges (±90-clamped) so it meets the curved
/// parallels instead of overshooting them.
pub fn trace_meridian<M: HostMap + ?Sized>(
    map: &M,
    lng: f64,
    bounds: &ViewportBounds,
    mode: CurveMode,
    lat_mode: CurveMode,
) -> Vec<ScreenPoint> {
    let bottom = map.lat_lng_to_container_point(LatLng::new(bounds.south, lng));

    let Some(step) = mode.step() else {
        let height = map.size().height_f64();
        let mut top = map.lat_lng_to_container_point(LatLng::new(bounds.north, lng));
        let mut bottom = bottom;
        if lat_mode.is_curved() {
            let top_lat = map
                .container_point_to_lat_lng(ScreenPoint::new(top.x, 0.0))
                .lat
                .min(90.0);
            top = map.lat_lng_to_container_point(LatLng::new(top_lat, lng));
            let bottom_lat = map
                .container_point_to_lat_lng(ScreenPoint::new(bottom.x, height))
                .lat
                .max(-90.0);
            bottom = map.lat_lng_to_container_point(LatLng::new(bottom_lat, lng));
        }
        return vec![
            ScreenPoint::new(top.x, top.y + CHORD_INSET),
            ScreenPoint::new(bottom.x, bottom.y - CHORD_INSET),
        ];
    };

    let mut points = vec![bottom];
    let mut lat = bounds.south + step;
    while lat < bounds.north {
        points.push(map.lat_lng_to_container_point(LatLng::new(lat, lng)));
        lat += step;
    }
    points
}
