//! Edge label placement.
//!
//! Labels are painted where grid lines meet the viewport edges. Straight
//! lines get one label at each endpoint, inset so the text stays on the
//! surface. Curved polylines are scanned pairwise for edge crossings: a
//! line that enters and leaves the visible area several times receives a
//! label at every crossing. Placement only reads the traced geometry; it
//! never mutates the polyline.

use crate::geo::{ScreenPoint, SurfaceSize};
use crate::surface::TextMetrics;

/// Vertical pixel offset of the top-edge crossing band for meridian
/// labels, leaving room for the text above the crossing.
const TOP_EDGE_BAND: f64 = 8.0;

/// Pixel gap kept between a label and the surface edge.
const EDGE_GAP: f64 = 2.0;

/// One label to paint at a viewport-edge crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Formatted tick text.
    pub text: String,
    /// Baseline-left position in surface pixels.
    pub position: ScreenPoint,
}

impl EdgeLabel {
    fn new(text: &str, x: f64, y: f64) -> Self {
        Self {
            text: text.to_string(),
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Labels for a straight parallel: one at each end of the chord.
pub fn place_straight_parallel(
    points: &[ScreenPoint],
    text: &str,
    metrics: &TextMetrics,
    size: SurfaceSize,
) -> Vec<EdgeLabel> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let y = first.y + metrics.height / 2.0 - EDGE_GAP;
    vec![
        EdgeLabel::new(text, 0.0, y),
        EdgeLabel::new(text, size.width_f64() - metrics.width, y),
    ]
}

/// Labels for a straight meridian: one at the top edge, one at the bottom.
pub fn place_straight_meridian(
    points: &[ScreenPoint],
    text: &str,
    metrics: &TextMetrics,
    size: SurfaceSize,
) -> Vec<EdgeLabel> {
    let (Some(top), Some(bottom)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    vec![
        EdgeLabel::new(text, top.x - metrics.width / 2.0, metrics.height + 1.0),
        EdgeLabel::new(
            text,
            bottom.x - metrics.width / 2.0,
            size.height_f64() - EDGE_GAP - 1.0,
        ),
    ]
}

/// Labels for a curved parallel: one per crossing of the left or right
/// viewport edge.
pub fn place_curved_parallel(
    points: &[ScreenPoint],
    text: &str,
    metrics: &TextMetrics,
    size: SurfaceSize,
) -> Vec<EdgeLabel> {
    let width = size.width_f64();
    let right_band = width - metrics.width;
    let mut labels = Vec::new();

    for pair in points.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);

        if (prev.x < 0.0) != (cur.x < 0.0) {
            let y = interpolate_y_at(prev, cur, 0.0);
            labels.push(EdgeLabel::new(text, 0.0, y + metrics.height / 2.0));
        } else if (prev.x > right_band) != (cur.x > right_band) {
            let y = interpolate_y_at(prev, cur, width);
            labels.push(EdgeLabel::new(
                text,
                right_band,
                y + metrics.height / 2.0 - EDGE_GAP,
            ));
        }
    }

    labels
}

/// Labels for a curved meridian: one per crossing of the top or bottom
/// viewport edge.
pub fn place_curved_meridian(
    points: &[ScreenPoint],
    text: &str,
    metrics: &TextMetrics,
    size: SurfaceSize,
) -> Vec<EdgeLabel> {
    let height = size.height_f64();
    let mut labels = Vec::new();

    for pair in points.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);

        if (prev.y <= TOP_EDGE_BAND) != (cur.y <= TOP_EDGE_BAND) {
            let x = interpolate_x_at(prev, cur, TOP_EDGE_BAND);
            labels.push(EdgeLabel::new(
                text,
                x - metrics.width / 2.0,
                metrics.height,
            ));
        } else if (prev.y < height) != (cur.y < height) {
            let x = interpolate_x_at(prev, cur, height);
            labels.push(EdgeLabel::new(
                text,
                x - metrics.width / 2.0,
                height - EDGE_GAP,
            ));
        }
    }

    labels
}

/// Linear interpolation of `y` where the segment `prev→cur` crosses the
/// vertical line `x = edge`.
fn interpolate_y_at(prev: ScreenPoint, cur: ScreenPoint, edge: f64) -> f64 {
    let run = cur.x - prev.x;
    if run == 0.0 {
        return cur.y;
    }
    let t = (cur.x - edge) / run;
    cur.y - (cur.y - prev.y) * t
}

/// Linear interpolation of `x` where the segment `prev→cur` crosses the
/// horizontal line `y = edge`.
fn interpolate_x_at(prev: ScreenPoint, cur: ScreenPoint, edge: f64) -> f64 {
    let rise = cur.y - prev.y;
    if rise == 0.0 {
        return cur.x;
    }
    let t = (cur.y - edge) / rise;
    cur.x - (cur.x - prev.x) * t
}
