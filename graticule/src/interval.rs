//! Zoom-dependent tick spacing.
//!
//! A [`ZoomIntervalTable`] maps the host map's zoom level to the spacing,
//! in degrees, between consecutive grid lines on one axis. Tables are
//! configured per axis; spacing grows as zoom decreases so line density
//! stays bounded at every zoom level.

use serde::{Deserialize, Serialize};

/// One `(start, end, interval)` range of a zoom table.
///
/// A range matches a zoom level `z` when `start <= z <= end`. A range
/// whose `end` is absent is malformed and never matches; the table stays
/// usable rather than failing the whole overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomInterval {
    /// Lowest zoom level this range applies to.
    pub start: f64,
    /// Highest zoom level this range applies to; `None` disables the range.
    #[serde(default)]
    pub end: Option<f64>,
    /// Tick spacing in degrees.
    pub interval: f64,
}

impl ZoomInterval {
    /// Create a well-formed range.
    pub fn new(start: f64, end: f64, interval: f64) -> Self {
        Self {
            start,
            end: Some(end),
            interval,
        }
    }

    fn matches(&self, zoom: f64) -> bool {
        match self.end {
            Some(end) => self.start <= zoom && end >= zoom,
            None => false,
        }
    }
}

/// An ordered list of zoom ranges, resolved first-match-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomIntervalTable {
    ranges: Vec<ZoomInterval>,
}

impl ZoomIntervalTable {
    /// Create a table from ranges in resolution order.
    ///
    /// Overlapping ranges are allowed; [`resolve`](Self::resolve) returns
    /// the interval of the first matching range in declaration order.
    pub fn new(ranges: Vec<ZoomInterval>) -> Self {
        Self { ranges }
    }

    /// The configured ranges, in resolution order.
    pub fn ranges(&self) -> &[ZoomInterval] {
        &self.ranges
    }

    /// Resolve the tick spacing for a zoom level.
    ///
    /// Returns `0.0` when no range matches, which callers treat as
    /// "do not draw this axis". Never panics, whatever the table holds.
    pub fn resolve(&self, zoom: f64) -> f64 {
        for range in &self.ranges {
            if range.matches(zoom) {
                return range.interval;
            }
        }
        0.0
    }
}

impl Default for ZoomIntervalTable {
    /// The stock table: 40° lines at the world view down to 0.001° lines
    /// at street level.
    fn default() -> Self {
        Self::new(vec![
            ZoomInterval::new(1.0, 2.0, 40.0),
            ZoomInterval::new(3.0, 3.0, 20.0),
            ZoomInterval::new(4.0, 4.0, 10.0),
            ZoomInterval::new(5.0, 7.0, 5.0),
            ZoomInterval::new(8.0, 9.0, 1.0),
            ZoomInterval::new(10.0, 10.0, 0.5),
            ZoomInterval::new(11.0, 11.0, 0.25),
            ZoomInterval::new(12.0, 12.0, 0.1),
            ZoomInterval::new(13.0, 13.0, 0.05),
            ZoomInterval::new(14.0, 14.0, 0.025),
            ZoomInterval::new(15.0, 15.0, 0.01),
            ZoomInterval::new(16.0, 16.0, 0.005),
            ZoomInterval::new(17.0, 17.0, 0.0025),
            ZoomInterval::new(18.0, 18.0, 0.001),
        ])
    }
}
