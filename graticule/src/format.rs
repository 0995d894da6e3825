//! Coordinate display formatting.
//!
//! The renderer treats the degree→string conversion as a collaborator
//! behind the [`CoordinateFormatter`] trait, so hosts can plug in their own
//! formatting. [`DegreeFormatter`] is the stock implementation, driven by a
//! [`LatLonPattern`].
//!
//! Longitude ticks east of the antimeridian arrive as raw values above
//! 180° (the tracer iterates them as a plain ascending interval); the
//! [`format_longitude`] helper normalizes them before formatting so that
//! `200°` and `-160°` label the same meridian identically.

use serde::{Deserialize, Serialize};

use crate::geo::{wrap_longitude, Axis};

/// Display pattern for the stock formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatLonPattern {
    /// `47.25°N`
    #[default]
    DecimalDegrees,
    /// `47°15′N`
    DegreesMinutes,
    /// `47°15′30″N`
    DegreesMinutesSeconds,
}

/// Converts a signed degree value into an axis tick label.
pub trait CoordinateFormatter {
    /// Format a degree value for the given axis.
    ///
    /// Longitudes are passed pre-normalized into `[-180, 180]`;
    /// implementations do not need to handle wraparound themselves.
    fn format(&self, axis: Axis, degrees: f64) -> String;
}

/// Format a latitude tick through a formatter.
pub fn format_latitude<F: CoordinateFormatter + ?Sized>(formatter: &F, degrees: f64) -> String {
    formatter.format(Axis::Latitude, degrees)
}

/// Format a longitude tick through a formatter, normalizing wraparound
/// values first.
pub fn format_longitude<F: CoordinateFormatter + ?Sized>(formatter: &F, degrees: f64) -> String {
    formatter.format(Axis::Longitude, wrap_longitude(degrees))
}

/// The stock degree formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DegreeFormatter {
    pattern: LatLonPattern,
}

impl DegreeFormatter {
    /// Create a formatter for the given pattern.
    pub fn new(pattern: LatLonPattern) -> Self {
        Self { pattern }
    }

    /// The configured pattern.
    pub fn pattern(&self) -> LatLonPattern {
        self.pattern
    }
}

impl CoordinateFormatter for DegreeFormatter {
    fn format(&self, axis: Axis, degrees: f64) -> String {
        let hemisphere = hemisphere_suffix(axis, degrees);
        let magnitude = degrees.abs();

        match self.pattern {
            LatLonPattern::DecimalDegrees => {
                format!("{}°{}", trim_decimal(magnitude), hemisphere)
            }
            LatLonPattern::DegreesMinutes => {
                let total_minutes = (magnitude * 60.0).round() as i64;
                let (deg, min) = (total_minutes / 60, total_minutes % 60);
                format!("{}°{:02}′{}", deg, min, hemisphere)
            }
            LatLonPattern::DegreesMinutesSeconds => {
                let total_seconds = (magnitude * 3600.0).round() as i64;
                let deg = total_seconds / 3600;
                let min = (total_seconds / 60) % 60;
                let sec = total_seconds % 60;
                format!("{}°{:02}′{:02}″{}", deg, min, sec, hemisphere)
            }
        }
    }
}

fn hemisphere_suffix(axis: Axis, degrees: f64) -> &'static str {
    if degrees > 0.0 {
        match axis {
            Axis::Latitude => "N",
            Axis::Longitude => "E",
        }
    } else if degrees < 0.0 {
        match axis {
            Axis::Latitude => "S",
            Axis::Longitude => "W",
        }
    } else {
        ""
    }
}

/// Render a magnitude with up to four decimals, trailing zeros trimmed.
fn trim_decimal(value: f64) -> String {
    let mut s = format!("{:.4}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
