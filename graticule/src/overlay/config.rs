//! Graticule configuration.
//!
//! [`GraticuleOptions`] is assembled once and stays immutable for the
//! overlay's lifetime. Defaults match a light-gray, labeled graticule with
//! straight lines on both axes.

use serde::{Deserialize, Serialize};

use crate::error::GraticuleError;
use crate::format::LatLonPattern;
use crate::geo::{Axis, Rgba};
use crate::interval::ZoomIntervalTable;
use crate::surface::LabelFont;
use crate::tracer::CurveMode;

/// Default stroke color, a light gray.
pub const DEFAULT_STROKE_COLOR: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);

/// Default stroke weight in pixels.
pub const DEFAULT_STROKE_WEIGHT: f32 = 0.8;

/// Default fraction of the viewport extent used as the padding margin.
pub const DEFAULT_PADDING_FRACTION: f64 = 0.2;

/// Immutable overlay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraticuleOptions {
    /// Whether to paint edge labels.
    pub show_label: bool,
    /// Initial composite opacity of the surface, `0.0..=1.0`.
    pub opacity: f32,
    /// Stroke weight in pixels.
    pub weight: f32,
    /// Stroke color.
    pub color: Rgba,
    /// Label color; falls back to the stroke color.
    pub font_color: Option<Rgba>,
    /// Label font (glyph source + pixel size).
    #[serde(skip)]
    pub font: LabelFont,
    /// Display pattern handed to the stock coordinate formatter.
    pub pattern: LatLonPattern,
    /// Curve mode for parallels (constant-latitude lines).
    pub lat_curve: CurveMode,
    /// Curve mode for meridians (constant-longitude lines).
    pub lng_curve: CurveMode,
    /// Zoom table applied to both axes unless overridden below.
    pub zoom_interval: ZoomIntervalTable,
    /// Per-axis override for parallels.
    pub latitude_interval: Option<ZoomIntervalTable>,
    /// Per-axis override for meridians.
    pub longitude_interval: Option<ZoomIntervalTable>,
    /// Fraction of the viewport extent to pad the geodetic bounds by.
    pub padding_fraction: f64,
    /// Attribution string reported through the layer interface.
    pub attribution: Option<String>,
}

impl Default for GraticuleOptions {
    fn default() -> Self {
        Self {
            show_label: true,
            opacity: 1.0,
            weight: DEFAULT_STROKE_WEIGHT,
            color: DEFAULT_STROKE_COLOR,
            font_color: None,
            font: LabelFont::default(),
            pattern: LatLonPattern::default(),
            lat_curve: CurveMode::Straight,
            lng_curve: CurveMode::Straight,
            zoom_interval: ZoomIntervalTable::default(),
            latitude_interval: None,
            longitude_interval: None,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            attribution: None,
        }
    }
}

impl GraticuleOptions {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle edge labels.
    pub fn with_show_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }

    /// Set the initial opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the stroke weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the stroke color.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set a label color distinct from the stroke color.
    pub fn with_font_color(mut self, color: Rgba) -> Self {
        self.font_color = Some(color);
        self
    }

    /// Set the label font.
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = font;
        self
    }

    /// Set the coordinate display pattern.
    pub fn with_pattern(mut self, pattern: LatLonPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the curve mode for parallels.
    pub fn with_lat_curve(mut self, mode: CurveMode) -> Self {
        self.lat_curve = mode;
        self
    }

    /// Set the curve mode for meridians.
    pub fn with_lng_curve(mut self, mode: CurveMode) -> Self {
        self.lng_curve = mode;
        self
    }

    /// Set the zoom table applied to both axes.
    pub fn with_zoom_interval(mut self, table: ZoomIntervalTable) -> Self {
        self.zoom_interval = table;
        self
    }

    /// Override the zoom table for parallels only.
    pub fn with_latitude_interval(mut self, table: ZoomIntervalTable) -> Self {
        self.latitude_interval = Some(table);
        self
    }

    /// Override the zoom table for meridians only.
    pub fn with_longitude_interval(mut self, table: ZoomIntervalTable) -> Self {
        self.longitude_interval = Some(table);
        self
    }

    /// Set the padding margin fraction.
    pub fn with_padding_fraction(mut self, fraction: f64) -> Self {
        self.padding_fraction = fraction;
        self
    }

    /// Set the attribution string.
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraticuleError::InvalidCurveStep`] when a curved axis is
    /// configured with a step that cannot bound the sampling walk.
    pub fn validate(&self) -> Result<(), GraticuleError> {
        for (axis, mode) in [
            (Axis::Latitude, self.lat_curve),
            (Axis::Longitude, self.lng_curve),
        ] {
            if let CurveMode::Sampled(step) = mode {
                if !(step.is_finite() && step > 0.0) {
                    return Err(GraticuleError::InvalidCurveStep { axis, step });
                }
            }
        }
        Ok(())
    }

    /// The zoom table governing parallels.
    pub(crate) fn lat_table(&self) -> &ZoomIntervalTable {
        self.latitude_interval.as_ref().unwrap_or(&self.zoom_interval)
    }

    /// The zoom table governing meridians.
    pub(crate) fn lng_table(&self) -> &ZoomIntervalTable {
        self.longitude_interval
            .as_ref()
            .unwrap_or(&self.zoom_interval)
    }

    /// The effective label color.
    pub(crate) fn label_color(&self) -> Rgba {
        self.font_color.unwrap_or(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::ZoomInterval;

    #[test]
    fn test_defaults_mirror_the_stock_style() {
        let options = GraticuleOptions::default();
        assert!(options.show_label);
        assert_eq!(options.opacity, 1.0);
        assert_eq!(options.weight, 0.8);
        assert_eq!(options.color, Rgba::rgb(0xaa, 0xaa, 0xaa));
        assert_eq!(options.lat_curve, CurveMode::Straight);
        assert_eq!(options.lng_curve, CurveMode::Straight);
        assert_eq!(options.padding_fraction, 0.2);
    }

    #[test]
    fn test_label_color_falls_back_to_stroke_color() {
        let options = GraticuleOptions::default();
        assert_eq!(options.label_color(), options.color);

        let options = options.with_font_color(Rgba::rgb(0, 0, 0));
        assert_eq!(options.label_color(), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn test_axis_tables_fall_back_to_shared_table() {
        let shared = ZoomIntervalTable::new(vec![ZoomInterval::new(1.0, 18.0, 2.0)]);
        let lat_only = ZoomIntervalTable::new(vec![ZoomInterval::new(1.0, 18.0, 4.0)]);
        let options = GraticuleOptions::default()
            .with_zoom_interval(shared)
            .with_latitude_interval(lat_only);

        assert_eq!(options.lat_table().resolve(5.0), 4.0);
        assert_eq!(options.lng_table().resolve(5.0), 2.0);
    }

    #[test]
    fn test_validate_rejects_bad_curve_steps() {
        let options = GraticuleOptions::default().with_lng_curve(CurveMode::Sampled(0.0));
        assert!(matches!(
            options.validate(),
            Err(GraticuleError::InvalidCurveStep { .. })
        ));

        let options = GraticuleOptions::default().with_lat_curve(CurveMode::Sampled(f64::NAN));
        assert!(options.validate().is_err());

        let options = GraticuleOptions::default().with_lat_curve(CurveMode::Sampled(0.5));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config_fills_defaults() {
        let options: GraticuleOptions = serde_json::from_str(
            r#"{
                "show_label": false,
                "color": {"r": 16, "g": 32, "b": 48, "a": 255},
                "lng_curve": {"sampled": 0.5}
            }"#,
        )
        .unwrap();
        assert!(!options.show_label);
        assert_eq!(options.color, Rgba::rgb(16, 32, 48));
        assert_eq!(options.lng_curve, CurveMode::Sampled(0.5));
        // Untouched fields keep their defaults.
        assert_eq!(options.weight, DEFAULT_STROKE_WEIGHT);
        assert_eq!(options.zoom_interval.resolve(5.0), 5.0);
    }
}
