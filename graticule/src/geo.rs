//! Geographic and screen-space primitives.
//!
//! Types here carry raw values between the host map boundary and the
//! renderer. Latitudes and longitudes are degrees; screen points are
//! container pixels with the origin at the top-left corner of the host
//! map's viewport.

use serde::{Deserialize, Serialize};

use crate::error::GraticuleError;

/// A geographic coordinate in degrees.
///
/// Longitudes are not normalized on construction: tick values east of the
/// antimeridian are deliberately kept above 180° so they remain usable in
/// ascending iteration. Use [`wrap_longitude`] (or [`LatLng::wrapped`])
/// before presenting a longitude to a user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Create a new coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Return the same coordinate with the longitude normalized into
    /// `[-180, 180]`.
    pub fn wrapped(self) -> Self {
        Self {
            lat: self.lat,
            lng: wrap_longitude(self.lng),
        }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Normalize a longitude into `[-180, 180]` by whole-turn shifts.
///
/// `200` and `-160` denote the same physical meridian; both normalize to
/// `-160`. Values already in range are returned unchanged, including the
/// two boundary values `-180` and `180`.
pub fn wrap_longitude(mut lng: f64) -> f64 {
    if !lng.is_finite() {
        return lng;
    }
    while lng > 180.0 {
        lng -= 360.0;
    }
    while lng < -180.0 {
        lng += 360.0;
    }
    lng
}

/// A point in container-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// The container origin (top-left viewport corner).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Pixel dimensions of a drawing surface or viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Create a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as `f64` for projection arithmetic.
    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for projection arithmetic.
    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

/// One of the two graticule axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Parallels: lines of constant latitude.
    Latitude,
    /// Meridians: lines of constant longitude.
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS-style hex color: `#abc`, `#aabbcc` or `#aabbccdd`.
    ///
    /// # Errors
    ///
    /// Returns [`GraticuleError::InvalidColor`] when the string is not one
    /// of the three accepted hex forms.
    pub fn from_hex(hex: &str) -> Result<Self, GraticuleError> {
        fn pair(s: &str) -> Option<u8> {
            u8::from_str_radix(s, 16).ok()
        }
        fn single(s: &str) -> Option<u8> {
            // `a` expands to `aa`.
            pair(s).map(|v| v * 16 + v)
        }
        fn parse(digits: &str) -> Option<Rgba> {
            match digits.len() {
                3 => Some(Rgba::rgb(
                    single(&digits[0..1])?,
                    single(&digits[1..2])?,
                    single(&digits[2..3])?,
                )),
                6 => Some(Rgba::rgb(
                    pair(&digits[0..2])?,
                    pair(&digits[2..4])?,
                    pair(&digits[4..6])?,
                )),
                8 => Some(Rgba::new(
                    pair(&digits[0..2])?,
                    pair(&digits[2..4])?,
                    pair(&digits[4..6])?,
                    pair(&digits[6..8])?,
                )),
                _ => None,
            }
        }

        let digits = hex.strip_prefix('#').unwrap_or(hex);
        parse(digits).ok_or_else(|| GraticuleError::InvalidColor(hex.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod wrap_longitude {
        use super::*;

        #[test]
        fn test_wraps_east_of_antimeridian() {
            assert!((wrap_longitude(200.0) - (-160.0)).abs() < 1e-9);
            assert!((wrap_longitude(185.0) - (-175.0)).abs() < 1e-9);
        }

        #[test]
        fn test_wraps_west_of_antimeridian() {
            assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-9);
            assert!((wrap_longitude(-200.0) - 160.0).abs() < 1e-9);
        }

        #[test]
        fn test_in_range_values_unchanged() {
            assert_eq!(wrap_longitude(0.0), 0.0);
            assert_eq!(wrap_longitude(179.5), 179.5);
            assert_eq!(wrap_longitude(-180.0), -180.0);
            assert_eq!(wrap_longitude(180.0), 180.0);
        }

        #[test]
        fn test_multiple_turns() {
            assert!((wrap_longitude(365.0) - 5.0).abs() < 1e-9);
            assert!((wrap_longitude(-725.0) - (-5.0)).abs() < 1e-9);
        }

        #[test]
        fn test_same_meridian_wraps_to_same_value() {
            // 200°E and 160°W are the same physical meridian.
            assert!((wrap_longitude(200.0) - wrap_longitude(-160.0)).abs() < 1e-9);
        }
    }

    mod rgba {
        use super::*;

        #[test]
        fn test_parse_three_digit_hex() {
            let c = Rgba::from_hex("#aaa").unwrap();
            assert_eq!(c, Rgba::rgb(0xaa, 0xaa, 0xaa));
        }

        #[test]
        fn test_parse_six_digit_hex() {
            let c = Rgba::from_hex("#1a2b3c").unwrap();
            assert_eq!(c, Rgba::rgb(0x1a, 0x2b, 0x3c));
        }

        #[test]
        fn test_parse_eight_digit_hex() {
            let c = Rgba::from_hex("#1a2b3c80").unwrap();
            assert_eq!(c, Rgba::new(0x1a, 0x2b, 0x3c, 0x80));
        }

        #[test]
        fn test_parse_without_hash_prefix() {
            let c = Rgba::from_hex("ff0000").unwrap();
            assert_eq!(c, Rgba::rgb(255, 0, 0));
        }

        #[test]
        fn test_parse_invalid_length() {
            assert!(Rgba::from_hex("#abcd").is_err());
            assert!(Rgba::from_hex("").is_err());
        }

        #[test]
        fn test_parse_invalid_digits() {
            assert!(Rgba::from_hex("#zzz").is_err());
        }
    }

    mod lat_lng {
        use super::*;

        #[test]
        fn test_wrapped_normalizes_longitude_only() {
            let c = LatLng::new(45.0, 200.0).wrapped();
            assert_eq!(c.lat, 45.0);
            assert!((c.lng - (-160.0)).abs() < 1e-9);
        }

        #[test]
        fn test_display() {
            let c = LatLng::new(54.5, 10.0);
            assert_eq!(format!("{}", c), "(54.500000, 10.000000)");
        }
    }
}
