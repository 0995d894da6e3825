//! Error types for graticule construction.
//!
//! All errors in this crate surface at construction time (options
//! validation, color parsing, font loading). Once an overlay is attached,
//! drawing never fails: configuration gaps degrade to a skipped axis or a
//! default value, and geometric edge cases are corrected arithmetically.

use thiserror::Error;

use crate::geo::Axis;

/// Errors that can occur while building a graticule overlay.
#[derive(Debug, Error)]
pub enum GraticuleError {
    /// A curved-mode sampling step cannot bound the sampling walk.
    #[error("Invalid {axis} curve step: {step} (must be a positive, finite number of degrees)")]
    InvalidCurveStep {
        /// The axis the step was configured for.
        axis: Axis,
        /// The rejected step value.
        step: f64,
    },

    /// A color string is not a recognized hex form.
    #[error("Invalid color: {0:?} (expected #rgb, #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    /// Label font bytes could not be parsed.
    #[error("Invalid label font: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}
