//! The owned raster drawing surface.
//!
//! Each attached overlay owns exactly one [`Surface`]: a transparent
//! pixmap kept at the host map's viewport size, positioned in layer space
//! to track the accumulated pan offset. A redraw clears the whole pixmap
//! before repainting, so no stale geometry from a previous frame can
//! remain visible.
//!
//! Opacity is a composite-time property of the surface, mirroring how a
//! layer element's opacity works: changing it never touches the painted
//! pixels, so the traced geometry is invariant under opacity changes.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use tiny_skia::{
    Color, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};

use crate::error::GraticuleError;
use crate::geo::{Rgba, ScreenPoint, SurfaceSize};
use crate::host::OverlayId;

/// Default label size in pixels.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Advance-per-character heuristic, in em, used when no glyph source is
/// configured and text can only be measured approximately.
const FALLBACK_ADVANCE_EM: f64 = 0.6;

/// Measured pixel extent of a piece of label text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Label font: an optional glyph source plus a pixel size.
///
/// Without a glyph source the font still measures text through a
/// width-per-character heuristic (so label placement stays deterministic),
/// but nothing is rasterized — the overlay degrades to unlabeled grid
/// lines rather than failing.
#[derive(Debug, Clone)]
pub struct LabelFont {
    glyphs: Option<FontArc>,
    size: f32,
}

impl LabelFont {
    /// Load a font from raw TTF/OTF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GraticuleError::InvalidFont`] when the bytes are not a
    /// parsable font.
    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self, GraticuleError> {
        let glyphs = FontArc::try_from_vec(bytes)?;
        Ok(Self {
            glyphs: Some(glyphs),
            size,
        })
    }

    /// Use an already-loaded font.
    pub fn from_font(font: FontArc, size: f32) -> Self {
        Self {
            glyphs: Some(font),
            size,
        }
    }

    /// A metrics-only font: placement works, rasterization is skipped.
    pub fn metrics_only(size: f32) -> Self {
        Self { glyphs: None, size }
    }

    /// The configured pixel size.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Whether label text can actually be rasterized.
    pub fn can_rasterize(&self) -> bool {
        self.glyphs.is_some()
    }

    /// Measure a piece of text at the configured size.
    pub fn measure(&self, text: &str) -> TextMetrics {
        let height = f64::from(self.size);
        let width = match &self.glyphs {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(self.size));
                let mut width = 0.0f32;
                let mut previous = None;
                for ch in text.chars() {
                    let glyph = scaled.glyph_id(ch);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, glyph);
                    }
                    width += scaled.h_advance(glyph);
                    previous = Some(glyph);
                }
                f64::from(width)
            }
            None => text.chars().count() as f64 * height * FALLBACK_ADVANCE_EM,
        };
        TextMetrics { width, height }
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self::metrics_only(DEFAULT_FONT_SIZE)
    }
}

/// A transparent raster surface owned by one overlay.
pub struct Surface {
    id: OverlayId,
    pixmap: Pixmap,
    origin: ScreenPoint,
    opacity: f32,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("size", &self.size())
            .field("origin", &self.origin)
            .field("opacity", &self.opacity)
            .finish()
    }
}

impl Surface {
    /// Create a surface for the given viewport size. Degenerate dimensions
    /// are clamped to one pixel rather than rejected.
    pub fn new(id: OverlayId, size: SurfaceSize) -> Self {
        Self {
            id,
            pixmap: Self::allocate(size),
            origin: ScreenPoint::ZERO,
            opacity: 1.0,
        }
    }

    fn allocate(size: SurfaceSize) -> Pixmap {
        let width = size.width.max(1);
        let height = size.height.max(1);
        Pixmap::new(width, height)
            .or_else(|| Pixmap::new(1, 1))
            .expect("1x1 pixmap allocation cannot fail")
    }

    /// The owning overlay's id.
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Current pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Position of the surface in the host map's layer space.
    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    /// Reposition the surface to track the host map's pan offset.
    pub fn set_origin(&mut self, origin: ScreenPoint) {
        self.origin = origin;
    }

    /// Composite opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set the composite opacity. Values are clamped; painted pixels are
    /// untouched.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Resize to match a changed viewport, dropping previous content.
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.size() != SurfaceSize::new(size.width.max(1), size.height.max(1)) {
            self.pixmap = Self::allocate(size);
        }
    }

    /// Clear the whole surface to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// The painted pixels, for compositing or inspection.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Stroke a polyline. Paths with fewer than two points are skipped.
    pub fn stroke_polyline(&mut self, points: &[ScreenPoint], color: Rgba, weight: f32) {
        if points.len() < 2 {
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(points[0].x as f32, points[0].y as f32);
        for point in &points[1..] {
            builder.line_to(point.x as f32, point.y as f32);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: weight,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Rasterize label text with its baseline-left corner at `position`.
    ///
    /// A metrics-only font makes this a no-op.
    pub fn fill_text(&mut self, text: &str, position: ScreenPoint, font: &LabelFont, color: Rgba) {
        let Some(glyph_source) = &font.glyphs else {
            return;
        };

        let scale = PxScale::from(font.size());
        let scaled = glyph_source.as_scaled(scale);
        let mut caret = position.x as f32;
        let baseline = position.y as f32;
        let mut previous = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
            caret += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);

            if let Some(outlined) = glyph_source.outline_glyph(glyph) {
                let glyph_bounds = outlined.px_bounds();
                let min_x = glyph_bounds.min.x as i32;
                let min_y = glyph_bounds.min.y as i32;
                let width = self.pixmap.width() as i32;
                let height = self.pixmap.height() as i32;
                let pixels = self.pixmap.pixels_mut();

                outlined.draw(|gx, gy, coverage| {
                    let px = min_x + gx as i32;
                    let py = min_y + gy as i32;
                    if px < 0 || py < 0 || px >= width || py >= height {
                        return;
                    }
                    blend(&mut pixels[(py * width + px) as usize], color, coverage);
                });
            }
        }
    }
}

/// Source-over blend of one covered pixel.
fn blend(pixel: &mut PremultipliedColorU8, color: Rgba, coverage: f32) {
    let alpha = (coverage * f32::from(color.a) / 255.0).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inverse = 1.0 - alpha;

    let out_a = alpha * 255.0 + f32::from(pixel.alpha()) * inverse;
    let out_r = (f32::from(color.r) * alpha + f32::from(pixel.red()) * inverse).min(out_a);
    let out_g = (f32::from(color.g) * alpha + f32::from(pixel.green()) * inverse).min(out_a);
    let out_b = (f32::from(color.b) * alpha + f32::from(pixel.blue()) * inverse).min(out_a);

    if let Some(blended) =
        PremultipliedColorU8::from_rgba(out_r as u8, out_g as u8, out_b as u8, out_a as u8)
    {
        *pixel = blended;
    }
}
