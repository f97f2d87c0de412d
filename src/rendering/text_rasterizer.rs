//! Text rasterizer - paints shaped glyph runs.
//!
//! Glyphs arrive as outlines in em units (shaping happened upstream), so
//! text painting reduces to filling and stroking paths:
//! - each glyph is placed at its origin in text space and scaled by the
//!   font size,
//! - the text matrix then maps text space to page space,
//! - stroke widths are given in text space and are rescaled so the font
//!   size does not thicken them.

use super::backend::RasterBackend;
use super::target::RenderTarget;
use super::PaintSpec;
use crate::error::Result;
use crate::page::{FillRule, Glyph, StrokeStyle, TextObject};

use tiny_skia::Transform;

/// Rasterizer for text objects.
pub struct TextRasterizer {}

impl TextRasterizer {
    /// Create a new text rasterizer.
    pub fn new() -> Self {
        Self {}
    }

    /// Paint a text run. `fill` / `stroke` are the resolved paints; a
    /// `None` paint is skipped.
    pub fn render_text<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        text: &TextObject,
        base_transform: Transform,
        fill: Option<&PaintSpec>,
        stroke: Option<&PaintSpec>,
    ) -> Result<()> {
        if text.font_size == 0.0 || text.glyphs.is_empty() {
            return Ok(());
        }
        let text_transform = base_transform.pre_concat(text.transform);
        let stroke_style = stroke.map(|_| self.glyph_stroke_style(text));

        for glyph in &text.glyphs {
            let transform = self.glyph_transform(text_transform, glyph, text.font_size);
            if let Some(paint) = fill {
                backend.fill_path(target, &glyph.outline, paint, FillRule::NonZero, transform)?;
            }
            if let (Some(paint), Some(style)) = (stroke, stroke_style.as_ref()) {
                backend.stroke_path(target, &glyph.outline, paint, style, transform)?;
            }
        }
        Ok(())
    }

    /// Em space to device space for one glyph.
    fn glyph_transform(&self, text_transform: Transform, glyph: &Glyph, font_size: f32) -> Transform {
        text_transform
            .pre_translate(glyph.x, glyph.y)
            .pre_scale(font_size, font_size)
    }

    /// Stroke style expressed in em units.
    fn glyph_stroke_style(&self, text: &TextObject) -> StrokeStyle {
        let scale = text.font_size.abs();
        let mut style = text.stroke_style.clone();
        style.width /= scale;
        for dash in style.dash.0.iter_mut() {
            *dash /= scale;
        }
        style.dash.1 /= scale;
        style
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}
