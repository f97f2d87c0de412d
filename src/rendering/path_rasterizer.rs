//! Path rasterizer - paints paths and shadings using tiny-skia.

use super::{create_paint, PaintSpec};
use crate::color::Argb;
use crate::error::{Error, Result};
use crate::page::{BlendMode, FillRule, LineCap, LineJoin, Shading, StrokeStyle};
use tiny_skia::{GradientStop, LinearGradient, Paint, Path, Pixmap, RadialGradient, SpreadMode, Stroke, Transform};

/// Rasterizer for path fill, stroke and shading operations.
pub struct PathRasterizer {}

impl PathRasterizer {
    /// Create a new path rasterizer.
    pub fn new() -> Self {
        Self {}
    }

    /// Fill a path.
    pub fn fill_path(
        &self,
        pixmap: &mut Pixmap,
        path: &Path,
        paint: &PaintSpec,
        rule: FillRule,
        transform: Transform,
    ) -> Result<()> {
        check_transform(transform)?;
        let paint = create_paint(paint);
        pixmap.fill_path(path, &paint, rule.to_skia(), transform, None);
        Ok(())
    }

    /// Stroke a path with the given line style.
    pub fn stroke_path(
        &self,
        pixmap: &mut Pixmap,
        path: &Path,
        paint: &PaintSpec,
        style: &StrokeStyle,
        transform: Transform,
    ) -> Result<()> {
        check_transform(transform)?;
        let paint = create_paint(paint);

        let dash = if !style.dash.0.is_empty() {
            tiny_skia::StrokeDash::new(style.dash.0.clone(), style.dash.1)
        } else {
            None
        };

        let stroke = Stroke {
            width: style.width,
            line_cap: self.line_cap_to_skia(style.line_cap),
            line_join: self.line_join_to_skia(style.line_join),
            miter_limit: style.miter_limit,
            dash,
        };

        pixmap.stroke_path(path, &paint, &stroke, transform, None);
        Ok(())
    }

    /// Paint a gradient over `area`. Gradient geometry is in the same
    /// space as the area.
    pub fn fill_shading(
        &self,
        pixmap: &mut Pixmap,
        area: &Path,
        shading: &Shading,
        blend_mode: BlendMode,
        anti_alias: bool,
        transform: Transform,
    ) -> Result<()> {
        check_transform(transform)?;
        let stops: Vec<GradientStop> = shading
            .stops()
            .iter()
            .map(|(offset, color)| GradientStop::new(*offset, color.to_skia()))
            .collect();
        if stops.is_empty() {
            return Err(Error::backend("shading has no colour stops"));
        }

        let shader = match shading {
            Shading::Axial { start, end, .. } => LinearGradient::new(
                tiny_skia::Point::from_xy(start.x, start.y),
                tiny_skia::Point::from_xy(end.x, end.y),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
            Shading::Radial { center, radius, .. } => {
                let c = tiny_skia::Point::from_xy(center.x, center.y);
                RadialGradient::new(c, c, *radius, stops, SpreadMode::Pad, Transform::identity())
            },
        };

        let mut paint = Paint::default();
        match shader {
            Some(shader) => paint.shader = shader,
            // Degenerate geometry paints the ramp's end colour.
            None => {
                let last = shading.stops().last().map_or(Argb::TRANSPARENT, |(_, c)| *c);
                paint.set_color(last.to_skia());
            },
        }
        paint.anti_alias = anti_alias;
        paint.blend_mode = blend_mode.to_skia();

        pixmap.fill_path(area, &paint, tiny_skia::FillRule::Winding, transform, None);
        Ok(())
    }

    /// Convert line cap style to tiny-skia.
    fn line_cap_to_skia(&self, cap: LineCap) -> tiny_skia::LineCap {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }

    /// Convert line join style to tiny-skia.
    fn line_join_to_skia(&self, join: LineJoin) -> tiny_skia::LineJoin {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

impl Default for PathRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_transform(transform: Transform) -> Result<()> {
    if transform.is_finite() {
        Ok(())
    } else {
        Err(Error::backend(format!("non-finite transform {:?}", transform)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use tiny_skia::PathBuilder;

    fn square(size: f32) -> Path {
        PathBuilder::from_rect(tiny_skia::Rect::from_xywh(0.0, 0.0, size, size).unwrap())
    }

    fn red() -> PaintSpec {
        PaintSpec::new(Argb::RED)
    }

    #[test]
    fn test_line_cap_conversion() {
        let rasterizer = PathRasterizer::new();
        assert_eq!(rasterizer.line_cap_to_skia(LineCap::Butt), tiny_skia::LineCap::Butt);
        assert_eq!(rasterizer.line_cap_to_skia(LineCap::Round), tiny_skia::LineCap::Round);
        assert_eq!(rasterizer.line_cap_to_skia(LineCap::Square), tiny_skia::LineCap::Square);
    }

    #[test]
    fn test_line_join_conversion() {
        let rasterizer = PathRasterizer::new();
        assert_eq!(rasterizer.line_join_to_skia(LineJoin::Miter), tiny_skia::LineJoin::Miter);
        assert_eq!(rasterizer.line_join_to_skia(LineJoin::Round), tiny_skia::LineJoin::Round);
        assert_eq!(rasterizer.line_join_to_skia(LineJoin::Bevel), tiny_skia::LineJoin::Bevel);
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        PathRasterizer::new()
            .fill_path(&mut pixmap, &square(10.0), &red(), FillRule::NonZero, Transform::identity())
            .unwrap();
        let px = pixmap.pixel(5, 5).unwrap();
        assert_eq!((px.red(), px.alpha()), (255, 255));
    }

    #[test]
    fn test_stroke_leaves_interior_empty() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let path = PathBuilder::from_rect(tiny_skia::Rect::from_xywh(4.0, 4.0, 12.0, 12.0).unwrap());
        PathRasterizer::new()
            .stroke_path(&mut pixmap, &path, &red(), &StrokeStyle::with_width(2.0), Transform::identity())
            .unwrap();
        assert_eq!(pixmap.pixel(10, 10).unwrap().alpha(), 0);
        assert_eq!(pixmap.pixel(4, 10).unwrap().alpha(), 255);
    }

    #[test]
    fn test_non_finite_transform_is_reported() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let result = PathRasterizer::new().fill_path(
            &mut pixmap,
            &square(2.0),
            &red(),
            FillRule::NonZero,
            Transform::from_scale(f32::NAN, 1.0),
        );
        assert!(matches!(result, Err(Error::Backend { .. })));
    }

    #[test]
    fn test_axial_shading_ramps() {
        let mut pixmap = Pixmap::new(100, 10).unwrap();
        let shading = Shading::Axial {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
            stops: vec![(0.0, Argb::BLACK), (1.0, Argb::WHITE)],
        };
        let area = PathBuilder::from_rect(tiny_skia::Rect::from_xywh(0.0, 0.0, 100.0, 10.0).unwrap());
        PathRasterizer::new()
            .fill_shading(&mut pixmap, &area, &shading, BlendMode::Normal, true, Transform::identity())
            .unwrap();
        let left = pixmap.pixel(2, 5).unwrap().red();
        let right = pixmap.pixel(97, 5).unwrap().red();
        assert!(left < 20 && right > 235, "left {} right {}", left, right);
    }

    #[test]
    fn test_shading_without_stops_fails() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let shading = Shading::Radial {
            center: Point::new(2.0, 2.0),
            radius: 2.0,
            stops: Vec::new(),
        };
        let result = PathRasterizer::new().fill_shading(
            &mut pixmap,
            &square(4.0),
            &shading,
            BlendMode::Normal,
            true,
            Transform::identity(),
        );
        assert!(result.is_err());
    }
}
