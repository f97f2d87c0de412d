//! Raster backend - the pixel primitives a render session drives.

use tiny_skia::{FilterQuality, Path, PixmapPaint, Transform};

use super::image_cache::{ImageCache, LIMITED_CACHE_BYTES};
use super::path_rasterizer::PathRasterizer;
use super::target::RenderTarget;
use super::PaintSpec;
use crate::color::Argb;
use crate::config::{RenderConfig, RenderFlags};
use crate::error::{Error, Result};
use crate::page::{BlendMode, FillRule, ImageObject, Shading, StrokeStyle};

/// Pixel-level painting capability.
///
/// Geometry arrives already resolved: colours have been through the colour
/// policy and `transform` maps object space straight to device pixels. A
/// backend that cannot paint must return an error rather than skip the
/// operation.
pub trait RasterBackend {
    /// Called once per session, before the background is painted.
    fn begin(&mut self, _config: &RenderConfig) {}

    /// Overwrite the whole target with `color`.
    fn clear(&mut self, target: &mut RenderTarget, color: Argb) -> Result<()>;

    /// Fill a path.
    fn fill_path(
        &mut self,
        target: &mut RenderTarget,
        path: &Path,
        paint: &PaintSpec,
        rule: FillRule,
        transform: Transform,
    ) -> Result<()>;

    /// Stroke a path.
    fn stroke_path(
        &mut self,
        target: &mut RenderTarget,
        path: &Path,
        paint: &PaintSpec,
        style: &StrokeStyle,
        transform: Transform,
    ) -> Result<()>;

    /// Paint a gradient clipped to `area`.
    fn fill_shading(
        &mut self,
        target: &mut RenderTarget,
        area: &Path,
        shading: &Shading,
        blend_mode: BlendMode,
        anti_alias: bool,
        transform: Transform,
    ) -> Result<()>;

    /// Composite an image. `transform` maps image pixel space (top row
    /// first) to device space.
    fn draw_image(
        &mut self,
        target: &mut RenderTarget,
        image: &ImageObject,
        blend_mode: BlendMode,
        smooth: bool,
        transform: Transform,
    ) -> Result<()>;
}

/// The tiny-skia backend.
#[derive(Default)]
pub struct SkiaBackend {
    paths: PathRasterizer,
    images: ImageCache,
}

impl SkiaBackend {
    /// Create a backend with an unbounded image cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The decoded-image cache.
    pub fn image_cache(&self) -> &ImageCache {
        &self.images
    }
}

impl RasterBackend for SkiaBackend {
    fn begin(&mut self, config: &RenderConfig) {
        let limit = config
            .flags
            .contains(RenderFlags::LIMITED_IMAGE_CACHE)
            .then_some(LIMITED_CACHE_BYTES);
        self.images.set_limit(limit);
    }

    fn clear(&mut self, target: &mut RenderTarget, color: Argb) -> Result<()> {
        target.fill(color);
        Ok(())
    }

    fn fill_path(
        &mut self,
        target: &mut RenderTarget,
        path: &Path,
        paint: &PaintSpec,
        rule: FillRule,
        transform: Transform,
    ) -> Result<()> {
        self.paths
            .fill_path(target.pixmap_mut(), path, paint, rule, transform)
    }

    fn stroke_path(
        &mut self,
        target: &mut RenderTarget,
        path: &Path,
        paint: &PaintSpec,
        style: &StrokeStyle,
        transform: Transform,
    ) -> Result<()> {
        self.paths
            .stroke_path(target.pixmap_mut(), path, paint, style, transform)
    }

    fn fill_shading(
        &mut self,
        target: &mut RenderTarget,
        area: &Path,
        shading: &Shading,
        blend_mode: BlendMode,
        anti_alias: bool,
        transform: Transform,
    ) -> Result<()> {
        self.paths
            .fill_shading(target.pixmap_mut(), area, shading, blend_mode, anti_alias, transform)
    }

    fn draw_image(
        &mut self,
        target: &mut RenderTarget,
        image: &ImageObject,
        blend_mode: BlendMode,
        smooth: bool,
        transform: Transform,
    ) -> Result<()> {
        if !transform.is_finite() {
            return Err(Error::backend(format!("non-finite image transform for image {}", image.id)));
        }
        let pixmap = self.images.get_or_decode(image)?;
        let paint = PixmapPaint {
            opacity: image.opacity as f32 / 255.0,
            blend_mode: blend_mode.to_skia(),
            quality: if smooth {
                FilterQuality::Bilinear
            } else {
                FilterQuality::Nearest
            },
        };
        target
            .pixmap_mut()
            .draw_pixmap(0, 0, tiny_skia::Pixmap::as_ref(&pixmap), &paint, transform, None);
        Ok(())
    }
}
