//! Page renderer - paints one work unit (a page object or an annotation)
//! through a raster backend.

use log::trace;
use tiny_skia::Transform;

use super::backend::RasterBackend;
use super::color_policy::{ColorPolicy, PathPaint};
use super::target::RenderTarget;
use super::text_rasterizer::TextRasterizer;
use super::PaintSpec;
use crate::annotations::Annotation;
use crate::config::{RenderConfig, RenderFlags};
use crate::error::Result;
use crate::geometry::display_transform;
use crate::page::{BlendMode, FillRule, ImageObject, Page, PageObject, PathObject, ShadingObject, TextObject};

/// Paints page objects for one page under one configuration.
pub struct PageRenderer {
    base: Transform,
    policy: ColorPolicy,
    flags: RenderFlags,
    text: TextRasterizer,
}

impl PageRenderer {
    /// Renderer for the base content pass.
    pub fn new(page: &Page, config: &RenderConfig) -> Self {
        Self::with_policy(page, config, ColorPolicy::new(config))
    }

    /// Renderer with an explicit colour policy.
    pub fn with_policy(page: &Page, config: &RenderConfig, policy: ColorPolicy) -> Self {
        Self {
            base: display_transform(page.width, page.height, config.rect, config.rotation),
            policy,
            flags: config.flags,
            text: TextRasterizer::new(),
        }
    }

    /// Page space to device space.
    pub fn base_transform(&self) -> Transform {
        self.base
    }

    /// The colour policy in use.
    pub fn policy(&self) -> &ColorPolicy {
        &self.policy
    }

    /// Paint one content object. `blend_override` replaces the object's
    /// blend mode (used for annotation appearances).
    pub fn paint_object<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        object: &PageObject,
        blend_override: Option<BlendMode>,
    ) -> Result<()> {
        let blend_mode = blend_override.unwrap_or_else(|| object.blend_mode());
        match object {
            PageObject::Path(path) => self.paint_path(backend, target, path, blend_mode),
            PageObject::Text(text) => self.paint_text(backend, target, text, blend_mode),
            PageObject::Image(image) => self.paint_image(backend, target, image, blend_mode),
            PageObject::Shading(shading) => self.paint_shading(backend, target, shading, blend_mode),
        }
    }

    /// Paint an annotation's appearance, composited with the annotation's
    /// blend mode.
    pub fn paint_annotation<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        annotation: &Annotation,
    ) -> Result<()> {
        for object in &annotation.appearance {
            let blend = annotation.effective_blend_mode(object);
            self.paint_object(backend, target, object, Some(blend))?;
        }
        Ok(())
    }

    fn paint_path<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        path: &PathObject,
        blend_mode: BlendMode,
    ) -> Result<()> {
        let transform = self.base.pre_concat(path.transform);
        let anti_alias = !self.flags.contains(RenderFlags::NO_SMOOTH_PATH);

        for paint in self.policy.path_paints(path) {
            match paint {
                PathPaint::Fill { color, rule } => {
                    let spec = PaintSpec {
                        color,
                        blend_mode,
                        anti_alias,
                    };
                    backend.fill_path(target, &path.path, &spec, rule, transform)?;
                },
                PathPaint::Stroke { color } => {
                    let spec = PaintSpec {
                        color,
                        blend_mode,
                        anti_alias,
                    };
                    backend.stroke_path(target, &path.path, &spec, &path.stroke_style, transform)?;
                },
            }
        }
        Ok(())
    }

    fn paint_text<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        text: &TextObject,
        blend_mode: BlendMode,
    ) -> Result<()> {
        let anti_alias = !self.flags.contains(RenderFlags::NO_SMOOTH_TEXT);
        let resolved = self.policy.text_paint(text);
        let spec = |color| PaintSpec {
            color,
            blend_mode,
            anti_alias,
        };
        let fill = resolved.fill.map(spec);
        let stroke = resolved.stroke.map(spec);
        self.text
            .render_text(backend, target, text, self.base, fill.as_ref(), stroke.as_ref())
    }

    fn paint_image<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        image: &ImageObject,
        blend_mode: BlendMode,
    ) -> Result<()> {
        if image.width == 0 || image.height == 0 {
            trace!("skipping empty {}x{} image {}", image.width, image.height, image.id);
            return Ok(());
        }
        // Pixel (u, v), top row first, lands on unit square (u/w, 1 - v/h).
        let pixel_to_unit = Transform::from_row(
            1.0 / image.width as f32,
            0.0,
            0.0,
            -1.0 / image.height as f32,
            0.0,
            1.0,
        );
        let transform = self.base.pre_concat(image.transform).pre_concat(pixel_to_unit);
        let smooth = !self.flags.contains(RenderFlags::NO_SMOOTH_IMAGE);
        backend.draw_image(target, image, blend_mode, smooth, transform)
    }

    fn paint_shading<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        shading: &ShadingObject,
        blend_mode: BlendMode,
    ) -> Result<()> {
        let transform = self.base.pre_concat(shading.transform);
        let anti_alias = !self.flags.contains(RenderFlags::NO_SMOOTH_PATH);
        match self.policy.shading_override(&shading.shading) {
            Some(color) => {
                let spec = PaintSpec {
                    color,
                    blend_mode,
                    anti_alias,
                };
                backend.fill_path(target, &shading.area, &spec, FillRule::NonZero, transform)
            },
            None => backend.fill_shading(
                target,
                &shading.area,
                &shading.shading,
                blend_mode,
                anti_alias,
                transform,
            ),
        }
    }
}
