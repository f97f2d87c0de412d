//! Overlay compositor - paints form widgets over a finished page.
//!
//! Widgets are interactive chrome, not page content: they are painted with
//! their native colours whatever scheme the base pass used, in the same
//! device rectangle and rotation.

use log::{trace, warn};

use super::backend::RasterBackend;
use super::color_policy::ColorPolicy;
use super::page_renderer::PageRenderer;
use super::target::RenderTarget;
use super::PaintSpec;
use crate::annotations::Annotation;
use crate::color::Argb;
use crate::config::{RenderConfig, RenderFlags};
use crate::error::Result;
use crate::page::{FillRule, Page};

/// Source of widget appearances for a page.
pub trait FormLayer {
    /// Widgets to paint, in painting order.
    fn widgets<'a>(&'a self, page: &'a Page) -> Vec<&'a Annotation>;

    /// Colour painted under every widget, if any.
    fn highlight(&self) -> Option<Argb> {
        None
    }
}

/// Form layer over a page's own widget annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormHandle {
    highlight: Option<Argb>,
}

impl FormHandle {
    /// A handle without field highlighting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `color` (alpha included) under every widget.
    pub fn with_highlight(mut self, color: Argb) -> Self {
        self.highlight = Some(color);
        self
    }
}

impl FormLayer for FormHandle {
    fn widgets<'a>(&'a self, page: &'a Page) -> Vec<&'a Annotation> {
        page.widgets().collect()
    }

    fn highlight(&self) -> Option<Argb> {
        self.highlight
    }
}

/// Paints a form layer for one page and configuration.
pub struct OverlayCompositor<'a> {
    page: &'a Page,
    renderer: PageRenderer,
    printing: bool,
    anti_alias: bool,
}

impl<'a> OverlayCompositor<'a> {
    /// Compositor using the page's display transform and native colours.
    pub fn new(page: &'a Page, config: &RenderConfig) -> Self {
        Self {
            page,
            renderer: PageRenderer::with_policy(page, config, ColorPolicy::native()),
            printing: config.flags.contains(RenderFlags::PRINTING),
            anti_alias: !config.flags.contains(RenderFlags::NO_SMOOTH_PATH),
        }
    }

    /// Paint every visible widget. Returns how many were painted.
    pub fn composite<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        forms: &dyn FormLayer,
    ) -> Result<usize> {
        let highlight = forms.highlight();
        let mut drawn = 0;
        for widget in forms.widgets(self.page) {
            if !widget.flags.is_rendered(self.printing) {
                warn!("skipping widget at {:?}: flags {:?}", widget.rect, widget.flags);
                continue;
            }
            if let Some(color) = highlight {
                self.paint_highlight(backend, target, widget, color)?;
            }
            trace!("painting widget {} at {:?}", drawn, widget.rect);
            self.renderer.paint_annotation(backend, target, widget)?;
            drawn += 1;
        }
        Ok(drawn)
    }

    fn paint_highlight<B: RasterBackend + ?Sized>(
        &self,
        backend: &mut B,
        target: &mut RenderTarget,
        widget: &Annotation,
        color: Argb,
    ) -> Result<()> {
        let rect = match widget.rect.to_skia() {
            Some(rect) => rect,
            None => return Ok(()),
        };
        let path = tiny_skia::PathBuilder::from_rect(rect);
        let spec = PaintSpec {
            anti_alias: self.anti_alias,
            ..PaintSpec::new(color)
        };
        backend.fill_path(target, &path, &spec, FillRule::NonZero, self.renderer.base_transform())
    }
}
