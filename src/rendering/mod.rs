//! Progressive page rendering.
//!
//! This module turns a [`Page`](crate::page::Page) into pixels in resumable
//! increments using the pure-Rust `tiny-skia` library.
//!
//! ## Features
//!
//! - Pausable rendering driven by a caller-supplied [`PauseController`]
//! - Forced four-role colour schemes, optionally turning fills into strokes
//! - Annotation appearances with their own blend modes
//! - Form widgets composited last, in native colours
//!
//! ## Architecture
//!
//! The rendering pipeline:
//!
//! 1. [`RenderSession::start`] validates the target and builds the work list
//! 2. The background is painted, then objects in batches of `step_limit`
//! 3. Each object passes through the [`ColorPolicy`] and is painted by a
//!    [`RasterBackend`]
//! 4. After `Done`, [`RenderSession::draw_form_overlay`] paints the form layer
//! 5. [`RenderSession::close`] hands the [`RenderTarget`] back

mod backend;
mod color_policy;
mod image_cache;
mod overlay;
mod page_renderer;
mod path_rasterizer;
mod pause;
mod session;
mod target;
mod text_rasterizer;

pub use backend::{RasterBackend, SkiaBackend};
pub use color_policy::{ColorPolicy, PaintRole, PathPaint, TextPaint};
pub use image_cache::{ImageCache, LIMITED_CACHE_BYTES};
pub use overlay::{FormHandle, FormLayer, OverlayCompositor};
pub use page_renderer::PageRenderer;
pub use path_rasterizer::PathRasterizer;
pub use pause::{AlwaysPause, NeverPause, PauseController, PauseEvery};
pub use session::{validate, Continuation, RenderSession, RenderStatus, SessionState};
pub use target::RenderTarget;
pub use text_rasterizer::TextRasterizer;

use crate::color::Argb;
use crate::page::BlendMode;
use tiny_skia::Paint;

/// A resolved solid paint handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintSpec {
    /// Colour, straight alpha
    pub color: Argb,
    /// Compositing function
    pub blend_mode: BlendMode,
    /// Whether edges are anti-aliased
    pub anti_alias: bool,
}

impl PaintSpec {
    /// Anti-aliased, normal-blended paint.
    pub fn new(color: Argb) -> Self {
        Self {
            color,
            blend_mode: BlendMode::Normal,
            anti_alias: true,
        }
    }
}

/// Create a tiny-skia Paint for a solid paint spec.
pub(crate) fn create_paint(spec: &PaintSpec) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(spec.color.to_skia());
    paint.anti_alias = spec.anti_alias;

    if spec.blend_mode != BlendMode::Normal {
        paint.blend_mode = spec.blend_mode.to_skia();
    }

    paint
}
