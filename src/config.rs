//! Render configuration.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::color::{Argb, ColorScheme};
use crate::geometry::{DeviceRect, Rotation};

/// Work units painted between two pause checks when nothing else is configured.
pub const DEFAULT_STEP_LIMIT: usize = 100;

bitflags! {
    /// Render flags.
    ///
    /// Bit values match the `FPDF_*` rendering flags so raw integers coming
    /// from an embedding host can be converted with `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderFlags: u32 {
        /// Render annotation appearances
        const ANNOT = 0x01;
        /// Use LCD text rendering (backend hint)
        const LCD_TEXT = 0x02;
        /// Do not use native text output (backend hint)
        const NO_NATIVE_TEXT = 0x04;
        /// Grayscale output (backend hint)
        const GRAYSCALE = 0x08;
        /// Host bitmap uses BGRA byte order (backend hint)
        const REVERSE_BYTE_ORDER = 0x10;
        /// Rewrite fill operations as strokes while a colour scheme is active
        const CONVERT_FILL_TO_STROKE = 0x20;
        /// Bound the memory used by the decoded image cache
        const LIMITED_IMAGE_CACHE = 0x200;
        /// Always use halftone for image stretching (backend hint)
        const FORCE_HALFTONE = 0x400;
        /// Render for printing: honour the annotation Print flag instead of NoView
        const PRINTING = 0x800;
        /// Disable anti-aliasing on text
        const NO_SMOOTH_TEXT = 0x1000;
        /// Disable smoothing on images
        const NO_SMOOTH_IMAGE = 0x2000;
        /// Disable anti-aliasing on paths
        const NO_SMOOTH_PATH = 0x4000;
    }
}

/// Configuration for one render session.
///
/// Built once and handed to [`RenderSession::start`](crate::rendering::RenderSession::start);
/// the session never changes it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Device rectangle the page is mapped onto
    pub rect: DeviceRect,
    /// Clockwise page rotation
    pub rotation: Rotation,
    /// Render flags
    pub flags: RenderFlags,
    /// Forced colour scheme (None keeps native colours)
    pub color_scheme: Option<ColorScheme>,
    /// Explicit background colour (None picks transparent or white from the target)
    pub background: Option<Argb>,
    /// Work units painted between pause checks
    pub step_limit: NonZeroUsize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(DeviceRect::default())
    }
}

impl RenderConfig {
    /// Create a configuration for the given device rectangle.
    pub fn new(rect: DeviceRect) -> Self {
        Self {
            rect,
            rotation: Rotation::None,
            flags: RenderFlags::empty(),
            color_scheme: None,
            background: None,
            step_limit: NonZeroUsize::new(DEFAULT_STEP_LIMIT).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Create a configuration covering a whole `width` x `height` target.
    pub fn for_size(width: u32, height: u32) -> Self {
        Self::new(DeviceRect::from_size(width, height))
    }

    /// Set the page rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the render flags.
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Force a colour scheme.
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = Some(scheme);
        self
    }

    /// Fill the target with an explicit colour before painting.
    pub fn with_background(mut self, color: Argb) -> Self {
        self.background = Some(color);
        self
    }

    /// Set how many work units are painted between pause checks.
    ///
    /// Zero is clamped to one.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = NonZeroUsize::new(limit).unwrap_or(NonZeroUsize::MIN);
        self
    }

    /// True when annotation appearances take part in the base pass.
    pub fn renders_annotations(&self) -> bool {
        self.flags.contains(RenderFlags::ANNOT)
    }

    /// True when fills are rewritten as strokes.
    ///
    /// Conversion only happens under a forced colour scheme.
    pub fn converts_fill_to_stroke(&self) -> bool {
        self.color_scheme.is_some() && self.flags.contains(RenderFlags::CONVERT_FILL_TO_STROKE)
    }
}
