//! Page object model consumed by the renderer.
//!
//! A [`Page`] is an already-parsed list of drawable objects plus its
//! annotations. Parsing, font shaping and image decoding happen elsewhere:
//! text arrives as positioned glyph outlines and images arrive as decoded
//! RGBA pixels. The renderer only ever reads these values.

use tiny_skia::{Path, PathBuilder, Transform};

use crate::annotations::Annotation;
use crate::color::Argb;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};

/// Pixel compositing function used when painting over existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Source over destination
    #[default]
    Normal,
    /// Multiply
    Multiply,
    /// Screen
    Screen,
    /// Overlay
    Overlay,
    /// Darken
    Darken,
    /// Lighten
    Lighten,
    /// Color dodge
    ColorDodge,
    /// Color burn
    ColorBurn,
    /// Hard light
    HardLight,
    /// Soft light
    SoftLight,
    /// Difference
    Difference,
    /// Exclusion
    Exclusion,
}

impl BlendMode {
    /// Convert to the tiny-skia blend mode.
    pub fn to_skia(self) -> tiny_skia::BlendMode {
        match self {
            BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
            BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
            BlendMode::Screen => tiny_skia::BlendMode::Screen,
            BlendMode::Overlay => tiny_skia::BlendMode::Overlay,
            BlendMode::Darken => tiny_skia::BlendMode::Darken,
            BlendMode::Lighten => tiny_skia::BlendMode::Lighten,
            BlendMode::ColorDodge => tiny_skia::BlendMode::ColorDodge,
            BlendMode::ColorBurn => tiny_skia::BlendMode::ColorBurn,
            BlendMode::HardLight => tiny_skia::BlendMode::HardLight,
            BlendMode::SoftLight => tiny_skia::BlendMode::SoftLight,
            BlendMode::Difference => tiny_skia::BlendMode::Difference,
            BlendMode::Exclusion => tiny_skia::BlendMode::Exclusion,
        }
    }
}

/// Fill rule for path filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillRule {
    /// Nonzero winding number
    #[default]
    NonZero,
    /// Even-odd
    EvenOdd,
}

impl FillRule {
    pub(crate) fn to_skia(self) -> tiny_skia::FillRule {
        match self {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineCap {
    /// Butt cap
    #[default]
    Butt,
    /// Round cap
    Round,
    /// Projecting square cap
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineJoin {
    /// Miter join
    #[default]
    Miter,
    /// Round join
    Round,
    /// Bevel join
    Bevel,
}

/// Stroke geometry parameters, in the object's own space.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Line width
    pub width: f32,
    /// Line cap
    pub line_cap: LineCap,
    /// Line join
    pub line_join: LineJoin,
    /// Miter limit
    pub miter_limit: f32,
    /// Dash array and phase (empty array = solid)
    pub dash: (Vec<f32>, f32),
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: (Vec::new(), 0.0),
        }
    }
}

impl StrokeStyle {
    /// Solid stroke of the given width.
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }
}

/// Fill paint of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    /// Fill colour, alpha is the fill opacity
    pub color: Argb,
    /// Fill rule
    pub rule: FillRule,
}

/// A vector path.
#[derive(Debug, Clone)]
pub struct PathObject {
    /// Outline in object space
    pub path: Path,
    /// Object space to page space
    pub transform: Transform,
    /// Fill paint, if the path is filled
    pub fill: Option<Fill>,
    /// Stroke colour, if the path is stroked
    pub stroke: Option<Argb>,
    /// Stroke geometry, also used when a fill is converted to a stroke
    pub stroke_style: StrokeStyle,
    /// Blend mode
    pub blend_mode: BlendMode,
}

impl PathObject {
    /// A path with no paint yet.
    pub fn new(path: Path) -> Self {
        Self {
            path,
            transform: Transform::identity(),
            fill: None,
            stroke: None,
            stroke_style: StrokeStyle::default(),
            blend_mode: BlendMode::Normal,
        }
    }

    /// A filled rectangle, or None if the rectangle is degenerate.
    pub fn filled_rect(rect: Rect, color: Argb) -> Option<Self> {
        Some(Self::new(PathBuilder::from_rect(rect.to_skia()?)).with_fill(color))
    }

    /// A stroked rectangle outline, or None if the rectangle is degenerate.
    pub fn stroked_rect(rect: Rect, color: Argb, width: f32) -> Option<Self> {
        Some(
            Self::new(PathBuilder::from_rect(rect.to_skia()?))
                .with_stroke(color, StrokeStyle::with_width(width)),
        )
    }

    /// Fill with the nonzero rule.
    pub fn with_fill(mut self, color: Argb) -> Self {
        self.fill = Some(Fill {
            color,
            rule: FillRule::NonZero,
        });
        self
    }

    /// Fill with an explicit rule.
    pub fn with_fill_rule(mut self, color: Argb, rule: FillRule) -> Self {
        self.fill = Some(Fill { color, rule });
        self
    }

    /// Stroke with the given colour and geometry.
    pub fn with_stroke(mut self, color: Argb, style: StrokeStyle) -> Self {
        self.stroke = Some(color);
        self.stroke_style = style;
        self
    }

    /// Set the stroke geometry without enabling a stroke.
    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.stroke_style = style;
        self
    }

    /// Set the blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Set the object-to-page transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Text rendering mode (Tr operator), limited to the painting modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextRenderMode {
    /// Fill glyphs
    #[default]
    Fill,
    /// Stroke glyph outlines
    Stroke,
    /// Fill, then stroke
    FillStroke,
    /// Paint nothing
    Invisible,
}

impl TextRenderMode {
    /// Whether glyphs are filled.
    pub fn fills(self) -> bool {
        matches!(self, TextRenderMode::Fill | TextRenderMode::FillStroke)
    }

    /// Whether glyphs are stroked.
    pub fn strokes(self) -> bool {
        matches!(self, TextRenderMode::Stroke | TextRenderMode::FillStroke)
    }
}

/// A shaped glyph: outline in em units (y up) placed at an origin in text space.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Glyph outline, one unit = one em
    pub outline: Path,
    /// Origin x in text space
    pub x: f32,
    /// Origin y in text space
    pub y: f32,
}

impl Glyph {
    /// Place an outline at a text-space origin.
    pub fn new(outline: Path, x: f32, y: f32) -> Self {
        Self { outline, x, y }
    }
}

/// A run of shaped text.
#[derive(Debug, Clone)]
pub struct TextObject {
    /// Glyphs in drawing order
    pub glyphs: Vec<Glyph>,
    /// Font size in text space units per em
    pub font_size: f32,
    /// Text space to page space
    pub transform: Transform,
    /// Painting mode
    pub render_mode: TextRenderMode,
    /// Fill colour
    pub fill_color: Argb,
    /// Stroke colour
    pub stroke_color: Argb,
    /// Stroke geometry for stroking modes
    pub stroke_style: StrokeStyle,
    /// Blend mode
    pub blend_mode: BlendMode,
}

impl TextObject {
    /// Filled black text.
    pub fn new(glyphs: Vec<Glyph>, font_size: f32) -> Self {
        Self {
            glyphs,
            font_size,
            transform: Transform::identity(),
            render_mode: TextRenderMode::Fill,
            fill_color: Argb::BLACK,
            stroke_color: Argb::BLACK,
            stroke_style: StrokeStyle::default(),
            blend_mode: BlendMode::Normal,
        }
    }

    /// Set the fill colour.
    pub fn with_fill_color(mut self, color: Argb) -> Self {
        self.fill_color = color;
        self
    }

    /// Set the stroke colour and mode.
    pub fn with_stroke(mut self, color: Argb, mode: TextRenderMode) -> Self {
        self.stroke_color = color;
        self.render_mode = mode;
        self
    }

    /// Set the text-to-page transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// A decoded raster image.
#[derive(Debug, Clone)]
pub struct ImageObject {
    /// Stable identity used as the decoded-image cache key
    pub id: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Straight (non-premultiplied) RGBA8 pixels, row-major, top row first
    pub pixels: Vec<u8>,
    /// Unit square to page space (the PDF image matrix)
    pub transform: Transform,
    /// Constant opacity applied on top of per-pixel alpha
    pub opacity: u8,
    /// Blend mode
    pub blend_mode: BlendMode,
}

impl ImageObject {
    /// An opaque image placed by `transform`.
    pub fn new(id: u64, width: u32, height: u32, pixels: Vec<u8>, transform: Transform) -> Self {
        Self {
            id,
            width,
            height,
            pixels,
            transform,
            opacity: 0xFF,
            blend_mode: BlendMode::Normal,
        }
    }

    /// An image covering `rect` in page space.
    pub fn placed(id: u64, width: u32, height: u32, pixels: Vec<u8>, rect: Rect) -> Self {
        let transform = Transform::from_row(rect.width, 0.0, 0.0, rect.height, rect.x, rect.y);
        Self::new(id, width, height, pixels, transform)
    }

    /// Size of the decoded pixels in bytes.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// True if any pixel or the constant opacity is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.opacity != 0xFF || self.pixels.chunks_exact(4).any(|px| px[3] != 0xFF)
    }
}

/// A colour ramp of a shading.
#[derive(Debug, Clone, PartialEq)]
pub enum Shading {
    /// Linear gradient between two points
    Axial {
        /// Start point
        start: Point,
        /// End point
        end: Point,
        /// Stops as (offset 0..=1, colour)
        stops: Vec<(f32, Argb)>,
    },
    /// Radial gradient around a centre
    Radial {
        /// Centre point
        center: Point,
        /// Radius
        radius: f32,
        /// Stops as (offset 0..=1, colour)
        stops: Vec<(f32, Argb)>,
    },
}

impl Shading {
    /// Colour stops of the ramp.
    pub fn stops(&self) -> &[(f32, Argb)] {
        match self {
            Shading::Axial { stops, .. } | Shading::Radial { stops, .. } => stops,
        }
    }
}

/// A shading painted over an area (the `sh` operator clipped to a path).
#[derive(Debug, Clone)]
pub struct ShadingObject {
    /// Area covered by the shading, in object space
    pub area: Path,
    /// Colour ramp, in object space
    pub shading: Shading,
    /// Object space to page space
    pub transform: Transform,
    /// Blend mode
    pub blend_mode: BlendMode,
}

impl ShadingObject {
    /// A shading covering `area`.
    pub fn new(area: Path, shading: Shading) -> Self {
        Self {
            area,
            shading,
            transform: Transform::identity(),
            blend_mode: BlendMode::Normal,
        }
    }
}

/// One drawable element of a page.
#[derive(Debug, Clone)]
pub enum PageObject {
    /// Vector path
    Path(PathObject),
    /// Text run
    Text(TextObject),
    /// Raster image
    Image(ImageObject),
    /// Smooth shading
    Shading(ShadingObject),
}

impl PageObject {
    /// Short name of the object kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PageObject::Path(_) => "path",
            PageObject::Text(_) => "text",
            PageObject::Image(_) => "image",
            PageObject::Shading(_) => "shading",
        }
    }

    /// Blend mode of the object.
    pub fn blend_mode(&self) -> BlendMode {
        match self {
            PageObject::Path(p) => p.blend_mode,
            PageObject::Text(t) => t.blend_mode,
            PageObject::Image(i) => i.blend_mode,
            PageObject::Shading(s) => s.blend_mode,
        }
    }

    /// True if painting this object needs a transparency-capable target.
    pub fn has_transparency(&self) -> bool {
        if self.blend_mode() != BlendMode::Normal {
            return true;
        }
        match self {
            PageObject::Path(p) => {
                p.fill.is_some_and(|f| f.color.alpha() != 0xFF)
                    || p.stroke.is_some_and(|c| c.alpha() != 0xFF)
            },
            PageObject::Text(t) => {
                (t.render_mode.fills() && t.fill_color.alpha() != 0xFF)
                    || (t.render_mode.strokes() && t.stroke_color.alpha() != 0xFF)
            },
            PageObject::Image(i) => i.has_transparency(),
            PageObject::Shading(s) => s.shading.stops().iter().any(|(_, c)| c.alpha() != 0xFF),
        }
    }
}

impl From<PathObject> for PageObject {
    fn from(obj: PathObject) -> Self {
        PageObject::Path(obj)
    }
}

impl From<TextObject> for PageObject {
    fn from(obj: TextObject) -> Self {
        PageObject::Text(obj)
    }
}

impl From<ImageObject> for PageObject {
    fn from(obj: ImageObject) -> Self {
        PageObject::Image(obj)
    }
}

impl From<ShadingObject> for PageObject {
    fn from(obj: ShadingObject) -> Self {
        PageObject::Shading(obj)
    }
}

/// A parsed page: size, content objects and annotations.
#[derive(Debug, Clone)]
pub struct Page {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
    /// Content objects in document order
    pub objects: Vec<PageObject>,
    /// Annotations in page order, widgets included
    pub annotations: Vec<Annotation>,
}

impl Page {
    /// An empty page of the given size in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            objects: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Append a content object.
    pub fn push(&mut self, object: impl Into<PageObject>) -> &mut Self {
        self.objects.push(object.into());
        self
    }

    /// Append an annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Check that the page has a usable, finite size.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidArgument(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Whether rendering this page needs an alpha-capable target.
    ///
    /// Mirrors `FPDFPage_HasTransparency`: true if any content object or
    /// annotation appearance uses non-opaque paint or a non-normal blend.
    pub fn has_transparency(&self) -> bool {
        self.objects.iter().any(PageObject::has_transparency)
            || self.annotations.iter().any(|a| {
                a.blend_mode != BlendMode::Normal || a.appearance.iter().any(PageObject::has_transparency)
            })
    }

    /// Widget (form field) annotations of the page.
    pub fn widgets(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| a.subtype.is_widget())
    }
}
