//! Colour substitution policy.
//!
//! Decides the paint each page object is drawn with. Without a scheme the
//! native colours pass through. With a scheme, every path and text paint
//! is replaced by the entry for its role, keeping the native alpha; blend
//! modes are never touched. Images keep their pixels. Form widgets never
//! reach this policy.

use crate::color::{Argb, ColorScheme};
use crate::config::RenderConfig;
use crate::page::{Fill, FillRule, PathObject, Shading, TextObject};

/// The four roles a paint can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintRole {
    /// Interior of a path
    PathFill,
    /// Outline of a path
    PathStroke,
    /// Interior of glyphs
    TextFill,
    /// Outline of glyphs
    TextStroke,
}

impl PaintRole {
    /// The scheme entry for this role.
    pub fn pick(self, scheme: &ColorScheme) -> Argb {
        match self {
            PaintRole::PathFill => scheme.path_fill,
            PaintRole::PathStroke => scheme.path_stroke,
            PaintRole::TextFill => scheme.text_fill,
            PaintRole::TextStroke => scheme.text_stroke,
        }
    }
}

/// One paint operation a path turns into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPaint {
    /// Fill the outline
    Fill {
        /// Resolved colour
        color: Argb,
        /// Fill rule
        rule: FillRule,
    },
    /// Stroke the outline with the object's stroke style
    Stroke {
        /// Resolved colour
        color: Argb,
    },
}

/// Resolved paints of a text object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextPaint {
    /// Glyph fill colour, if glyphs are filled
    pub fill: Option<Argb>,
    /// Glyph stroke colour, if glyphs are stroked
    pub stroke: Option<Argb>,
}

/// Colour substitution policy for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorPolicy {
    scheme: Option<ColorScheme>,
    fill_to_stroke: bool,
}

impl ColorPolicy {
    /// Policy derived from a render configuration.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            scheme: config.color_scheme,
            fill_to_stroke: config.converts_fill_to_stroke(),
        }
    }

    /// Policy that keeps native colours.
    pub fn native() -> Self {
        Self::default()
    }

    /// True when a scheme overrides colours.
    pub fn is_active(&self) -> bool {
        self.scheme.is_some()
    }

    /// The active scheme.
    pub fn scheme(&self) -> Option<&ColorScheme> {
        self.scheme.as_ref()
    }

    /// Colour to paint with for `role`, given the object's own colour.
    ///
    /// The scheme supplies RGB and its alpha is multiplied by the native
    /// alpha, so a half-transparent fill stays half-transparent.
    pub fn resolve(&self, role: PaintRole, native: Argb) -> Argb {
        match &self.scheme {
            Some(scheme) => role.pick(scheme).modulate_alpha(native.alpha()),
            None => native,
        }
    }

    /// Paint operations for a path, in painting order (fill, then stroke).
    ///
    /// With fill-to-stroke conversion the fill is dropped and the outline is
    /// stroked once in the path-stroke colour. The native stroke alpha wins
    /// if the path was stroked already, otherwise the fill alpha is used.
    pub fn path_paints(&self, path: &PathObject) -> Vec<PathPaint> {
        let mut paints = Vec::with_capacity(2);
        match (path.fill, self.fill_to_stroke) {
            (Some(fill), true) => {
                let native = path.stroke.unwrap_or(fill.color);
                paints.push(PathPaint::Stroke {
                    color: self.resolve(PaintRole::PathStroke, native),
                });
                return paints;
            },
            (Some(Fill { color, rule }), false) => {
                paints.push(PathPaint::Fill {
                    color: self.resolve(PaintRole::PathFill, color),
                    rule,
                });
            },
            (None, _) => {},
        }
        if let Some(stroke) = path.stroke {
            paints.push(PathPaint::Stroke {
                color: self.resolve(PaintRole::PathStroke, stroke),
            });
        }
        paints
    }

    /// Paints for a text object according to its render mode.
    pub fn text_paint(&self, text: &TextObject) -> TextPaint {
        TextPaint {
            fill: text
                .render_mode
                .fills()
                .then(|| self.resolve(PaintRole::TextFill, text.fill_color)),
            stroke: text
                .render_mode
                .strokes()
                .then(|| self.resolve(PaintRole::TextStroke, text.stroke_color)),
        }
    }

    /// Flat colour replacing a shading, if a scheme is active.
    ///
    /// The native alpha is the most opaque stop, so a translucent ramp stays
    /// translucent.
    pub fn shading_override(&self, shading: &Shading) -> Option<Argb> {
        self.scheme.as_ref()?;
        let alpha = shading.stops().iter().map(|(_, c)| c.alpha()).max().unwrap_or(0xFF);
        Some(self.resolve(PaintRole::PathFill, Argb::BLACK.with_alpha(alpha)))
    }
}
