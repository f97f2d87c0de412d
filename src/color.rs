//! Colours and forced colour schemes.
//!
//! Colours are packed `0xAARRGGBB` values, the layout PDFium uses for
//! `FX_ARGB` and `FPDF_COLORSCHEME`, so values can be passed through from
//! an embedding host unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A packed, non-premultiplied `0xAARRGGBB` colour.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    /// Opaque black
    pub const BLACK: Argb = Argb(0xFF00_0000);
    /// Opaque white
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    /// Opaque red
    pub const RED: Argb = Argb(0xFFFF_0000);
    /// Opaque green
    pub const GREEN: Argb = Argb(0xFF00_FF00);
    /// Opaque blue
    pub const BLUE: Argb = Argb(0xFF00_00FF);

    /// Build a colour from separate channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_progressive::color::Argb;
    ///
    /// let c = Argb::from_rgba8(0x12, 0x34, 0x56, 0x78);
    /// assert_eq!(c, Argb(0x7812_3456));
    /// assert_eq!(c.alpha(), 0x78);
    /// ```
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Argb(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Opaque colour from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 0xFF)
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::from_rgba8(self.red(), self.green(), self.blue(), alpha)
    }

    /// Same colour with alpha forced to 255.
    pub const fn opaque(self) -> Self {
        self.with_alpha(0xFF)
    }

    /// Multiply this colour's alpha by another alpha value.
    pub fn modulate_alpha(self, alpha: u8) -> Self {
        let combined = (self.alpha() as u32 * alpha as u32 + 127) / 255;
        self.with_alpha(combined as u8)
    }

    /// Convert into a tiny-skia colour.
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.red(), self.green(), self.blue(), self.alpha())
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Argb(0x{:08X})", self.0)
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Argb(value)
    }
}

impl From<tiny_skia::ColorU8> for Argb {
    fn from(c: tiny_skia::ColorU8) -> Self {
        Argb::from_rgba8(c.red(), c.green(), c.blue(), c.alpha())
    }
}

/// Four role-keyed override colours.
///
/// When a scheme is active every path and text object is painted with the
/// entry matching its role instead of its own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorScheme {
    /// Fill colour for path objects
    pub path_fill: Argb,
    /// Stroke colour for path objects
    pub path_stroke: Argb,
    /// Fill colour for text objects
    pub text_fill: Argb,
    /// Stroke colour for text objects
    pub text_stroke: Argb,
}

impl ColorScheme {
    /// Create a scheme in `FPDF_COLORSCHEME` field order.
    pub fn new(path_fill: Argb, path_stroke: Argb, text_fill: Argb, text_stroke: Argb) -> Self {
        Self {
            path_fill,
            path_stroke,
            text_fill,
            text_stroke,
        }
    }

    /// A scheme using one colour for every role.
    pub fn uniform(color: Argb) -> Self {
        Self::new(color, color, color, color)
    }
}
