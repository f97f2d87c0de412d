//! Core annotation types and enums per ISO 32000-1:2008, Section 12.5.
//!
//! Only the parts the renderer needs: the subtype (which decides blend mode
//! and whether the annotation belongs to the form layer) and the flags
//! (which decide visibility).

use bitflags::bitflags;

use crate::page::BlendMode;

/// Annotation subtype per ISO 32000-1 Table 169.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationSubtype {
    /// Text annotation (sticky note) - Section 12.5.6.4
    Text,
    /// Link annotation - Section 12.5.6.5
    Link,
    /// Free text annotation - Section 12.5.6.6
    FreeText,
    /// Line annotation - Section 12.5.6.7
    Line,
    /// Square annotation - Section 12.5.6.8
    Square,
    /// Circle annotation - Section 12.5.6.8
    Circle,
    /// Polygon annotation - Section 12.5.6.9
    Polygon,
    /// Polyline annotation - Section 12.5.6.9
    PolyLine,
    /// Highlight annotation - Section 12.5.6.10
    Highlight,
    /// Underline annotation - Section 12.5.6.10
    Underline,
    /// Squiggly underline annotation - Section 12.5.6.10
    Squiggly,
    /// Strikeout annotation - Section 12.5.6.10
    StrikeOut,
    /// Rubber stamp annotation - Section 12.5.6.12
    Stamp,
    /// Caret annotation - Section 12.5.6.11
    Caret,
    /// Ink annotation - Section 12.5.6.13
    Ink,
    /// Popup annotation - Section 12.5.6.14
    Popup,
    /// File attachment annotation - Section 12.5.6.15
    FileAttachment,
    /// Widget annotation (form field) - Section 12.5.6.19
    Widget,
    /// Redaction annotation - Section 12.5.6.23
    Redact,
    /// Unknown annotation type
    Unknown,
}

impl AnnotationSubtype {
    /// Get the PDF name for this annotation subtype.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Link => "Link",
            Self::FreeText => "FreeText",
            Self::Line => "Line",
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
            Self::PolyLine => "PolyLine",
            Self::Highlight => "Highlight",
            Self::Underline => "Underline",
            Self::Squiggly => "Squiggly",
            Self::StrikeOut => "StrikeOut",
            Self::Stamp => "Stamp",
            Self::Caret => "Caret",
            Self::Ink => "Ink",
            Self::Popup => "Popup",
            Self::FileAttachment => "FileAttachment",
            Self::Widget => "Widget",
            Self::Redact => "Redact",
            Self::Unknown => "Unknown",
        }
    }

    /// Check if this annotation belongs to the interactive form layer.
    pub fn is_widget(&self) -> bool {
        matches!(self, Self::Widget)
    }

    /// Blend mode used to composite the appearance when the annotation
    /// does not specify one. Highlights multiply so the marked content
    /// stays readable underneath.
    pub fn default_blend_mode(&self) -> BlendMode {
        match self {
            Self::Highlight => BlendMode::Multiply,
            _ => BlendMode::Normal,
        }
    }
}

bitflags! {
    /// Annotation flags per ISO 32000-1 Table 165.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AnnotationFlags: u32 {
        /// Bit 1: Do not display an unknown annotation without appearance
        const INVISIBLE = 1 << 0;
        /// Bit 2: Do not display or print
        const HIDDEN = 1 << 1;
        /// Bit 3: Print the annotation when printing
        const PRINT = 1 << 2;
        /// Bit 4: Do not scale with page zoom
        const NO_ZOOM = 1 << 3;
        /// Bit 5: Do not rotate with page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: Do not display on screen
        const NO_VIEW = 1 << 5;
        /// Bit 7: Do not allow interaction
        const READ_ONLY = 1 << 6;
        /// Bit 8: Do not allow deletion or modification
        const LOCKED = 1 << 7;
        /// Bit 9: Invert NoView on mouse events
        const TOGGLE_NO_VIEW = 1 << 8;
        /// Bit 10: Do not allow content modification
        const LOCKED_CONTENTS = 1 << 9;
    }
}

impl AnnotationFlags {
    /// Default flags for printable annotations.
    pub fn printable() -> Self {
        Self::PRINT
    }

    /// Whether an annotation with these flags is painted.
    ///
    /// Hidden annotations are never painted. On screen, NoView hides the
    /// annotation; when printing, only annotations with Print are painted.
    pub fn is_rendered(&self, printing: bool) -> bool {
        if self.contains(Self::HIDDEN) {
            return false;
        }
        if printing {
            self.contains(Self::PRINT)
        } else {
            !self.contains(Self::NO_VIEW)
        }
    }
}
