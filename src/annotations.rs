//! Page annotations with pre-built appearances.
//!
//! An annotation carries its normal appearance as a list of page objects
//! already placed in page space. Markup annotations (highlight, ink, stamp,
//! ...) are painted by the base pass when annotation rendering is enabled;
//! widget annotations belong to the form layer and are only painted by the
//! overlay compositor.

use crate::annotation_types::{AnnotationFlags, AnnotationSubtype};
use crate::geometry::Rect;
use crate::page::{BlendMode, PageObject};

/// An annotation and its normal appearance.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Annotation subtype
    pub subtype: AnnotationSubtype,
    /// Annotation rectangle in page space
    pub rect: Rect,
    /// Annotation flags (F entry)
    pub flags: AnnotationFlags,
    /// Blend mode applied to the whole appearance
    pub blend_mode: BlendMode,
    /// Normal appearance, in page space
    pub appearance: Vec<PageObject>,
}

impl Annotation {
    /// Create an annotation with the subtype's default blend mode and no appearance.
    pub fn new(subtype: AnnotationSubtype, rect: Rect) -> Self {
        Self {
            subtype,
            rect,
            flags: AnnotationFlags::printable(),
            blend_mode: subtype.default_blend_mode(),
            appearance: Vec::new(),
        }
    }

    /// Append an appearance object.
    pub fn with_appearance(mut self, object: impl Into<PageObject>) -> Self {
        self.appearance.push(object.into());
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: AnnotationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Override the blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Blend mode an appearance object is composited with.
    ///
    /// A non-normal annotation blend mode wins over the object's own.
    pub fn effective_blend_mode(&self, object: &PageObject) -> BlendMode {
        if self.blend_mode != BlendMode::Normal {
            self.blend_mode
        } else {
            object.blend_mode()
        }
    }

    /// Whether the annotation takes part in the base content pass.
    pub fn is_base_content(&self, printing: bool) -> bool {
        !self.subtype.is_widget() && self.flags.is_rendered(printing)
    }
}
