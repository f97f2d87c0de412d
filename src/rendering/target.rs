//! Render target - the pixel buffer a session paints into.

use md5::{Digest, Md5};
use tiny_skia::{Paint, Pixmap};

use crate::color::Argb;
use crate::error::{Error, Result};

/// A fixed-size RGBA pixel buffer.
///
/// Pixels are stored premultiplied, row-major, top row first. A target
/// without an alpha channel always stays opaque: any colour written as
/// background is forced to full alpha.
#[derive(Clone)]
pub struct RenderTarget {
    pixmap: Pixmap,
    has_alpha: bool,
}

impl RenderTarget {
    /// Allocate a zero-filled target.
    pub fn new(width: u32, height: u32, has_alpha: bool) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::InvalidArgument(format!("cannot allocate a {}x{} render target", width, height))
        })?;
        Ok(Self { pixmap, has_alpha })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Whether the target carries a transparency channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Background used when the configuration does not name one:
    /// transparent for alpha targets, opaque white otherwise.
    pub fn default_background(&self) -> Argb {
        if self.has_alpha {
            Argb::TRANSPARENT
        } else {
            Argb::WHITE
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Argb) {
        let color = self.storable(color);
        self.pixmap.fill(color.to_skia());
    }

    /// Overwrite a rectangle with `color`, without blending.
    ///
    /// The rectangle is clipped to the target; nothing happens if it lies
    /// entirely outside.
    pub fn fill_rect(&mut self, left: i32, top: i32, width: u32, height: u32, color: Argb) {
        let rect = match tiny_skia::Rect::from_xywh(
            left as f32,
            top as f32,
            width as f32,
            height as f32,
        ) {
            Some(rect) => rect,
            None => return,
        };
        let mut paint = Paint::default();
        paint.set_color(self.storable(color).to_skia());
        paint.blend_mode = tiny_skia::BlendMode::Source;
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
    }

    /// Read one pixel as a straight (non-premultiplied) colour.
    ///
    /// `None` outside the target.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Argb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| Argb::from(p.demultiply()))
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Lowercase hex MD5 of the raw pixel bytes.
    ///
    /// Two targets with the same size and checksum hold the same image.
    pub fn checksum(&self) -> String {
        format!("{:x}", Md5::digest(self.pixmap.data()))
    }

    /// Encode the target as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::backend(format!("PNG encoding failed: {}", e)))
    }

    /// Count pixels equal to `color` (compared after demultiplying).
    pub fn count_pixels(&self, color: Argb) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .filter(|p| Argb::from(p.demultiply()) == color)
            .count()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    fn storable(&self, color: Argb) -> Argb {
        if self.has_alpha {
            color
        } else {
            color.opaque()
        }
    }
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("has_alpha", &self.has_alpha)
            .finish()
    }
}
