//! Geometric primitives shared by the page model and the renderer.
//!
//! Page space is PDF user space: points, origin at the bottom-left corner,
//! y growing upwards. Device space is the pixel grid of a render target:
//! origin at the top-left, y growing downwards.

use serde::{Deserialize, Serialize};
use tiny_skia::Transform;

use crate::error::{Error, Result};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_progressive::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its lower-left corner and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_progressive::geometry::Rect;
    ///
    /// let rect = Rect::from_points(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (page space grows upwards).
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert into a tiny-skia rectangle. Empty rectangles give None.
    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        if self.is_empty() {
            return None;
        }
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// The device-space rectangle a page is mapped onto.
///
/// `x`/`y` pan the page inside the target; `width`/`height` are the
/// device extent of the whole page and must match the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeviceRect {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DeviceRect {
    /// Create a new device rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Page rotation in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Upright
    #[default]
    None,
    /// 90 degrees clockwise
    Clockwise90,
    /// 180 degrees
    Rotate180,
    /// 270 degrees clockwise (90 counter-clockwise)
    Clockwise270,
}

impl Rotation {
    /// Parse a rotation from a quarter-turn count (0..=3).
    pub fn from_quarter_turns(turns: u8) -> Result<Self> {
        match turns {
            0 => Ok(Rotation::None),
            1 => Ok(Rotation::Clockwise90),
            2 => Ok(Rotation::Rotate180),
            3 => Ok(Rotation::Clockwise270),
            other => Err(Error::InvalidArgument(format!(
                "rotation must be 0..=3 quarter turns, got {}",
                other
            ))),
        }
    }

    /// Number of clockwise quarter turns.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Rotate180 => 2,
            Rotation::Clockwise270 => 3,
        }
    }

    /// True for 90 and 270 degree rotations, which swap the page axes.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Build the page-space to device-space matrix.
///
/// The page (`page_width` x `page_height` points) is rotated clockwise by
/// `rotation` and scaled to fill `rect`. Page y points up, device y points
/// down.
pub fn display_transform(
    page_width: f32,
    page_height: f32,
    rect: DeviceRect,
    rotation: Rotation,
) -> Transform {
    let x0 = rect.x as f32;
    let y0 = rect.y as f32;
    let w = rect.width as f32;
    let h = rect.height as f32;

    // from_row(sx, ky, kx, sy, tx, ty): x' = sx*x + kx*y + tx, y' = ky*x + sy*y + ty
    match rotation {
        Rotation::None => {
            Transform::from_row(w / page_width, 0.0, 0.0, -h / page_height, x0, y0 + h)
        },
        Rotation::Clockwise90 => {
            Transform::from_row(0.0, h / page_width, w / page_height, 0.0, x0, y0)
        },
        Rotation::Rotate180 => {
            Transform::from_row(-w / page_width, 0.0, 0.0, h / page_height, x0 + w, y0)
        },
        Rotation::Clockwise270 => {
            Transform::from_row(0.0, -h / page_width, -w / page_height, 0.0, x0 + w, y0 + h)
        },
    }
}
