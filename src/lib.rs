// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Progressive
//!
//! Progressive (pausable) page rasterization in pure Rust.
//!
//! ## Core Features
//!
//! - **Resumable rendering**: `start` / `continue_render` / `close` state
//!   machine that yields to the caller between batches of work
//! - **Forced colour schemes**: four-role palette (path fill, path stroke,
//!   text fill, text stroke), optionally converting fills into outlines
//! - **Annotations**: appearance streams composited with their own blend
//!   modes (highlights multiply)
//! - **Form overlay**: widgets painted last, always in native colours
//! - **Pluggable backend**: `tiny-skia` by default, any [`rendering::RasterBackend`]
//!
//! The crate does not parse documents, shape fonts or decode images: it
//! consumes an already-built [`page::Page`] and paints it into a
//! [`rendering::RenderTarget`].
//!
//! ## Quick Start
//!
//! ```
//! use pdf_progressive::color::{Argb, ColorScheme};
//! use pdf_progressive::config::RenderConfig;
//! use pdf_progressive::geometry::Rect;
//! use pdf_progressive::page::{Page, PathObject};
//! use pdf_progressive::rendering::{FormHandle, PauseEvery, RenderSession, RenderStatus, RenderTarget};
//!
//! # fn main() -> pdf_progressive::Result<()> {
//! let mut page = Page::new(200.0, 200.0);
//! if let Some(square) = PathObject::filled_rect(Rect::new(50.0, 50.0, 100.0, 100.0), Argb::RED) {
//!     page.push(square);
//! }
//!
//! let config = RenderConfig::for_size(200, 200)
//!     .with_color_scheme(ColorScheme::uniform(Argb::BLACK))
//!     .with_step_limit(1);
//! let mut pause = PauseEvery::new(2);
//!
//! let mut session = RenderSession::new();
//! let mut status = session.start(RenderTarget::new(200, 200, false)?, &page, config, Some(&mut pause))?;
//! while status == RenderStatus::ToBeContinued {
//!     status = session.continue_render(Some(&mut pause))?;
//! }
//! session.draw_form_overlay(&FormHandle::new())?;
//! let target = session.close()?;
//! assert_eq!(target.pixel(100, 100), Some(Argb::BLACK));
//! assert_eq!(target.pixel(10, 10), Some(Argb::WHITE));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometry and colour
pub mod color;
pub mod geometry;

// Configuration
pub mod config;

// Page model
/// Core annotation types and enums per PDF spec
pub mod annotation_types;
pub mod annotations;
pub mod page;

// Progressive rendering
pub mod rendering;

// Re-exports
pub use annotation_types::{AnnotationFlags, AnnotationSubtype};
pub use annotations::Annotation;
pub use color::{Argb, ColorScheme};
pub use config::{RenderConfig, RenderFlags};
pub use error::{Error, Result, StartError};
pub use geometry::{DeviceRect, Rotation};
pub use page::{Page, PageObject};
pub use rendering::{
    FormHandle, PauseController, RenderSession, RenderStatus, RenderTarget, SessionState,
};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
