//! Shared fixture pages and render helpers for integration tests.
//!
//! The fixtures are small synthetic pages named after the documents the
//! progressive renderer is usually exercised with.

#![allow(dead_code)]

use pdf_progressive::annotation_types::{AnnotationFlags, AnnotationSubtype};
use pdf_progressive::annotations::Annotation;
use pdf_progressive::color::Argb;
use pdf_progressive::config::RenderConfig;
use pdf_progressive::geometry::Rect;
use pdf_progressive::page::{Glyph, ImageObject, Page, PathObject, StrokeStyle, TextObject};
use pdf_progressive::rendering::{
    FormLayer, PauseController, RenderSession, RenderStatus, RenderTarget,
};
use tiny_skia::{PathBuilder, Transform};

/// Width of every fixture page in points.
pub const PAGE_WIDTH: f32 = 200.0;
/// Height of every fixture page in points.
pub const PAGE_HEIGHT: f32 = 200.0;

/// Light blue used where a coloured backdrop is needed.
pub const BACKDROP: Argb = Argb::rgb(0x80, 0x80, 0xFF);
/// Yellow used for highlights.
pub const YELLOW: Argb = Argb::rgb(0xFF, 0xFF, 0x00);

/// A solid box glyph: the full em square minus a small margin.
pub fn box_glyph(x: f32) -> Glyph {
    let rect = tiny_skia::Rect::from_xywh(0.1, 0.0, 0.6, 0.8).expect("valid glyph rect");
    Glyph::new(PathBuilder::from_rect(rect), x, 0.0)
}

/// A run of `n` box glyphs at a page position, one em apart.
pub fn text_run(n: usize, x: f32, y: f32, font_size: f32) -> TextObject {
    let glyphs = (0..n).map(|i| box_glyph(i as f32 * font_size)).collect();
    TextObject::new(glyphs, font_size).with_transform(Transform::from_translate(x, y))
}

/// Straight RGBA pixels of a solid image.
pub fn solid_pixels(width: u32, height: u32, color: Argb) -> Vec<u8> {
    [color.red(), color.green(), color.blue(), color.alpha()].repeat((width * height) as usize)
}

/// Two lines of black text.
pub fn hello_world() -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    page.push(text_run(13, 20.0, 150.0, 12.0));
    page.push(text_run(9, 20.0, 120.0, 12.0));
    page
}

/// The rectangles of the `rectangles` fixture, in page space.
pub fn rectangle_rects() -> Vec<(Rect, Argb)> {
    vec![
        (Rect::new(20.0, 20.0, 60.0, 40.0), Argb::RED),
        (Rect::new(110.0, 20.0, 70.0, 50.0), Argb::GREEN),
        (Rect::new(20.0, 100.0, 50.0, 70.0), Argb::BLUE),
        (Rect::new(100.0, 110.0, 80.0, 60.0), Argb::rgb(0x40, 0x40, 0x40)),
    ]
}

/// Solid filled rectangles, no strokes.
pub fn rectangles() -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (rect, color) in rectangle_rects() {
        page.push(PathObject::filled_rect(rect, color).expect("non-degenerate rect"));
    }
    page
}

/// The same rectangles as [`rectangles`], stroked with the default stroke style.
pub fn rectangles_outlined() -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (rect, color) in rectangle_rects() {
        page.push(PathObject::stroked_rect(rect, color, 1.0).expect("non-degenerate rect"));
    }
    page
}

/// Text with a highlight over it and a square annotation.
pub fn annotation_highlight_square_with_ap() -> Page {
    let mut page = hello_world();
    let highlight = Rect::new(15.0, 145.0, 170.0, 20.0);
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Highlight, highlight)
            .with_appearance(PathObject::filled_rect(highlight, YELLOW).expect("highlight rect")),
    );
    let square = Rect::new(40.0, 30.0, 120.0, 60.0);
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Square, square)
            .with_appearance(PathObject::stroked_rect(square, Argb::RED, 3.0).expect("square rect")),
    );
    page
}

/// Several ink annotations.
pub fn annotation_ink_multiple() -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (i, color) in [Argb::RED, Argb::GREEN, Argb::BLUE].into_iter().enumerate() {
        let y = 40.0 + i as f32 * 50.0;
        let mut pb = PathBuilder::new();
        pb.move_to(20.0, y);
        pb.cubic_to(70.0, y + 40.0, 130.0, y - 40.0, 180.0, y);
        let ink = PathObject::new(pb.finish().expect("ink path"))
            .with_stroke(color, StrokeStyle::with_width(4.0));
        page.add_annotation(
            Annotation::new(AnnotationSubtype::Ink, Rect::new(15.0, y - 25.0, 170.0, 50.0))
                .with_appearance(ink),
        );
    }
    page
}

/// A stamp whose appearance is an image with a border.
pub fn annotation_stamp_with_ap() -> Page {
    let mut page = hello_world();
    let rect = Rect::new(60.0, 30.0, 80.0, 60.0);
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Stamp, rect)
            .with_appearance(ImageObject::placed(
                42,
                16,
                12,
                solid_pixels(16, 12, Argb::rgb(0xC0, 0x20, 0x20)),
                rect,
            ))
            .with_appearance(PathObject::stroked_rect(rect, Argb::BLACK, 2.0).expect("stamp border")),
    );
    page
}

/// Device rectangle (left, top, right, bottom) of the text field in [`text_form`]
/// on a 200x200 target.
pub const TEXT_FIELD_PIXELS: (u32, u32, u32, u32) = (100, 20, 180, 50);

/// Page content plus one text-field widget.
pub fn text_form() -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    page.push(PathObject::filled_rect(Rect::new(10.0, 10.0, 80.0, 80.0), Argb::GREEN).expect("content rect"));
    page.push(text_run(5, 10.0, 100.0, 14.0));

    let field = Rect::new(100.0, 150.0, 80.0, 30.0);
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Widget, field)
            .with_flags(AnnotationFlags::PRINT)
            .with_appearance(PathObject::filled_rect(field, Argb::rgb(0xEE, 0xEE, 0xEE)).expect("field rect"))
            .with_appearance(PathObject::stroked_rect(field, Argb::BLUE, 2.0).expect("field border"))
            .with_appearance(text_run(4, 105.0, 158.0, 12.0)),
    );
    page
}

/// Render `page` to completion, resuming whenever the controller pauses.
pub fn render(
    page: &Page,
    config: RenderConfig,
    has_alpha: bool,
    mut pause: Option<&mut dyn PauseController>,
) -> RenderTarget {
    let target = RenderTarget::new(config.rect.width, config.rect.height, has_alpha).expect("target");
    let mut session = RenderSession::new();
    let mut status = session
        .start(target, page, config, pause.as_deref_mut())
        .expect("start failed");
    while status == RenderStatus::ToBeContinued {
        status = session
            .continue_render(pause.as_deref_mut())
            .expect("continue failed");
    }
    session.close().expect("close failed")
}

/// Render `page` to completion, then draw `forms` before closing.
pub fn render_with_forms(
    page: &Page,
    config: RenderConfig,
    has_alpha: bool,
    forms: &dyn FormLayer,
) -> RenderTarget {
    render_with_forms_paused(page, config, has_alpha, forms, None)
}

/// Like [`render_with_forms`], resuming whenever the controller pauses.
pub fn render_with_forms_paused(
    page: &Page,
    config: RenderConfig,
    has_alpha: bool,
    forms: &dyn FormLayer,
    mut pause: Option<&mut dyn PauseController>,
) -> RenderTarget {
    let target = RenderTarget::new(config.rect.width, config.rect.height, has_alpha).expect("target");
    let mut session = RenderSession::new();
    let mut status = session
        .start(target, page, config, pause.as_deref_mut())
        .expect("start failed");
    while status == RenderStatus::ToBeContinued {
        status = session
            .continue_render(pause.as_deref_mut())
            .expect("continue failed");
    }
    session.draw_form_overlay(forms).expect("overlay failed");
    session.close().expect("close failed")
}

/// Pixels inside a device rectangle (left, top, right, bottom), row by row.
pub fn region(target: &RenderTarget, (left, top, right, bottom): (u32, u32, u32, u32)) -> Vec<Argb> {
    let mut pixels = Vec::new();
    for y in top..bottom {
        for x in left..right {
            pixels.push(target.pixel(x, y).expect("pixel in bounds"));
        }
    }
    pixels
}

/// Full-page configuration for a 200x200 target.
pub fn full_page() -> RenderConfig {
    RenderConfig::for_size(PAGE_WIDTH as u32, PAGE_HEIGHT as u32)
}
