//! Render a built-in sample page progressively
//!
//! Paints a page with paths, text, an image, a shading and a few
//! annotations, pausing on a configurable cadence, then writes a PNG.
//!
//! Usage:
//!   cargo run --release --bin render_progressive
//!   cargo run --release --bin render_progressive -- --pause-every 2 --step-limit 1 --scheme --annot
//!   RUST_LOG=debug cargo run --bin render_progressive -- --output page.png --rotate 1

use pdf_progressive::annotation_types::AnnotationSubtype;
use pdf_progressive::annotations::Annotation;
use pdf_progressive::color::{Argb, ColorScheme};
use pdf_progressive::config::{RenderConfig, RenderFlags};
use pdf_progressive::geometry::{Point, Rect, Rotation};
use pdf_progressive::page::{
    Glyph, ImageObject, Page, PathObject, Shading, ShadingObject, StrokeStyle, TextObject,
};
use pdf_progressive::rendering::{
    FormHandle, PauseController, PauseEvery, RenderSession, RenderStatus, RenderTarget,
};
use std::path::PathBuf;
use std::time::Instant;
use tiny_skia::{PathBuilder, Transform};

const PAGE_WIDTH: f32 = 300.0;
const PAGE_HEIGHT: f32 = 200.0;
const FONT_SIZE: f32 = 18.0;

struct DemoConfig {
    output: PathBuf,
    pause_every: Option<usize>,
    step_limit: usize,
    scale: f32,
    rotation: Rotation,
    flags: RenderFlags,
    scheme: bool,
    forms: bool,
}

impl DemoConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            output: PathBuf::from("render_progressive.png"),
            pause_every: None,
            step_limit: 1,
            scale: 2.0,
            rotation: Rotation::None,
            flags: RenderFlags::empty(),
            scheme: false,
            forms: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    config.output = PathBuf::from(value(&args, i)?);
                },
                "--pause-every" => {
                    i += 1;
                    config.pause_every = Some(parse(&args, i)?);
                },
                "--step-limit" => {
                    i += 1;
                    config.step_limit = parse(&args, i)?;
                },
                "--scale" => {
                    i += 1;
                    config.scale = parse(&args, i)?;
                },
                "--rotate" => {
                    i += 1;
                    config.rotation =
                        Rotation::from_quarter_turns(parse(&args, i)?).map_err(|e| e.to_string())?;
                },
                "--flags" => {
                    i += 1;
                    config.flags |= RenderFlags::from_bits_truncate(parse(&args, i)?);
                },
                "--annot" => config.flags |= RenderFlags::ANNOT,
                "--fill-to-stroke" => config.flags |= RenderFlags::CONVERT_FILL_TO_STROKE,
                "--scheme" => config.scheme = true,
                "--forms" => config.forms = true,
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 1;
        }
        Ok(config)
    }
}

fn value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value after {}", args[i - 1]))
}

fn parse<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, String> {
    let raw = value(args, i)?;
    raw.parse()
        .map_err(|_| format!("invalid value for {}: {}", args[i - 1], raw))
}

/// A box glyph with a counter, so stroking and filling are distinguishable.
fn box_glyph(x: f32) -> Option<Glyph> {
    let mut pb = PathBuilder::new();
    pb.push_rect(tiny_skia::Rect::from_xywh(0.05, 0.0, 0.5, 0.7)?);
    // Glyphs fill nonzero, so the counter winds the other way.
    pb.move_to(0.2, 0.2);
    pb.line_to(0.2, 0.5);
    pb.line_to(0.4, 0.5);
    pb.line_to(0.4, 0.2);
    pb.close();
    Some(Glyph::new(pb.finish()?, x, 0.0))
}

fn checkerboard(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dark = (x / 4 + y / 4) % 2 == 0;
            let v = if dark { 40 } else { 220 };
            pixels.extend_from_slice(&[v, v, 255 - v, 255]);
        }
    }
    pixels
}

fn sample_page() -> Option<Page> {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);

    page.push(PathObject::filled_rect(Rect::new(20.0, 20.0, 120.0, 80.0), Argb::rgb(0x30, 0x90, 0xE0))?);
    page.push(
        PathObject::filled_rect(Rect::new(60.0, 60.0, 120.0, 80.0), Argb::RED.with_alpha(0x90))?
            .with_stroke(Argb::BLACK, StrokeStyle::with_width(3.0)),
    );

    let glyphs = (0..8).filter_map(|i| box_glyph(i as f32 * 0.6 * FONT_SIZE)).collect();
    page.push(
        TextObject::new(glyphs, FONT_SIZE).with_transform(Transform::from_translate(30.0, 160.0)),
    );

    page.push(ImageObject::placed(1, 32, 32, checkerboard(32), Rect::new(200.0, 120.0, 64.0, 64.0)));

    let area = PathBuilder::from_rect(tiny_skia::Rect::from_xywh(190.0, 20.0, 90.0, 80.0)?);
    page.push(ShadingObject::new(
        area,
        Shading::Axial {
            start: Point::new(190.0, 0.0),
            end: Point::new(280.0, 0.0),
            stops: vec![(0.0, Argb::rgb(0xFF, 0xC0, 0x00)), (1.0, Argb::rgb(0x80, 0x00, 0x80))],
        },
    ));

    page.add_annotation(
        Annotation::new(AnnotationSubtype::Highlight, Rect::new(25.0, 150.0, 150.0, 25.0))
            .with_appearance(PathObject::filled_rect(Rect::new(25.0, 150.0, 150.0, 25.0), Argb::rgb(0xFF, 0xFF, 0x00))?),
    );
    let mut ink = PathBuilder::new();
    ink.move_to(20.0, 110.0);
    ink.cubic_to(60.0, 140.0, 100.0, 80.0, 140.0, 115.0);
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Ink, Rect::new(20.0, 80.0, 120.0, 60.0))
            .with_appearance(PathObject::new(ink.finish()?).with_stroke(Argb::GREEN, StrokeStyle::with_width(2.0))),
    );
    page.add_annotation(
        Annotation::new(AnnotationSubtype::Widget, Rect::new(200.0, 30.0, 80.0, 20.0))
            .with_appearance(PathObject::stroked_rect(Rect::new(200.0, 30.0, 80.0, 20.0), Argb::BLUE, 1.0)?),
    );

    Some(page)
}

fn main() {
    env_logger::init();

    let demo = match DemoConfig::from_args() {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        },
    };

    let page = match sample_page() {
        Some(page) => page,
        None => {
            eprintln!("Error: could not build the sample page");
            std::process::exit(1);
        },
    };

    let (w, h) = if demo.rotation.swaps_axes() {
        (PAGE_HEIGHT, PAGE_WIDTH)
    } else {
        (PAGE_WIDTH, PAGE_HEIGHT)
    };
    let width = (w * demo.scale).round() as u32;
    let height = (h * demo.scale).round() as u32;

    let mut config = RenderConfig::for_size(width, height)
        .with_rotation(demo.rotation)
        .with_flags(demo.flags)
        .with_step_limit(demo.step_limit);
    if demo.scheme {
        config = config.with_color_scheme(ColorScheme::new(
            Argb::BLACK,
            Argb::WHITE,
            Argb::WHITE,
            Argb::WHITE,
        ));
    }

    if let Err(e) = run(&demo, &page, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(demo: &DemoConfig, page: &Page, config: RenderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let target = RenderTarget::new(config.rect.width, config.rect.height, page.has_transparency())?;
    let mut pause = demo.pause_every.map(PauseEvery::new);

    let mut session = RenderSession::new();
    let mut status = session.start(
        target,
        page,
        config,
        pause.as_mut().map(|p| p as &mut dyn PauseController),
    )?;
    let mut resumes = 0;
    while status == RenderStatus::ToBeContinued {
        resumes += 1;
        if let Some(cont) = session.continuation() {
            println!(
                "paused: {}",
                serde_json::to_string(&cont).unwrap_or_else(|_| format!("{:?}", cont))
            );
        }
        status = session.continue_render(pause.as_mut().map(|p| p as &mut dyn PauseController))?;
    }

    if demo.forms {
        let forms = FormHandle::new().with_highlight(Argb::rgb(0xFF, 0xE4, 0xDD).with_alpha(0x80));
        session.draw_form_overlay(&forms)?;
    }
    let target = session.close()?;

    let png = target.encode_png()?;
    std::fs::write(&demo.output, png)?;

    println!(
        "rendered {}x{} in {:.2?} with {} resumes -> {} (md5 {})",
        target.width(),
        target.height(),
        start.elapsed(),
        resumes,
        demo.output.display(),
        target.checksum()
    );
    Ok(())
}
