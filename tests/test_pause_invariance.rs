//! Property-based tests: the finished image must not depend on where the
//! render was paused or how much work each batch did.

mod common;

use common::*;
use pdf_progressive::annotation_types::AnnotationSubtype;
use pdf_progressive::annotations::Annotation;
use pdf_progressive::color::{Argb, ColorScheme};
use pdf_progressive::config::{RenderConfig, RenderFlags};
use pdf_progressive::geometry::{Rect, Rotation};
use pdf_progressive::page::{ImageObject, Page, PageObject, PathObject, StrokeStyle};
use pdf_progressive::rendering::{FormHandle, NeverPause, RenderSession, RenderStatus, RenderTarget};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Item {
    Fill(Rect, Argb),
    Stroke(Rect, Argb, f32),
    Text(f32, f32, usize),
    Image(Rect, Argb),
    Highlight(Rect),
    Widget(Rect, Argb),
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f32..180.0, 0.0f32..180.0, 5.0f32..60.0, 5.0f32..60.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn color_strategy() -> impl Strategy<Value = Argb> {
    (any::<u8>(), any::<u8>(), any::<u8>(), 0x40u8..=0xFF)
        .prop_map(|(r, g, b, a)| Argb::from_rgba8(r, g, b, a))
}

fn item_strategy() -> impl Strategy<Value = Item> {
    prop_oneof![
        (rect_strategy(), color_strategy()).prop_map(|(r, c)| Item::Fill(r, c)),
        (rect_strategy(), color_strategy(), 0.5f32..4.0).prop_map(|(r, c, w)| Item::Stroke(r, c, w)),
        (0.0f32..150.0, 0.0f32..180.0, 1usize..8).prop_map(|(x, y, n)| Item::Text(x, y, n)),
        (rect_strategy(), color_strategy()).prop_map(|(r, c)| Item::Image(r, c)),
        rect_strategy().prop_map(Item::Highlight),
        (rect_strategy(), color_strategy()).prop_map(|(r, c)| Item::Widget(r, c)),
    ]
}

fn build_page(items: &[Item]) -> Page {
    let mut page = Page::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (i, item) in items.iter().enumerate() {
        match item {
            Item::Fill(rect, color) => {
                if let Some(path) = PathObject::filled_rect(*rect, *color) {
                    page.push(path);
                }
            },
            Item::Stroke(rect, color, width) => {
                if let Some(path) = PathObject::filled_rect(*rect, Argb::WHITE.with_alpha(0x60)) {
                    page.push(path.with_stroke(*color, StrokeStyle::with_width(*width)));
                }
            },
            Item::Text(x, y, n) => {
                page.push(text_run(*n, *x, *y, 10.0));
            },
            Item::Image(rect, color) => {
                page.push(ImageObject::placed(i as u64, 3, 2, solid_pixels(3, 2, *color), *rect));
            },
            Item::Highlight(rect) => {
                if let Some(path) = PathObject::filled_rect(*rect, YELLOW) {
                    page.add_annotation(
                        Annotation::new(AnnotationSubtype::Highlight, *rect).with_appearance(path),
                    );
                }
            },
            Item::Widget(rect, color) => {
                if let Some(path) = PathObject::filled_rect(*rect, *color) {
                    page.add_annotation(
                        Annotation::new(AnnotationSubtype::Widget, *rect)
                            .with_appearance(path.with_stroke(Argb::BLACK, StrokeStyle::with_width(1.0))),
                    );
                }
            },
        }
    }
    page
}

/// Render with a controller that replays `pattern` (cycled) as its pause
/// decisions, then draw the form overlay.
fn render_with_pattern(page: &Page, config: RenderConfig, pattern: &[bool]) -> String {
    let target = RenderTarget::new(config.rect.width, config.rect.height, true).unwrap();
    let mut polls = 0usize;
    let mut controller = || {
        let pause = pattern[polls % pattern.len()];
        polls += 1;
        pause
    };
    let mut session = RenderSession::new();
    let mut status = session
        .start(target, page, config, Some(&mut controller))
        .unwrap();
    while status == RenderStatus::ToBeContinued {
        status = session.continue_render(Some(&mut controller)).unwrap();
    }
    session.draw_form_overlay(&FormHandle::new()).unwrap();
    session.close().unwrap().checksum()
}

fn reference(page: &Page, config: RenderConfig) -> String {
    render_with_forms_paused(page, config, true, &FormHandle::new(), Some(&mut NeverPause)).checksum()
}

fn config_strategy() -> impl Strategy<Value = RenderConfig> {
    (0u8..4, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(turns, annot, scheme, convert)| {
        let mut flags = RenderFlags::empty();
        if annot {
            flags |= RenderFlags::ANNOT;
        }
        if convert {
            flags |= RenderFlags::CONVERT_FILL_TO_STROKE;
        }
        let mut config = full_page()
            .with_rotation(Rotation::from_quarter_turns(turns).unwrap_or_default())
            .with_flags(flags);
        if scheme {
            config = config.with_color_scheme(ColorScheme::new(
                Argb::BLACK,
                Argb::rgb(0x80, 0, 0),
                Argb::rgb(0, 0x80, 0),
                Argb::BLUE,
            ));
        }
        config
    })
}

// ============================================================================
// Pause invariance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: pause cadence and batch size never change the final image,
    /// form overlay included
    #[test]
    fn prop_pause_invariance(
        items in prop::collection::vec(item_strategy(), 0..12),
        pattern in prop::collection::vec(any::<bool>(), 1..6),
        step_limit in 1usize..5,
        config in config_strategy(),
    ) {
        let page = build_page(&items);
        let expected = reference(&page, config.clone());
        let actual = render_with_pattern(&page, config.with_step_limit(step_limit), &pattern);
        prop_assert_eq!(expected, actual);
    }
}

proptest! {
    /// Property: every batch advances the cursor by at most the step limit
    #[test]
    fn prop_step_limit_bounds_batches(
        items in prop::collection::vec(item_strategy(), 1..12),
        step_limit in 1usize..5,
    ) {
        let page = build_page(&items);
        let config = full_page()
            .with_flags(RenderFlags::ANNOT)
            .with_step_limit(step_limit);
        let mut session = RenderSession::new();
        let target = RenderTarget::new(200, 200, true).unwrap();
        let mut always = || true;
        let mut status = session.start(target, &page, config, Some(&mut always)).unwrap();

        let mut last = 0;
        while status == RenderStatus::ToBeContinued {
            let cont = session.continuation().unwrap();
            prop_assert!(cont.cursor - last <= step_limit);
            last = cont.cursor;
            status = session.continue_render(Some(&mut always)).unwrap();
        }
        let cont = session.continuation().unwrap();
        prop_assert!(cont.is_finished());
        prop_assert_eq!(cont.cursor, cont.total);
    }
}

/// The highlight fixture renders the same with every step limit.
#[test]
fn test_fixture_step_limits_agree() {
    let page = annotation_highlight_square_with_ap();
    let config = full_page().with_flags(RenderFlags::ANNOT);
    let expected = reference(&page, config.clone());
    for step_limit in 1..=5 {
        let actual = render_with_pattern(&page, config.clone().with_step_limit(step_limit), &[true]);
        assert_eq!(expected, actual, "step limit {}", step_limit);
    }
}

/// Pages whose objects all share one kind still render identically when paused.
#[test]
fn test_objects_counted_as_units() {
    let page = rectangles();
    assert!(page.objects.iter().all(|o| matches!(o, PageObject::Path(_))));
    let config = full_page().with_step_limit(1);
    assert_eq!(reference(&page, config.clone()), render_with_pattern(&page, config, &[true, false]));
}
