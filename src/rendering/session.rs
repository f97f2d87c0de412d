//! Progressive render session.
//!
//! A session walks a fixed work list: the background fill, then every page
//! object in document order, then (with `ANNOT`) the visible non-widget
//! annotations. Work is done in batches of `step_limit` units; the
//! background is a batch of its own. Between batches the pause controller
//! is polled and the session may return `ToBeContinued`, keeping its
//! position in a [`Continuation`].
//!
//! ```text
//! NotStarted --start--> InProgress --continue--> ... --> Done --close--> Closed
//!                  \______________________________________/
//! ```
//!
//! Any backend failure moves the session to `Failed`, from which only
//! `close` is allowed.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::backend::{RasterBackend, SkiaBackend};
use super::overlay::{FormLayer, OverlayCompositor};
use super::page_renderer::PageRenderer;
use super::pause::PauseController;
use super::target::RenderTarget;
use crate::color::ColorScheme;
use crate::config::{RenderConfig, RenderFlags};
use crate::error::{Error, Result, StartError};
use crate::page::Page;

/// Lifecycle state of a [`RenderSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// `start` has not been called
    NotStarted,
    /// Paused with work remaining
    InProgress,
    /// All work painted; the overlay may be drawn and the target closed
    Done,
    /// The backend failed; the target holds whatever was painted before
    Failed,
    /// The target has been handed back
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Outcome of `start` / `continue_render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderStatus {
    /// Everything is painted
    Done,
    /// The pause controller asked to yield; call `continue_render`
    ToBeContinued,
}

/// Resumable position of a session.
///
/// `cursor` indexes the work list after the background and never moves
/// backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Continuation {
    /// Whether the background has been painted
    pub background_done: bool,
    /// Next work unit to paint
    pub cursor: usize,
    /// Number of work units after the background
    pub total: usize,
    /// Batches completed so far
    pub batches: usize,
}

impl Continuation {
    /// True once the background and every work unit are painted.
    pub fn is_finished(&self) -> bool {
        self.background_done && self.cursor >= self.total
    }

    /// Work units not painted yet, background included.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.cursor) + usize::from(!self.background_done)
    }
}

/// One paintable unit of the work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkUnit {
    Object(usize),
    Annotation(usize),
}

/// Everything a started session owns.
struct ActiveRender<'p> {
    target: RenderTarget,
    page: &'p Page,
    config: RenderConfig,
    work: Vec<WorkUnit>,
    continuation: Continuation,
    overlay_drawn: bool,
}

/// A progressive render of one page into one target.
///
/// The session owns the target from `start` until `close` and borrows the
/// page for as long as it lives.
///
/// # Examples
///
/// ```
/// use pdf_progressive::color::Argb;
/// use pdf_progressive::config::RenderConfig;
/// use pdf_progressive::geometry::Rect;
/// use pdf_progressive::page::{Page, PathObject};
/// use pdf_progressive::rendering::{AlwaysPause, RenderSession, RenderStatus, RenderTarget};
///
/// # fn main() -> pdf_progressive::Result<()> {
/// let mut page = Page::new(100.0, 100.0);
/// if let Some(rect) = PathObject::filled_rect(Rect::new(10.0, 10.0, 80.0, 80.0), Argb::RED) {
///     page.push(rect);
/// }
///
/// let target = RenderTarget::new(100, 100, true)?;
/// let mut session = RenderSession::new();
/// let mut status = session.start(target, &page, RenderConfig::for_size(100, 100), Some(&mut AlwaysPause))?;
/// while status == RenderStatus::ToBeContinued {
///     status = session.continue_render(Some(&mut AlwaysPause))?;
/// }
/// let target = session.close()?;
/// assert_eq!(target.pixel(50, 50), Some(Argb::RED));
/// # Ok(())
/// # }
/// ```
pub struct RenderSession<'p, B: RasterBackend = SkiaBackend> {
    backend: B,
    state: SessionState,
    active: Option<ActiveRender<'p>>,
}

impl<'p> RenderSession<'p, SkiaBackend> {
    /// A session painting with the tiny-skia backend.
    pub fn new() -> Self {
        Self::with_backend(SkiaBackend::new())
    }
}

impl Default for RenderSession<'_, SkiaBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, B: RasterBackend> RenderSession<'p, B> {
    /// A session painting through `backend`.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::NotStarted,
            active: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Position of a started session.
    pub fn continuation(&self) -> Option<Continuation> {
        self.active.as_ref().map(|a| a.continuation)
    }

    /// Read-only view of the target while the session owns it.
    pub fn target(&self) -> Option<&RenderTarget> {
        self.active.as_ref().map(|a| &a.target)
    }

    /// Configuration of a started session.
    pub fn config(&self) -> Option<&RenderConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    /// The raster backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate the arguments, paint the background and start painting
    /// content.
    ///
    /// With no pause controller the page is painted to completion. If the
    /// call is rejected the session state is unchanged and `target` comes
    /// back in the [`StartError`].
    pub fn start(
        &mut self,
        target: RenderTarget,
        page: &'p Page,
        config: RenderConfig,
        pause: Option<&mut (dyn PauseController + '_)>,
    ) -> std::result::Result<RenderStatus, StartError> {
        if self.state != SessionState::NotStarted {
            return Err(StartError::rejected(self.invalid_state("start"), target));
        }
        if let Err(e) = validate(&target, page, &config) {
            return Err(StartError::rejected(e, target));
        }

        let work = build_work_list(page, &config);
        debug!(
            "starting render: {}x{} target, {} work units, rotation {:?}, flags {:?}, scheme {}",
            target.width(),
            target.height(),
            work.len(),
            config.rotation,
            config.flags,
            if config.color_scheme.is_some() { "forced" } else { "native" }
        );

        self.backend.begin(&config);
        self.active = Some(ActiveRender {
            target,
            page,
            continuation: Continuation {
                total: work.len(),
                ..Continuation::default()
            },
            work,
            config,
            overlay_drawn: false,
        });
        self.state = SessionState::InProgress;
        self.run(pause).map_err(StartError::failed)
    }

    /// Like [`start`](Self::start), forcing `scheme` over the configuration's.
    pub fn start_with_color_scheme(
        &mut self,
        target: RenderTarget,
        page: &'p Page,
        config: RenderConfig,
        scheme: ColorScheme,
        pause: Option<&mut (dyn PauseController + '_)>,
    ) -> std::result::Result<RenderStatus, StartError> {
        self.start(target, page, config.with_color_scheme(scheme), pause)
    }

    /// Resume a paused session.
    pub fn continue_render(&mut self, pause: Option<&mut (dyn PauseController + '_)>) -> Result<RenderStatus> {
        if self.state != SessionState::InProgress {
            return Err(self.invalid_state("continue"));
        }
        self.run(pause)
    }

    /// Composite the form layer's widgets over the finished page.
    ///
    /// Allowed once, after the session is `Done` and before `close`.
    /// Widgets keep their native colours whatever scheme the page used.
    pub fn draw_form_overlay(&mut self, forms: &dyn FormLayer) -> Result<()> {
        if self.state != SessionState::Done {
            return Err(self.invalid_state("draw the form overlay"));
        }
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return Err(self.invalid_state("draw the form overlay")),
        };
        if active.overlay_drawn {
            return Err(Error::InvalidState {
                operation: "draw the form overlay twice",
                state: self.state,
            });
        }

        let compositor = OverlayCompositor::new(active.page, &active.config);
        match compositor.composite(&mut self.backend, &mut active.target, forms) {
            Ok(drawn) => {
                active.overlay_drawn = true;
                debug!("form overlay drew {} widgets", drawn);
                Ok(())
            },
            Err(e) => {
                warn!("form overlay failed: {}", e);
                self.state = SessionState::Failed;
                Err(e)
            },
        }
    }

    /// End the session and hand the target back.
    ///
    /// Allowed from `Done` and `Failed`.
    pub fn close(&mut self) -> Result<RenderTarget> {
        if !matches!(self.state, SessionState::Done | SessionState::Failed) {
            return Err(self.invalid_state("close"));
        }
        let active = match self.active.take() {
            Some(active) => active,
            None => return Err(self.invalid_state("close")),
        };
        debug!(
            "closing render session after {} batches ({})",
            active.continuation.batches, self.state
        );
        self.state = SessionState::Closed;
        Ok(active.target)
    }

    fn invalid_state(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state,
        }
    }

    /// Paint batches until the work list is exhausted or the controller
    /// asks to pause.
    fn run(&mut self, mut pause: Option<&mut (dyn PauseController + '_)>) -> Result<RenderStatus> {
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return Err(self.invalid_state("render")),
        };
        let renderer = PageRenderer::new(active.page, &active.config);
        let step_limit = active.config.step_limit.get();

        loop {
            let outcome = paint_batch(&mut self.backend, active, &renderer, step_limit);
            if let Err(e) = outcome {
                warn!("render failed: {}", e);
                self.state = SessionState::Failed;
                return Err(e);
            }
            active.continuation.batches += 1;

            if active.continuation.is_finished() {
                debug!(
                    "render done: {} work units in {} batches",
                    active.continuation.total, active.continuation.batches
                );
                self.state = SessionState::Done;
                return Ok(RenderStatus::Done);
            }

            if let Some(controller) = pause.as_mut() {
                if controller.need_to_pause_now() {
                    debug!(
                        "render paused at work unit {}/{}",
                        active.continuation.cursor, active.continuation.total
                    );
                    return Ok(RenderStatus::ToBeContinued);
                }
            }
        }
    }
}

/// Paint one batch. The background is always a batch of its own.
fn paint_batch<B: RasterBackend>(
    backend: &mut B,
    active: &mut ActiveRender<'_>,
    renderer: &PageRenderer,
    step_limit: usize,
) -> Result<()> {
    if !active.continuation.background_done {
        let color = active
            .config
            .background
            .unwrap_or_else(|| active.target.default_background());
        trace!("painting background {:?}", color);
        backend.clear(&mut active.target, color)?;
        active.continuation.background_done = true;
        return Ok(());
    }

    let page = active.page;
    for _ in 0..step_limit {
        let index = active.continuation.cursor;
        let unit = match active.work.get(index) {
            Some(unit) => *unit,
            None => break,
        };
        let painted = match unit {
            WorkUnit::Object(i) => {
                let object = &page.objects[i];
                trace!("work unit {}: {} object {}", index, object.kind(), i);
                renderer.paint_object(backend, &mut active.target, object, None)
            },
            WorkUnit::Annotation(i) => {
                let annotation = &page.annotations[i];
                trace!(
                    "work unit {}: {} annotation {}",
                    index,
                    annotation.subtype.pdf_name(),
                    i
                );
                renderer.paint_annotation(backend, &mut active.target, annotation)
            },
        };
        painted.map_err(|e| e.at_work_unit(index))?;
        active.continuation.cursor += 1;
    }
    Ok(())
}

/// Content objects in document order, then the annotations the base pass
/// paints.
fn build_work_list(page: &Page, config: &RenderConfig) -> Vec<WorkUnit> {
    let mut work: Vec<WorkUnit> = (0..page.objects.len()).map(WorkUnit::Object).collect();
    if !config.renders_annotations() {
        return work;
    }
    let printing = config.flags.contains(RenderFlags::PRINTING);
    for (i, annotation) in page.annotations.iter().enumerate() {
        if annotation.subtype.is_widget() {
            continue;
        }
        if annotation.is_base_content(printing) {
            work.push(WorkUnit::Annotation(i));
        } else {
            warn!(
                "skipping {} annotation {}: flags {:?}",
                annotation.subtype.pdf_name(),
                i,
                annotation.flags
            );
        }
    }
    work
}

/// Check that `target`, `page` and `config` can be rendered together.
///
/// The target must be exactly the size of the configured device rectangle.
pub fn validate(target: &RenderTarget, page: &Page, config: &RenderConfig) -> Result<()> {
    page.validate()?;
    if config.rect.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "device rectangle {}x{} is empty",
            config.rect.width, config.rect.height
        )));
    }
    if target.width() != config.rect.width || target.height() != config.rect.height {
        return Err(Error::InvalidArgument(format!(
            "target is {}x{}, page needs {}x{}",
            target.width(),
            target.height(),
            config.rect.width,
            config.rect.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation_types::{AnnotationFlags, AnnotationSubtype};
    use crate::annotations::Annotation;
    use crate::color::Argb;
    use crate::geometry::Rect;
    use crate::page::PathObject;
    use crate::rendering::{AlwaysPause, NeverPause};

    fn page_with(n: usize) -> Page {
        let mut page = Page::new(100.0, 100.0);
        for i in 0..n {
            let x = (i % 10) as f32 * 10.0;
            if let Some(rect) = PathObject::filled_rect(Rect::new(x, 0.0, 10.0, 10.0), Argb::RED) {
                page.push(rect);
            }
        }
        page
    }

    fn target() -> RenderTarget {
        RenderTarget::new(100, 100, true).unwrap()
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::InProgress.to_string(), "in progress");
        assert_eq!(SessionState::NotStarted.to_string(), "not started");
    }

    #[test]
    fn test_run_to_completion_without_controller() {
        let page = page_with(5);
        let mut session = RenderSession::new();
        let status = session.start(target(), &page, RenderConfig::for_size(100, 100), None).unwrap();
        assert_eq!(status, RenderStatus::Done);
        assert_eq!(session.state(), SessionState::Done);
        let cont = session.continuation().unwrap();
        assert_eq!((cont.cursor, cont.total), (5, 5));
        assert!(cont.is_finished());
    }

    #[test]
    fn test_always_pause_yields_after_background() {
        let page = page_with(3);
        let config = RenderConfig::for_size(100, 100).with_step_limit(1);
        let mut session = RenderSession::new();
        let status = session.start(target(), &page, config, Some(&mut AlwaysPause)).unwrap();
        assert_eq!(status, RenderStatus::ToBeContinued);
        let cont = session.continuation().unwrap();
        assert!(cont.background_done);
        assert_eq!(cont.cursor, 0);
        assert_eq!(cont.remaining(), 3);

        let mut steps = 0;
        while session.continue_render(Some(&mut AlwaysPause)).unwrap() == RenderStatus::ToBeContinued {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(session.continuation().unwrap().batches, 4);
    }

    #[test]
    fn test_empty_page_finishes_in_start() {
        let page = Page::new(100.0, 100.0);
        let mut session = RenderSession::new();
        let status = session
            .start(target(), &page, RenderConfig::for_size(100, 100), Some(&mut AlwaysPause))
            .unwrap();
        assert_eq!(status, RenderStatus::Done);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let page = page_with(1);
        let mut session = RenderSession::new();
        let err = session
            .start(target(), &page, RenderConfig::for_size(50, 100), None)
            .unwrap_err();
        assert!(matches!(err.error, Error::InvalidArgument(_)));
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(err.into_target().map(|t| t.width()), Some(100));
    }

    #[test]
    fn test_second_start_is_invalid() {
        let page = page_with(1);
        let mut session = RenderSession::new();
        session.start(target(), &page, RenderConfig::for_size(100, 100), None).unwrap();
        let err = session
            .start(target(), &page, RenderConfig::for_size(100, 100), None)
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert!(err.target.is_some());
        assert_eq!(session.state(), SessionState::Done);
    }

    #[test]
    fn test_close_requires_done() {
        let page = page_with(2);
        let mut session = RenderSession::new();
        assert!(session.close().unwrap_err().is_invalid_state());

        session
            .start(target(), &page, RenderConfig::for_size(100, 100), Some(&mut AlwaysPause))
            .unwrap();
        assert!(session.close().unwrap_err().is_invalid_state());
        assert_eq!(session.state(), SessionState::InProgress);

        session.continue_render(Some(&mut NeverPause)).unwrap();
        assert!(session.close().is_ok());
        assert!(session.close().unwrap_err().is_invalid_state());
        assert!(session.continue_render(None).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_work_list_respects_annot_flag_and_visibility() {
        let mut page = page_with(2);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        page.add_annotation(Annotation::new(AnnotationSubtype::Ink, rect));
        page.add_annotation(Annotation::new(AnnotationSubtype::Widget, rect));
        page.add_annotation(Annotation::new(AnnotationSubtype::Stamp, rect).with_flags(AnnotationFlags::HIDDEN));
        page.add_annotation(
            Annotation::new(AnnotationSubtype::Square, rect)
                .with_flags(AnnotationFlags::PRINT | AnnotationFlags::NO_VIEW),
        );

        let config = RenderConfig::for_size(100, 100);
        assert_eq!(build_work_list(&page, &config).len(), 2);

        let config = config.with_flags(RenderFlags::ANNOT);
        assert_eq!(
            build_work_list(&page, &config),
            vec![WorkUnit::Object(0), WorkUnit::Object(1), WorkUnit::Annotation(0)]
        );

        let config = config.with_flags(RenderFlags::ANNOT | RenderFlags::PRINTING);
        assert_eq!(
            build_work_list(&page, &config),
            vec![
                WorkUnit::Object(0),
                WorkUnit::Object(1),
                WorkUnit::Annotation(0),
                WorkUnit::Annotation(3)
            ]
        );
    }

    #[test]
    fn test_continuation_serializes() {
        let cont = Continuation {
            background_done: true,
            cursor: 3,
            total: 9,
            batches: 2,
        };
        let json = serde_json::to_string(&cont).unwrap();
        let back: Continuation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cont);
        assert_eq!(back.remaining(), 6);
    }

    #[test]
    fn test_one_controller_reused_across_calls() {
        let page = page_with(4);
        let config = RenderConfig::for_size(100, 100).with_step_limit(1);
        let mut always = AlwaysPause;
        let mut pause: Option<&mut dyn PauseController> = Some(&mut always);
        let mut session = RenderSession::new();
        let mut status = session.start(target(), &page, config, pause.as_deref_mut()).unwrap();
        let mut resumes = 0;
        while status == RenderStatus::ToBeContinued {
            resumes += 1;
            status = session.continue_render(pause.as_deref_mut()).unwrap();
        }
        assert_eq!(resumes, 4);
    }
}
