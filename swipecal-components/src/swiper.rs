//! Three-pane swipe carousel with pull-to-refresh gesture classification.
//!
//! ## Usage
//!
//! Page between a previous, current and next view (months, days, photos)
//! by dragging horizontally, while a vertical pull on the same surface
//! drives a refresh indicator instead.
//!
//! The [`SwiperController`] owns one animated horizontal offset shared by
//! all three panes. At rest the offset is `-pane_width`, so the current
//! pane sits in the viewport with its neighbours just outside. Each touch
//! session is classified once, on its first movement past the touch slop,
//! as either a horizontal page drag or a vertical refresh pull. On release a
//! page drag either commits (the offset animates a full pane width) or
//! rolls back. A commit is reported through `on_change_page` only when the
//! animation settles, after which the offset snaps back to `-pane_width`
//! and the host re-renders the panes around its new current page.
//!
//! Time never advances on its own: hosts call [`SwiperController::tick`]
//! once per frame with the frame instant.
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use derive_setters::Setters;
use futures::channel::oneshot;
use smallvec::{SmallVec, smallvec};
use swipecal_ui::{Callback, CallbackWith, Px, RenderSlot, TouchEvent, TouchEventContent, Tween};
use tracing::{debug, trace};

/// Defaults for swiper behavior.
pub struct SwiperDefaults;

impl SwiperDefaults {
    /// Fraction of the pane width a drag must cover to change page.
    pub const SUCCESS_CAPTURE: f32 = 0.5;
    /// Downward pull distance, in pixels, that arms a refresh.
    pub const REFRESH_THROTTLE: f32 = 90.0;
    /// Duration of commit and rollback animations.
    pub const ANIMATION_DURATION: Duration = Duration::from_millis(200);
    /// Delay between a triggered refresh and disposing its indicator.
    pub const INDICATOR_DISPOSE_DELAY: Duration = Duration::from_millis(200);
    /// Movement, in pixels, ignored before a gesture is classified.
    pub const TOUCH_SLOP: f32 = 0.0;
}

/// Configuration and host hooks for a swiper.
#[derive(Clone, PartialEq, Debug, Setters)]
pub struct SwiperArgs {
    /// Fraction of the pane width a drag must cover to change page.
    pub success_capture: f32,
    /// Downward pull distance, in pixels, that arms a refresh.
    pub refresh_throttle: f32,
    /// Duration of commit and rollback animations.
    pub animation_duration: Duration,
    /// Delay between a triggered refresh and disposing its indicator.
    pub indicator_dispose_delay: Duration,
    /// Movement, in pixels, ignored before a gesture is classified.
    pub touch_slop: f32,
    /// Allow dragging right, toward the previous pane.
    pub can_swipe_left: bool,
    /// Allow dragging left, toward the next pane.
    pub can_swipe_right: bool,
    /// Capture touch input at all.
    pub can_handle_touch: bool,
    /// Called once per committed page change; `true` when the previous pane
    /// became current.
    #[setters(skip)]
    pub on_change_page: Option<CallbackWith<bool>>,
    /// Called when an armed refresh pull is released.
    #[setters(skip)]
    pub on_refresh: Option<Callback>,
    /// Called with the pull distance, capped at the refresh throttle.
    #[setters(skip)]
    pub on_indicator_move: Option<CallbackWith<f32>>,
    /// Called when the refresh indicator should go away.
    #[setters(skip)]
    pub on_indicator_dispose: Option<Callback>,
    /// Called when a touch session starts.
    #[setters(skip)]
    pub on_begin_touch: Option<Callback>,
    /// Called when a touch session ends.
    #[setters(skip)]
    pub on_release_touch: Option<Callback>,
}

impl Default for SwiperArgs {
    fn default() -> Self {
        Self {
            success_capture: SwiperDefaults::SUCCESS_CAPTURE,
            refresh_throttle: SwiperDefaults::REFRESH_THROTTLE,
            animation_duration: SwiperDefaults::ANIMATION_DURATION,
            indicator_dispose_delay: SwiperDefaults::INDICATOR_DISPOSE_DELAY,
            touch_slop: SwiperDefaults::TOUCH_SLOP,
            can_swipe_left: true,
            can_swipe_right: true,
            can_handle_touch: true,
            on_change_page: None,
            on_refresh: None,
            on_indicator_move: None,
            on_indicator_dispose: None,
            on_begin_touch: None,
            on_release_touch: None,
        }
    }
}

impl SwiperArgs {
    /// Sets the page change hook.
    pub fn on_change_page(mut self, on_change_page: impl Into<CallbackWith<bool>>) -> Self {
        self.on_change_page = Some(on_change_page.into());
        self
    }

    /// Sets the refresh hook.
    pub fn on_refresh(mut self, on_refresh: impl Into<Callback>) -> Self {
        self.on_refresh = Some(on_refresh.into());
        self
    }

    /// Sets the refresh indicator move hook.
    pub fn on_indicator_move(mut self, on_indicator_move: impl Into<CallbackWith<f32>>) -> Self {
        self.on_indicator_move = Some(on_indicator_move.into());
        self
    }

    /// Sets the refresh indicator dispose hook.
    pub fn on_indicator_dispose(mut self, on_indicator_dispose: impl Into<Callback>) -> Self {
        self.on_indicator_dispose = Some(on_indicator_dispose.into());
        self
    }

    /// Sets the touch begin hook.
    pub fn on_begin_touch(mut self, on_begin_touch: impl Into<Callback>) -> Self {
        self.on_begin_touch = Some(on_begin_touch.into());
        self
    }

    /// Sets the touch release hook.
    pub fn on_release_touch(mut self, on_release_touch: impl Into<Callback>) -> Self {
        self.on_release_touch = Some(on_release_touch.into());
        self
    }
}

/// How a touch session is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    /// No movement past the touch slop yet.
    #[default]
    Undecided,
    /// Horizontal drag that moves the panes.
    HorizontalPage,
    /// Vertical pull that drives the refresh indicator.
    VerticalRefresh,
}

/// Result of a programmatic page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChangeOutcome {
    /// The animation settled and the page change was reported.
    Committed,
    /// The animation settled back on the original page.
    RolledBack,
    /// A touch or a newer request took over the animation.
    Superseded,
    /// The request was not started: no layout yet, or a touch is active.
    Ignored,
}

/// Completion signal of [`SwiperController::change`].
///
/// Resolves once the requested page change settles or is superseded.
#[must_use = "a page change can be awaited to pace repeated requests"]
#[derive(Debug)]
pub struct PageChange {
    receiver: oneshot::Receiver<PageChangeOutcome>,
}

impl PageChange {
    fn pending() -> (oneshot::Sender<PageChangeOutcome>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver })
    }

    /// Returns the outcome if it is already known, without blocking.
    pub fn try_outcome(&mut self) -> Option<PageChangeOutcome> {
        self.receiver
            .try_recv()
            .unwrap_or(Some(PageChangeOutcome::Superseded))
    }
}

impl Future for PageChange {
    type Output = PageChangeOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.receiver)
            .poll(cx)
            .map(|outcome| outcome.unwrap_or(PageChangeOutcome::Superseded))
    }
}

/// Read-only view of what the swiper is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwiperStatus {
    /// At rest.
    Idle,
    /// A touch session is active.
    Tracking(GestureKind),
    /// Animating toward a page change.
    Committing {
        /// Whether the previous pane is becoming current.
        to_previous: bool,
    },
    /// Animating back to the resting position.
    RollingBack,
}

/// Snapshot of the controller state for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwiperSnapshot {
    /// Horizontal translation applied to every pane.
    pub offset: f32,
    /// Width of one pane, zero before layout.
    pub pane_width: f32,
    /// Whether all three panes can be placed.
    pub ready: bool,
    /// Current activity.
    pub status: SwiperStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Commit { to_previous: bool },
    Rollback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSession {
    kind: GestureKind,
    /// Live offset when the touch went down; drag deltas apply to it.
    origin: f32,
    refresh_armed: bool,
}

#[derive(Debug)]
struct Settling {
    tween: Tween,
    resolution: Resolution,
    completion: Option<oneshot::Sender<PageChangeOutcome>>,
}

impl Settling {
    fn notify(&mut self, outcome: PageChangeOutcome) {
        if let Some(completion) = self.completion.take() {
            let _ = completion.send(outcome);
        }
    }
}

#[derive(Debug, Default)]
enum SwiperPhase {
    #[default]
    Idle,
    Tracking(GestureSession),
    Settling(Settling),
}

/// Gesture classifier and offset animator for a three-pane carousel.
#[derive(Debug)]
pub struct SwiperController {
    args: SwiperArgs,
    pane_width: f32,
    ready: bool,
    offset: f32,
    /// Resting offset the current session resolves around. Kept when a
    /// touch interrupts an animation so the continuation is judged against
    /// the page the user started from.
    anchor: f32,
    phase: SwiperPhase,
    dispose_at: Option<Instant>,
}

impl SwiperController {
    /// Creates an unlaid-out controller.
    pub fn new(args: SwiperArgs) -> Self {
        Self {
            args,
            pane_width: 0.0,
            ready: false,
            offset: 0.0,
            anchor: 0.0,
            phase: SwiperPhase::Idle,
            dispose_at: None,
        }
    }

    /// Current configuration.
    pub fn args(&self) -> &SwiperArgs {
        &self.args
    }

    /// Replaces the configuration. An active session keeps running.
    pub fn set_args(&mut self, args: SwiperArgs) {
        self.args = args;
    }

    /// Current pane translation.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Width of one pane, zero before layout.
    pub fn pane_width(&self) -> f32 {
        self.pane_width
    }

    /// Whether a non-zero width has been laid out.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether no session and no animation is active.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, SwiperPhase::Idle)
    }

    /// Current activity.
    pub fn status(&self) -> SwiperStatus {
        match &self.phase {
            SwiperPhase::Idle => SwiperStatus::Idle,
            SwiperPhase::Tracking(session) => SwiperStatus::Tracking(session.kind),
            SwiperPhase::Settling(settling) => match settling.resolution {
                Resolution::Commit { to_previous } => SwiperStatus::Committing { to_previous },
                Resolution::Rollback => SwiperStatus::RollingBack,
            },
        }
    }

    /// Snapshot for the render path.
    pub fn snapshot(&self) -> SwiperSnapshot {
        SwiperSnapshot {
            offset: self.offset,
            pane_width: self.pane_width,
            ready: self.ready,
            status: self.status(),
        }
    }

    /// Records the pane width and re-anchors the offset to `-width`.
    ///
    /// A zero width is the expected state before the first measurement and
    /// keeps the swiper in single-pane mode. A width change while a page
    /// change is animating completes that change first.
    pub fn on_layout(&mut self, width: Px) {
        let width = width.to_f32().max(0.0);
        if self.ready && width == self.pane_width {
            return;
        }

        match std::mem::take(&mut self.phase) {
            SwiperPhase::Settling(settling) => self.finish_settling(settling),
            other => self.phase = other,
        }

        self.pane_width = width;
        self.ready = width > 0.0;
        self.offset = -width;
        self.anchor = self.offset;
        if let SwiperPhase::Tracking(session) = &mut self.phase {
            session.origin = self.offset;
        }
        debug!(width, ready = self.ready, "swiper laid out");
    }

    /// Starts a touch session.
    ///
    /// An in-flight animation is stopped where it currently is and its
    /// value becomes the drag origin, so the panes never jump under the
    /// finger. Its pending page change is not reported; the new session
    /// decides the outcome.
    pub fn handle_gesture_start(&mut self, now: Instant) {
        if !self.args.can_handle_touch {
            return;
        }

        let origin = match std::mem::take(&mut self.phase) {
            SwiperPhase::Settling(mut settling) => {
                self.offset = settling.tween.value_at(now);
                settling.notify(PageChangeOutcome::Superseded);
                debug!(offset = self.offset, "touch absorbed in-flight animation");
                self.offset
            }
            SwiperPhase::Idle => {
                self.anchor = self.offset;
                self.offset
            }
            SwiperPhase::Tracking(_) => self.offset,
        };

        self.phase = SwiperPhase::Tracking(GestureSession {
            kind: GestureKind::Undecided,
            origin,
            refresh_armed: false,
        });

        if let Some(on_begin_touch) = &self.args.on_begin_touch {
            on_begin_touch.call();
        }
    }

    /// Feeds the displacement of the touch since it went down.
    pub fn handle_gesture_move(&mut self, dx: f32, dy: f32) {
        if !self.args.can_handle_touch {
            return;
        }
        let SwiperPhase::Tracking(session) = &mut self.phase else {
            return;
        };

        match session.kind {
            GestureKind::Undecided => {
                if dx.abs().max(dy.abs()) <= self.args.touch_slop {
                    return;
                }
                session.kind = if dx.abs() > dy.abs() {
                    GestureKind::HorizontalPage
                } else {
                    GestureKind::VerticalRefresh
                };
                trace!(kind = ?session.kind, dx, dy, "gesture classified");
            }
            GestureKind::HorizontalPage => {
                let permitted = dx == 0.0
                    || (dx > 0.0 && self.args.can_swipe_left)
                    || (dx < 0.0 && self.args.can_swipe_right);
                if permitted && self.ready {
                    self.offset = session.origin + dx;
                }
            }
            GestureKind::VerticalRefresh => {
                let throttle = self.args.refresh_throttle;
                if dy > 0.0 {
                    if let Some(on_indicator_move) = &self.args.on_indicator_move {
                        on_indicator_move.call(dy.min(throttle));
                    }
                }
                let armed = dy >= throttle;
                if armed != session.refresh_armed {
                    trace!(armed, dy, "refresh arm changed");
                    session.refresh_armed = armed;
                }
            }
        }
    }

    /// Ends the touch session and starts resolving it.
    pub fn handle_gesture_end(&mut self, now: Instant) {
        self.release(now, false);
    }

    /// Ends the touch session because the platform took the pointer away.
    ///
    /// Resolves the offset like a release but never triggers a refresh.
    pub fn handle_gesture_cancel(&mut self, now: Instant) {
        self.release(now, true);
    }

    /// Animates to the previous (`true`) or next page without a gesture.
    ///
    /// A request while another change is animating continues from the live
    /// offset and supersedes it, so only one page change is reported. A
    /// request during an active touch, or before layout, is ignored.
    pub fn change(&mut self, to_previous: bool, now: Instant) -> PageChange {
        let (completion, change) = PageChange::pending();
        if !self.ready {
            debug!(to_previous, "page change ignored before layout");
            let _ = completion.send(PageChangeOutcome::Ignored);
            return change;
        }

        match std::mem::take(&mut self.phase) {
            SwiperPhase::Tracking(session) => {
                self.phase = SwiperPhase::Tracking(session);
                debug!(to_previous, "page change ignored during touch");
                let _ = completion.send(PageChangeOutcome::Ignored);
                return change;
            }
            SwiperPhase::Settling(mut settling) => {
                self.offset = settling.tween.value_at(now);
                settling.notify(PageChangeOutcome::Superseded);
                debug!(offset = self.offset, "page change supersedes animation");
            }
            SwiperPhase::Idle => self.anchor = self.offset,
        }

        self.settle(Resolution::Commit { to_previous }, now, Some(completion));
        change
    }

    /// Advances animations and timers to `now`.
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.dispose_at.is_some_and(|at| now >= at) {
            self.dispose_at = None;
            self.dispose_indicator();
        }

        match std::mem::take(&mut self.phase) {
            SwiperPhase::Settling(settling) if settling.tween.is_finished(now) => {
                self.finish_settling(settling);
            }
            SwiperPhase::Settling(settling) => {
                self.offset = settling.tween.value_at(now);
                self.phase = SwiperPhase::Settling(settling);
            }
            other => self.phase = other,
        }

        self.has_pending_frame()
    }

    /// Whether an animation or a timer still needs frames.
    pub fn has_pending_frame(&self) -> bool {
        matches!(self.phase, SwiperPhase::Settling(_)) || self.dispose_at.is_some()
    }

    fn release(&mut self, now: Instant, cancelled: bool) {
        let session = match std::mem::take(&mut self.phase) {
            SwiperPhase::Tracking(session) => session,
            other => {
                self.phase = other;
                return;
            }
        };

        let resolution = self.resolve_release();
        debug!(kind = ?session.kind, ?resolution, offset = self.offset, "gesture released");
        self.settle(resolution, now, None);

        if session.kind == GestureKind::VerticalRefresh {
            if session.refresh_armed && !cancelled {
                // Each refresh gets its own dispose; an earlier pending one
                // fires now instead of being replaced.
                if self.dispose_at.take().is_some() {
                    self.dispose_indicator();
                }
                if let Some(on_refresh) = &self.args.on_refresh {
                    on_refresh.call();
                }
                self.dispose_at = Some(now + self.args.indicator_dispose_delay);
            } else {
                self.dispose_indicator();
            }
        }

        if let Some(on_release_touch) = &self.args.on_release_touch {
            on_release_touch.call();
        }
    }

    fn dispose_indicator(&self) {
        if let Some(on_indicator_dispose) = &self.args.on_indicator_dispose {
            on_indicator_dispose.call();
        }
    }

    fn resolve_release(&self) -> Resolution {
        if !self.ready {
            return Resolution::Rollback;
        }
        let diff = self.anchor - self.offset;
        if diff != 0.0 && diff.abs() / self.pane_width >= self.args.success_capture {
            // Dragging right (offset grows) reveals the previous pane.
            Resolution::Commit {
                to_previous: diff < 0.0,
            }
        } else {
            Resolution::Rollback
        }
    }

    fn target_for(&self, resolution: Resolution) -> f32 {
        match resolution {
            Resolution::Commit { to_previous: true } => self.anchor + self.pane_width,
            Resolution::Commit { to_previous: false } => self.anchor - self.pane_width,
            Resolution::Rollback => self.anchor,
        }
    }

    fn settle(
        &mut self,
        resolution: Resolution,
        now: Instant,
        completion: Option<oneshot::Sender<PageChangeOutcome>>,
    ) {
        let target = self.target_for(resolution);
        let mut settling = Settling {
            tween: Tween::new(self.offset, target, now, self.args.animation_duration),
            resolution,
            completion,
        };

        if resolution == Resolution::Rollback && self.offset == target {
            self.phase = SwiperPhase::Idle;
            settling.notify(PageChangeOutcome::RolledBack);
            return;
        }
        self.phase = SwiperPhase::Settling(settling);
    }

    fn finish_settling(&mut self, mut settling: Settling) {
        self.phase = SwiperPhase::Idle;
        match settling.resolution {
            Resolution::Commit { to_previous } => {
                self.offset = -self.pane_width;
                self.anchor = self.offset;
                debug!(to_previous, "page change settled");
                if let Some(on_change_page) = &self.args.on_change_page {
                    on_change_page.call(to_previous);
                }
                settling.notify(PageChangeOutcome::Committed);
            }
            Resolution::Rollback => {
                self.offset = settling.tween.to();
                trace!(offset = self.offset, "rollback settled");
                settling.notify(PageChangeOutcome::RolledBack);
            }
        }
    }
}

impl Default for SwiperController {
    fn default() -> Self {
        Self::new(SwiperArgs::default())
    }
}

/// Which of the three panes a [`Pane`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneSlot {
    /// The pane left of the viewport.
    Previous,
    /// The pane in the viewport at rest.
    Current,
    /// The pane right of the viewport.
    Next,
}

/// A placed pane produced by [`Swiper::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pane<R> {
    /// Which pane this is.
    pub slot: PaneSlot,
    /// Left edge relative to the viewport, offset included.
    pub x: f32,
    /// Pane width; zero before layout.
    pub width: f32,
    /// Host-rendered content.
    pub content: R,
}

/// A [`SwiperController`] together with the three pane producers.
pub struct Swiper<R> {
    controller: SwiperController,
    render_previous: RenderSlot<R>,
    render_current: RenderSlot<R>,
    render_next: RenderSlot<R>,
}

impl<R> Swiper<R> {
    /// Creates a swiper from its configuration and pane producers.
    pub fn new(
        args: SwiperArgs,
        render_previous: RenderSlot<R>,
        render_current: RenderSlot<R>,
        render_next: RenderSlot<R>,
    ) -> Self {
        Self {
            controller: SwiperController::new(args),
            render_previous,
            render_current,
            render_next,
        }
    }

    /// The underlying controller.
    pub fn controller(&self) -> &SwiperController {
        &self.controller
    }

    /// Mutable access to the underlying controller.
    pub fn controller_mut(&mut self) -> &mut SwiperController {
        &mut self.controller
    }

    /// Dispatches a tracked touch event to the gesture operations.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        match event.content {
            TouchEventContent::Began => self.controller.handle_gesture_start(event.timestamp),
            TouchEventContent::Moved(delta) => {
                self.controller.handle_gesture_move(delta.dx, delta.dy)
            }
            TouchEventContent::Ended => self.controller.handle_gesture_end(event.timestamp),
            TouchEventContent::Cancelled => self.controller.handle_gesture_cancel(event.timestamp),
        }
    }

    /// Renders the panes at their current positions.
    ///
    /// Before layout only the current pane is produced.
    pub fn render(&self) -> SmallVec<[Pane<R>; 3]> {
        let offset = self.controller.offset();
        if !self.controller.is_ready() {
            return smallvec![Pane {
                slot: PaneSlot::Current,
                x: offset,
                width: 0.0,
                content: self.render_current.render(),
            }];
        }

        let width = self.controller.pane_width();
        [
            (PaneSlot::Previous, &self.render_previous),
            (PaneSlot::Current, &self.render_current),
            (PaneSlot::Next, &self.render_next),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (slot, render))| Pane {
            slot,
            x: index as f32 * width + offset,
            width,
            content: render.render(),
        })
        .collect()
    }
}

impl<R> std::fmt::Debug for Swiper<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swiper")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use swipecal_ui::{TouchTracker, touch::px_position};

    use super::*;

    const WIDTH: Px = Px(300);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorded(args: SwiperArgs) -> (SwiperArgs, Log) {
        let log: Log = Arc::default();
        let push = |log: &Log, entry: &'static str| {
            let log = Arc::clone(log);
            move || log.lock().push(entry.to_owned())
        };
        let pages = Arc::clone(&log);
        let moves = Arc::clone(&log);
        let args = args
            .on_change_page(move |to_previous: bool| {
                let entry = if to_previous { "page:prev" } else { "page:next" };
                pages.lock().push(entry.to_owned());
            })
            .on_indicator_move(move |distance: f32| {
                moves.lock().push(format!("indicator:{distance}"));
            })
            .on_refresh(push(&log, "refresh"))
            .on_indicator_dispose(push(&log, "dispose"))
            .on_begin_touch(push(&log, "begin"))
            .on_release_touch(push(&log, "release"));
        (args, log)
    }

    fn laid_out(args: SwiperArgs) -> (SwiperController, Log) {
        let (args, log) = recorded(args);
        let mut controller = SwiperController::new(args);
        controller.on_layout(WIDTH);
        (controller, log)
    }

    fn count(log: &Log, entry: &str) -> usize {
        log.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    fn drag(controller: &mut SwiperController, now: Instant, dx: f32, dy: f32) {
        controller.handle_gesture_start(now);
        if dx.abs() > dy.abs() {
            controller.handle_gesture_move(dx.signum() * 5.0, 0.0);
        } else {
            controller.handle_gesture_move(0.0, 5.0);
        }
        controller.handle_gesture_move(dx, dy);
    }

    #[test]
    fn layout_anchors_offset_at_minus_width() {
        let mut controller = SwiperController::default();
        assert!(!controller.is_ready());
        assert_eq!(controller.offset(), 0.0);

        controller.on_layout(WIDTH);
        assert!(controller.is_ready());
        assert_eq!(controller.offset(), -300.0);

        controller.on_layout(Px::ZERO);
        assert!(!controller.is_ready());
    }

    #[test]
    fn drag_past_threshold_commits_to_next_page_after_settle() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, -200.0, 0.0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::HorizontalPage)
        );
        assert_eq!(controller.offset(), -500.0);

        controller.handle_gesture_end(t0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Committing { to_previous: false }
        );
        assert_eq!(count(&log, "page:next"), 0);

        assert!(controller.tick(t0 + ms(100)));
        assert!(controller.offset() < -500.0 && controller.offset() > -600.0);
        assert_eq!(count(&log, "page:next"), 0);

        assert!(!controller.tick(t0 + ms(200)));
        assert_eq!(count(&log, "page:next"), 1);
        assert_eq!(controller.offset(), -300.0);
        assert!(controller.is_idle());

        controller.tick(t0 + ms(400));
        assert_eq!(count(&log, "page:next"), 1);
    }

    #[test]
    fn short_drag_rolls_back_without_notification() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, -100.0, 0.0);
        assert_eq!(controller.offset(), -400.0);
        controller.handle_gesture_end(t0);
        assert_eq!(controller.status(), SwiperStatus::RollingBack);

        controller.tick(t0 + ms(200));
        assert_eq!(controller.offset(), -300.0);
        assert_eq!(count(&log, "page:next") + count(&log, "page:prev"), 0);
    }

    #[test]
    fn drag_right_commits_to_previous_page() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, 160.0, 10.0);
        assert_eq!(controller.offset(), -140.0);
        controller.handle_gesture_end(t0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Committing { to_previous: true }
        );

        controller.tick(t0 + ms(100));
        assert!(controller.offset() > -140.0 && controller.offset() < 0.0);
        controller.tick(t0 + ms(250));
        assert_eq!(count(&log, "page:prev"), 1);
        assert_eq!(controller.offset(), -300.0);
    }

    #[test]
    fn zero_movement_release_is_a_rollback() {
        let t0 = Instant::now();
        let (mut controller, log) =
            laid_out(SwiperArgs::default().success_capture(0.0));

        controller.handle_gesture_start(t0);
        controller.handle_gesture_end(t0);
        assert!(controller.is_idle());
        assert_eq!(controller.offset(), -300.0);
        assert_eq!(*log.lock(), vec!["begin", "release"]);
    }

    #[test]
    fn first_move_only_classifies() {
        let t0 = Instant::now();
        let (mut controller, _log) = laid_out(SwiperArgs::default().touch_slop(8.0));

        controller.handle_gesture_start(t0);
        controller.handle_gesture_move(-6.0, 2.0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::Undecided)
        );
        controller.handle_gesture_move(-20.0, 30.0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::VerticalRefresh)
        );
        // Classification is final for the session.
        controller.handle_gesture_move(-250.0, 0.0);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::VerticalRefresh)
        );
        assert_eq!(controller.offset(), -300.0);
    }

    #[test]
    fn armed_pull_refreshes_then_disposes_after_delay() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, 0.0, 95.0);
        assert_eq!(count(&log, "indicator:90"), 1);

        controller.handle_gesture_end(t0);
        assert_eq!(count(&log, "refresh"), 1);
        assert_eq!(count(&log, "dispose"), 0);
        assert!(controller.has_pending_frame());

        controller.tick(t0 + ms(199));
        assert_eq!(count(&log, "dispose"), 0);
        assert!(!controller.tick(t0 + ms(200)));
        assert_eq!(count(&log, "dispose"), 1);
        assert_eq!(count(&log, "page:next") + count(&log, "page:prev"), 0);
    }

    #[test]
    fn back_to_back_refreshes_dispose_twice() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, 0.0, 95.0);
        controller.handle_gesture_end(t0);
        assert_eq!(count(&log, "dispose"), 0);

        let t1 = t0 + ms(50);
        drag(&mut controller, t1, 0.0, 95.0);
        controller.handle_gesture_end(t1);
        assert_eq!(count(&log, "refresh"), 2);
        assert_eq!(count(&log, "dispose"), 1);
        assert!(controller.has_pending_frame());

        controller.tick(t0 + ms(200));
        assert_eq!(count(&log, "dispose"), 1);
        assert!(!controller.tick(t1 + ms(200)));
        assert_eq!(count(&log, "dispose"), 2);
    }

    #[test]
    fn unarmed_pull_disposes_immediately() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, 0.0, 95.0);
        controller.handle_gesture_move(0.0, 40.0);
        assert_eq!(count(&log, "indicator:40"), 1);

        controller.handle_gesture_end(t0);
        assert_eq!(count(&log, "refresh"), 0);
        assert_eq!(count(&log, "dispose"), 1);
        assert!(!controller.has_pending_frame());
    }

    #[test]
    fn cancelled_pull_never_refreshes() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, 0.0, 120.0);
        controller.handle_gesture_cancel(t0);
        assert_eq!(count(&log, "refresh"), 0);
        assert_eq!(count(&log, "dispose"), 1);
    }

    #[test]
    fn touch_mid_animation_continues_from_live_value() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, -200.0, 0.0);
        controller.handle_gesture_end(t0);
        let t1 = t0 + ms(100);
        controller.tick(t1);
        let live = controller.offset();
        assert!((live - -550.0).abs() < 0.5);

        controller.handle_gesture_start(t1);
        assert_eq!(controller.offset(), live);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::Undecided)
        );

        controller.handle_gesture_move(-3.0, 0.0);
        controller.handle_gesture_move(-10.0, 0.0);
        assert_eq!(controller.offset(), live - 10.0);

        // The interrupted commit never reports; the continuation does.
        controller.tick(t1 + ms(500));
        assert_eq!(count(&log, "page:next"), 0);

        controller.handle_gesture_end(t1);
        controller.tick(t1 + ms(200));
        assert_eq!(count(&log, "page:next"), 1);
        assert_eq!(controller.offset(), -300.0);
    }

    #[test]
    fn interrupted_commit_can_be_dragged_back() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        drag(&mut controller, t0, -200.0, 0.0);
        controller.handle_gesture_end(t0);
        controller.tick(t0 + ms(100));

        drag(&mut controller, t0 + ms(100), 200.0, 0.0);
        assert!((controller.offset() - -350.0).abs() < 0.5);
        controller.handle_gesture_end(t0 + ms(100));
        assert_eq!(controller.status(), SwiperStatus::RollingBack);

        controller.tick(t0 + ms(400));
        assert_eq!(controller.offset(), -300.0);
        assert!(log.lock().iter().all(|e| !e.starts_with("page:")));
    }

    #[test]
    fn direction_flags_veto_dragging() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default().can_swipe_right(false));

        drag(&mut controller, t0, -250.0, 0.0);
        assert_eq!(controller.offset(), -300.0);
        controller.handle_gesture_end(t0);
        assert!(controller.is_idle());

        drag(&mut controller, t0, 250.0, 0.0);
        assert_eq!(controller.offset(), -50.0);
        controller.handle_gesture_end(t0);
        controller.tick(t0 + ms(200));
        assert_eq!(count(&log, "page:prev"), 1);
    }

    #[test]
    fn disabled_touch_handling_ignores_gestures() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default().can_handle_touch(false));

        drag(&mut controller, t0, -250.0, 0.0);
        controller.handle_gesture_end(t0);
        assert!(controller.is_idle());
        assert_eq!(controller.offset(), -300.0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn programmatic_change_resolves_after_settle() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        let mut change = controller.change(false, t0);
        assert_eq!(change.try_outcome(), None);
        controller.tick(t0 + ms(100));
        assert_eq!(count(&log, "page:next"), 0);

        controller.tick(t0 + ms(200));
        assert_eq!(count(&log, "page:next"), 1);
        assert_eq!(pollster::block_on(change), PageChangeOutcome::Committed);
        assert_eq!(controller.offset(), -300.0);
    }

    #[test]
    fn overlapping_requests_report_one_change() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        let first = controller.change(true, t0);
        controller.tick(t0 + ms(50));
        let second = controller.change(true, t0 + ms(50));
        assert_eq!(pollster::block_on(first), PageChangeOutcome::Superseded);

        controller.tick(t0 + ms(150));
        assert_eq!(count(&log, "page:prev"), 0);
        controller.tick(t0 + ms(250));
        assert_eq!(count(&log, "page:prev"), 1);
        assert_eq!(pollster::block_on(second), PageChangeOutcome::Committed);
    }

    #[test]
    fn touch_supersedes_programmatic_change() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        let change = controller.change(false, t0);
        controller.tick(t0 + ms(20));
        controller.handle_gesture_start(t0 + ms(20));
        assert_eq!(pollster::block_on(change), PageChangeOutcome::Superseded);

        // Released close to the anchor: back to the original page.
        controller.handle_gesture_end(t0 + ms(20));
        controller.tick(t0 + ms(300));
        assert_eq!(controller.offset(), -300.0);
        assert_eq!(count(&log, "page:next"), 0);
    }

    #[test]
    fn requests_are_ignored_before_layout_and_during_touch() {
        let t0 = Instant::now();
        let mut controller = SwiperController::default();
        let change = controller.change(true, t0);
        assert_eq!(pollster::block_on(change), PageChangeOutcome::Ignored);

        controller.on_layout(WIDTH);
        controller.handle_gesture_start(t0);
        let change = controller.change(true, t0);
        assert_eq!(pollster::block_on(change), PageChangeOutcome::Ignored);
        assert_eq!(
            controller.status(),
            SwiperStatus::Tracking(GestureKind::Undecided)
        );
    }

    #[test]
    fn gestures_before_layout_never_commit() {
        let t0 = Instant::now();
        let (args, log) = recorded(SwiperArgs::default());
        let mut controller = SwiperController::new(args);

        drag(&mut controller, t0, -250.0, 0.0);
        assert_eq!(controller.offset(), 0.0);
        controller.handle_gesture_end(t0);
        controller.tick(t0 + ms(500));
        assert_eq!(count(&log, "page:next"), 0);
    }

    #[test]
    fn resize_during_commit_completes_it_once() {
        let t0 = Instant::now();
        let (mut controller, log) = laid_out(SwiperArgs::default());

        let change = controller.change(false, t0);
        controller.tick(t0 + ms(50));
        controller.on_layout(Px(400));
        assert_eq!(count(&log, "page:next"), 1);
        assert_eq!(controller.offset(), -400.0);
        assert_eq!(pollster::block_on(change), PageChangeOutcome::Committed);

        controller.tick(t0 + ms(500));
        assert_eq!(count(&log, "page:next"), 1);
    }

    #[test]
    fn offset_rests_at_minus_width_after_mixed_sequences() {
        let mut now = Instant::now();
        let (mut controller, _log) = laid_out(SwiperArgs::default());

        for dx in [-200.0, 90.0, 180.0, -10.0, 0.0, -299.0] {
            drag(&mut controller, now, dx, 0.0);
            controller.handle_gesture_end(now);
            now += ms(250);
            controller.tick(now);
            assert!(controller.is_idle());
            assert_eq!(controller.offset(), -controller.pane_width());
        }
    }

    #[test]
    fn render_places_three_panes_after_layout() {
        let mut swiper = Swiper::new(
            SwiperArgs::default(),
            RenderSlot::new(|| "previous"),
            RenderSlot::new(|| "current"),
            RenderSlot::new(|| "next"),
        );

        let panes = swiper.render();
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].slot, PaneSlot::Current);
        assert_eq!(panes[0].content, "current");

        swiper.controller_mut().on_layout(WIDTH);
        let panes = swiper.render();
        let placed: Vec<_> = panes.iter().map(|p| (p.content, p.x)).collect();
        assert_eq!(
            placed,
            vec![("previous", -300.0), ("current", 0.0), ("next", 300.0)]
        );
    }

    #[test]
    fn touch_events_drive_the_controller() {
        let t0 = Instant::now();
        let (args, log) = recorded(SwiperArgs::default());
        let mut swiper = Swiper::new(
            args,
            RenderSlot::new(|| ()),
            RenderSlot::new(|| ()),
            RenderSlot::new(|| ()),
        );
        swiper.controller_mut().on_layout(WIDTH);

        let mut tracker = TouchTracker::new();
        let events = [
            tracker.touch_start(7, px_position(250, 100), t0),
            tracker.touch_move(7, px_position(240, 101), t0 + ms(16)),
            tracker.touch_move(7, px_position(50, 104), t0 + ms(32)),
            tracker.touch_end(7, t0 + ms(48)),
        ];
        for event in events.iter().flatten() {
            swiper.handle_touch(event);
        }

        swiper.controller_mut().tick(t0 + ms(300));
        assert_eq!(count(&log, "page:next"), 1);
    }
}
