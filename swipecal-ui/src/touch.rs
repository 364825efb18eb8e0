//! Touch tracking for single-pointer gestures.
//!
//! [`TouchTracker`] follows the first pointer that goes down and reports
//! its movement as a displacement from where it started, which is the
//! shape gesture recognizers want: a classifier compares `|dx|` against
//! `|dy|` of the whole gesture, not of the last frame. Additional pointers
//! are ignored until the tracked one lifts.

use std::time::Instant;

use tracing::trace;

use crate::px::{Px, PxPosition};

/// Cumulative displacement of the tracked pointer since touch-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureDelta {
    /// Horizontal displacement; positive to the right.
    pub dx: f32,
    /// Vertical displacement; positive downward.
    pub dy: f32,
}

/// A touch event with timing information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// When the event occurred.
    pub timestamp: Instant,
    /// What happened.
    pub content: TouchEventContent,
}

/// The kind of touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEventContent {
    /// The tracked pointer went down.
    Began,
    /// The tracked pointer moved; the delta is measured from touch-down.
    Moved(GestureDelta),
    /// The tracked pointer lifted.
    Ended,
    /// The platform took the pointer away (e.g. a parent claimed it).
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    id: u64,
    start: PxPosition,
}

/// Converts raw touch points into [`TouchEvent`]s for one pointer.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: Option<ActiveTouch>,
}

impl TouchTracker {
    /// Creates an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pointer is currently tracked.
    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Handles a pointer going down.
    pub fn touch_start(
        &mut self,
        touch_id: u64,
        position: PxPosition,
        now: Instant,
    ) -> Option<TouchEvent> {
        if let Some(active) = self.active {
            trace!(tracked = active.id, ignored = touch_id, "extra pointer ignored");
            return None;
        }
        self.active = Some(ActiveTouch {
            id: touch_id,
            start: position,
        });
        Some(TouchEvent {
            timestamp: now,
            content: TouchEventContent::Began,
        })
    }

    /// Handles pointer movement.
    pub fn touch_move(
        &mut self,
        touch_id: u64,
        position: PxPosition,
        now: Instant,
    ) -> Option<TouchEvent> {
        let active = self.active.filter(|active| active.id == touch_id)?;
        let delta = position - active.start;
        Some(TouchEvent {
            timestamp: now,
            content: TouchEventContent::Moved(GestureDelta {
                dx: delta.x.to_f32(),
                dy: delta.y.to_f32(),
            }),
        })
    }

    /// Handles a pointer lifting.
    pub fn touch_end(&mut self, touch_id: u64, now: Instant) -> Option<TouchEvent> {
        self.finish(touch_id, now, TouchEventContent::Ended)
    }

    /// Handles the platform cancelling a pointer.
    pub fn touch_cancel(&mut self, touch_id: u64, now: Instant) -> Option<TouchEvent> {
        self.finish(touch_id, now, TouchEventContent::Cancelled)
    }

    fn finish(
        &mut self,
        touch_id: u64,
        now: Instant,
        content: TouchEventContent,
    ) -> Option<TouchEvent> {
        self.active.filter(|active| active.id == touch_id)?;
        self.active = None;
        Some(TouchEvent {
            timestamp: now,
            content,
        })
    }
}

/// Shorthand for building a position from raw pixel values.
pub fn px_position(x: i32, y: i32) -> PxPosition {
    PxPosition::new(Px(x), Px(y))
}
