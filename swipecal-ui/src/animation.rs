//! Timed animation primitives.
//!
//! A [`Tween`] interpolates a scalar between two values over a fixed
//! duration. It holds no clock of its own: callers sample it with the
//! `Instant` of the frame being produced, which keeps every animation
//! deterministic under test.

use std::time::{Duration, Instant};

/// Cubic ease-in-out mapping.
/// Input: linear progress in [0.0, 1.0].
/// Output: eased progress in [0.0, 1.0].
pub fn easing(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A scalar animation from `from` to `to` starting at `started_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
}

impl Tween {
    /// Creates a tween. A zero duration finishes on the first sample.
    pub fn new(from: f32, to: f32, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Start value.
    pub fn from(&self) -> f32 {
        self.from
    }

    /// Target value.
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Instant at which the tween reaches its target.
    pub fn ends_at(&self) -> Instant {
        self.started_at + self.duration
    }

    /// Linear progress in [0.0, 1.0] at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased value at `now`. Returns exactly `to` once finished.
    pub fn value_at(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * easing(progress)
    }

    /// Whether the tween has reached its target at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.ends_at()
    }
}
