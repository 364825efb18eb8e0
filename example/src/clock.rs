use std::time::{Duration, Instant};

use tracing::trace;

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 600;

/// Virtual frame clock driving animations without sleeping.
pub struct FrameClock {
    now: Instant,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    /// Steps frames until `frame` reports nothing pending.
    pub fn run_until_idle(&mut self, mut frame: impl FnMut(Instant) -> bool) {
        for index in 0..MAX_FRAMES {
            let now = self.advance(FRAME);
            if !frame(now) {
                trace!(frames = index + 1, "idle");
                return;
            }
        }
    }
}
