//! Headless UI primitives for swipecal.
//!
//! This crate holds the pieces components share but that carry no
//! calendar knowledge: pixel units, comparable callback handles, a shared
//! state handle, time-sampled tweens and a single-pointer touch tracker.
//!
//! Nothing here owns a clock or an event loop. Hosts feed touch points and
//! frame instants in; components answer with render descriptions.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use swipecal_ui::{Tween, State};
//!
//! let start = Instant::now();
//! let offset = State::new(-300.0_f32);
//! let tween = Tween::new(-300.0, -600.0, start, Duration::from_millis(200));
//!
//! offset.set(tween.value_at(start + Duration::from_millis(200)));
//! assert_eq!(offset.get(), -600.0);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod animation;
pub mod logging;
pub mod prop;
pub mod px;
pub mod state;
pub mod touch;

pub use animation::{Tween, easing};
pub use logging::{init_tracing, init_tracing_with};
pub use prop::{Callback, CallbackWith, RenderSlot};
pub use px::{Px, PxPosition};
pub use state::State;
pub use touch::{GestureDelta, TouchEvent, TouchEventContent, TouchTracker};
