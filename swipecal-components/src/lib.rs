//! Swipe-paged calendar components for swipecal.
//!
//! # Usage
//!
//! The [`swiper`] module provides the three-pane carousel with its gesture
//! classifier; [`calendar`] builds a month calendar on top of it. Hosts
//! feed layout widths, touch events and frame instants, and read back
//! render descriptions.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use swipecal_components::{
//!     calendar::Calendar,
//!     calendar_state::CalendarArgs,
//!     date::{CalendarDate, YearMonth},
//! };
//! use swipecal_ui::{Px, TouchTracker, touch::px_position};
//!
//! # fn main() -> Result<(), swipecal_components::date::DateError> {
//! let start = Instant::now();
//! let args = CalendarArgs::default().current(CalendarDate::new(2024, 3, 10)?);
//! let mut calendar = Calendar::new(args, start);
//! calendar.layout(Px(300), start);
//!
//! // Swipe left by two thirds of the pane width.
//! let mut touch = TouchTracker::new();
//! let events = [
//!     touch.touch_start(0, px_position(250, 80), start),
//!     touch.touch_move(0, px_position(240, 80), start),
//!     touch.touch_move(0, px_position(50, 80), start),
//!     touch.touch_end(0, start),
//! ];
//! for event in events.iter().flatten() {
//!     calendar.handle_touch(event);
//! }
//!
//! calendar.tick(start + Duration::from_millis(450));
//! assert_eq!(calendar.displayed_month(), YearMonth::new(2024, 4)?);
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod calendar;
pub mod calendar_header;
pub mod calendar_state;
pub mod date;
pub mod day;
pub mod swiper;
