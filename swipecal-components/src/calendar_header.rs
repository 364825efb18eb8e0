//! Month title, navigation arrows and loading indicator above the panes.
//!
//! ## Usage
//!
//! The header follows the displayed month. When it changes, the title fades
//! out and back in; the label itself switches once the fade-out completes,
//! so the new month appears during the fade-in. Rapid changes restart the
//! label timer and only the latest month is shown.
use std::time::{Duration, Instant};

use swipecal_ui::{CallbackWith, Tween};
use tracing::trace;

use crate::date::YearMonth;

/// Which navigation arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    /// Previous month.
    Left,
    /// Next month.
    Right,
}

impl ArrowDirection {
    /// Month delta the arrow navigates by.
    pub fn month_delta(self) -> i32 {
        match self {
            ArrowDirection::Left => -1,
            ArrowDirection::Right => 1,
        }
    }

    fn default_glyph(self) -> &'static str {
        match self {
            ArrowDirection::Left => "‹",
            ArrowDirection::Right => "›",
        }
    }
}

/// A rendered navigation arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowView {
    /// Which arrow.
    pub direction: ArrowDirection,
    /// Content produced by the arrow renderer.
    pub content: String,
}

/// Visual description of the header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    /// Formatted month title.
    pub title: String,
    /// Title opacity in [0.0, 1.0].
    pub opacity: f32,
    /// Whether the loading indicator is shown next to the title.
    pub show_indicator: bool,
    /// Left arrow, absent when arrows are hidden.
    pub left_arrow: Option<ArrowView>,
    /// Right arrow, absent when arrows are hidden.
    pub right_arrow: Option<ArrowView>,
}

/// Options the header reads when rendering.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRenderArgs<'a> {
    /// `chrono` format string for the title.
    pub month_format: &'a str,
    /// Omit the arrows.
    pub hide_arrows: bool,
    /// Custom arrow renderer.
    pub render_arrow: Option<&'a CallbackWith<ArrowDirection, String>>,
    /// Show the loading indicator.
    pub show_indicator: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fade {
    In(Tween),
    OutThenIn(Tween),
}

/// Animated header state.
#[derive(Debug, Clone)]
pub struct CalendarHeader {
    month: YearMonth,
    label_month: YearMonth,
    swap_at: Option<Instant>,
    fade: Option<Fade>,
    opacity: f32,
    animation_duration: Duration,
}

impl CalendarHeader {
    /// Creates a header showing `month`, fading in from transparent.
    pub fn new(month: YearMonth, animation_duration: Duration, now: Instant) -> Self {
        Self {
            month,
            label_month: month,
            swap_at: None,
            fade: Some(Fade::In(Tween::new(0.0, 1.0, now, animation_duration))),
            opacity: 0.0,
            animation_duration,
        }
    }

    /// The month the header is following.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// The month currently printed in the title.
    pub fn label_month(&self) -> YearMonth {
        self.label_month
    }

    /// Current title opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Follows a new displayed month. Returns whether it changed.
    pub fn set_month(&mut self, month: YearMonth, now: Instant) -> bool {
        if month == self.month {
            return false;
        }
        self.month = month;
        self.swap_at = Some(now + self.animation_duration);
        self.fade = Some(Fade::OutThenIn(Tween::new(
            self.opacity,
            0.0,
            now,
            self.animation_duration,
        )));
        trace!(%month, "header month changed");
        true
    }

    /// Advances the fade and the label timer. Returns whether another frame
    /// is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.swap_at.is_some_and(|at| now >= at) {
            self.swap_at = None;
            self.label_month = self.month;
        }

        self.fade = match self.fade {
            Some(Fade::OutThenIn(out)) if out.is_finished(now) => {
                let fade_in = Tween::new(0.0, 1.0, out.ends_at(), self.animation_duration);
                self.opacity = fade_in.value_at(now);
                (!fade_in.is_finished(now)).then_some(Fade::In(fade_in))
            }
            Some(Fade::OutThenIn(out)) => {
                self.opacity = out.value_at(now);
                Some(Fade::OutThenIn(out))
            }
            Some(Fade::In(fade_in)) => {
                self.opacity = fade_in.value_at(now);
                (!fade_in.is_finished(now)).then_some(Fade::In(fade_in))
            }
            None => None,
        };

        self.swap_at.is_some() || self.fade.is_some()
    }

    /// Renders the header.
    pub fn render(&self, args: HeaderRenderArgs<'_>) -> HeaderView {
        let arrow = |direction: ArrowDirection| {
            (!args.hide_arrows).then(|| ArrowView {
                direction,
                content: args.render_arrow.map_or_else(
                    || direction.default_glyph().to_owned(),
                    |render| render.call(direction),
                ),
            })
        };

        HeaderView {
            title: self.label_month.format(args.month_format),
            opacity: self.opacity,
            show_indicator: args.show_indicator,
            left_arrow: arrow(ArrowDirection::Left),
            right_arrow: arrow(ArrowDirection::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(350);

    fn month(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn render_args() -> HeaderRenderArgs<'static> {
        HeaderRenderArgs {
            month_format: "%B %Y",
            hide_arrows: false,
            render_arrow: None,
            show_indicator: false,
        }
    }

    #[test]
    fn fades_in_on_creation() {
        let t0 = Instant::now();
        let mut header = CalendarHeader::new(month(2024, 3), DURATION, t0);
        assert_eq!(header.opacity(), 0.0);
        assert!(!header.tick(t0 + DURATION));
        assert_eq!(header.opacity(), 1.0);
        assert_eq!(header.render(render_args()).title, "March 2024");
    }

    #[test]
    fn label_swaps_after_fade_out() {
        let t0 = Instant::now();
        let mut header = CalendarHeader::new(month(2024, 3), DURATION, t0);
        header.tick(t0 + DURATION);

        let t1 = t0 + Duration::from_secs(1);
        assert!(header.set_month(month(2024, 4), t1));
        assert!(!header.set_month(month(2024, 4), t1));

        header.tick(t1 + Duration::from_millis(200));
        assert_eq!(header.label_month(), month(2024, 3));
        assert!(header.opacity() < 1.0);

        header.tick(t1 + DURATION);
        assert_eq!(header.label_month(), month(2024, 4));
        assert_eq!(header.opacity(), 0.0);

        assert!(!header.tick(t1 + DURATION * 2));
        assert_eq!(header.opacity(), 1.0);
    }

    #[test]
    fn rapid_changes_restart_the_label_timer() {
        let t0 = Instant::now();
        let mut header = CalendarHeader::new(month(2024, 3), DURATION, t0);
        header.set_month(month(2024, 4), t0);
        header.set_month(month(2024, 5), t0 + Duration::from_millis(300));

        header.tick(t0 + DURATION);
        assert_eq!(header.label_month(), month(2024, 3));
        header.tick(t0 + Duration::from_millis(650));
        assert_eq!(header.label_month(), month(2024, 5));
    }

    #[test]
    fn arrows_use_custom_renderer_unless_hidden() {
        let t0 = Instant::now();
        let header = CalendarHeader::new(month(2024, 3), DURATION, t0);
        let renderer = CallbackWith::new(|direction: ArrowDirection| format!("{direction:?}"));

        let view = header.render(HeaderRenderArgs {
            render_arrow: Some(&renderer),
            show_indicator: true,
            ..render_args()
        });
        assert_eq!(view.left_arrow.map(|arrow| arrow.content).as_deref(), Some("Left"));
        assert_eq!(view.right_arrow.map(|arrow| arrow.content).as_deref(), Some("Right"));
        assert!(view.show_indicator);

        let view = header.render(HeaderRenderArgs {
            hide_arrows: true,
            ..render_args()
        });
        assert!(view.left_arrow.is_none() && view.right_arrow.is_none());
    }

    #[test]
    fn default_arrows_and_custom_format() {
        let t0 = Instant::now();
        let header = CalendarHeader::new(month(2025, 1), DURATION, t0);
        let view = header.render(HeaderRenderArgs {
            month_format: "%Y/%m",
            ..render_args()
        });
        assert_eq!(view.title, "2025/01");
        assert_eq!(view.left_arrow.map(|arrow| arrow.content).as_deref(), Some("‹"));
        assert_eq!(ArrowDirection::Left.month_delta(), -1);
    }
}
