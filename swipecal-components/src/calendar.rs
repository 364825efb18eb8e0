//! Swipe-paged month calendar.
//!
//! ## Usage
//!
//! Show a month grid that pages with horizontal swipes or header arrows,
//! for date pickers, agendas and booking screens.
//!
//! [`Calendar`] wires three pieces together: a [`CalendarHeader`], a
//! [`Swiper`] whose panes render the previous, displayed and next month,
//! and the [`CalendarState`] month controller shared by both. The swiper's
//! settled page changes are the only gesture-driven path that moves the
//! displayed month.
use std::time::Instant;

use smallvec::SmallVec;
use swipecal_ui::{Px, RenderSlot, State, TouchEvent};
use tracing::{debug, warn};

use crate::{
    calendar_header::{ArrowDirection, CalendarHeader, HeaderRenderArgs, HeaderView},
    calendar_state::{CalendarArgs, CalendarDefaults, CalendarState, MonthPage},
    date::{CalendarDate, DateError, YearMonth},
    swiper::{Pane, PageChange, Swiper, SwiperArgs},
};

/// A rendered frame of the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    /// Header above the panes.
    pub header: HeaderView,
    /// Month panes at their current positions.
    pub panes: SmallVec<[Pane<MonthPage>; 3]>,
}

/// A month calendar paged by a three-pane swiper.
#[derive(Debug)]
pub struct Calendar {
    state: State<CalendarState>,
    swiper: Swiper<MonthPage>,
    header: CalendarHeader,
}

impl Calendar {
    /// Swiper configuration used by [`Calendar::new`].
    pub fn default_swiper_args() -> SwiperArgs {
        SwiperArgs::default()
            .success_capture(CalendarDefaults::SUCCESS_CAPTURE)
            .animation_duration(CalendarDefaults::PAGE_ANIMATION)
    }

    /// Creates a calendar with the default swiper configuration.
    pub fn new(args: CalendarArgs, now: Instant) -> Self {
        Self::with_swiper_args(args, Self::default_swiper_args(), now)
    }

    /// Creates a calendar with custom swiper configuration, e.g. to attach
    /// pull-to-refresh hooks. The page change hook is always replaced by the
    /// calendar's own.
    pub fn with_swiper_args(args: CalendarArgs, swiper_args: SwiperArgs, now: Instant) -> Self {
        let state = State::new(CalendarState::new(args));

        let committed = state.clone();
        let swiper_args = swiper_args.on_change_page(move |moved_to_previous: bool| {
            committed
                .with_mut(|state| state.on_page_committed(moved_to_previous, false))
                .dispatch();
        });
        let pane = |month_offset: i32| {
            let state = state.clone();
            RenderSlot::new(move || state.with(|state| state.render_pane(month_offset)))
        };
        let swiper = Swiper::new(swiper_args, pane(-1), pane(0), pane(1));

        let month = state.with(CalendarState::displayed_month);
        let header = CalendarHeader::new(month, CalendarDefaults::HEADER_ANIMATION, now);
        debug!(%month, "calendar created");

        Self {
            state,
            swiper,
            header,
        }
    }

    /// Shared month state.
    pub fn state(&self) -> &State<CalendarState> {
        &self.state
    }

    /// The pane carousel.
    pub fn swiper(&self) -> &Swiper<MonthPage> {
        &self.swiper
    }

    /// The header.
    pub fn header(&self) -> &CalendarHeader {
        &self.header
    }

    /// The month in the current pane.
    pub fn displayed_month(&self) -> YearMonth {
        self.state.with(CalendarState::displayed_month)
    }

    /// Records the width available to one pane.
    pub fn layout(&mut self, width: Px, now: Instant) {
        self.swiper.controller_mut().on_layout(width);
        self.sync_header(now);
    }

    /// Feeds a tracked touch event to the swiper.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        self.swiper.handle_touch(event);
    }

    /// Advances the swiper and header animations. Returns whether another
    /// frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let swiper_pending = self.swiper.controller_mut().tick(now);
        self.sync_header(now);
        let header_pending = self.header.tick(now);
        swiper_pending || header_pending
    }

    /// Handles a tap on a header arrow. Ignored when arrows are hidden.
    pub fn press_arrow(&mut self, direction: ArrowDirection, now: Instant) -> Option<PageChange> {
        if self.state.with(|state| state.args().hide_arrows) {
            return None;
        }
        let to_previous = direction.month_delta() == -1;
        Some(self.swiper.controller_mut().change(to_previous, now))
    }

    /// Moves the displayed month by `count`.
    ///
    /// Arrow navigation animates through the swiper and returns its
    /// completion; other callers change the month directly. Months chrono
    /// cannot represent are rejected and the displayed month is kept.
    pub fn add_month(
        &mut self,
        count: i32,
        from_arrow: bool,
        now: Instant,
    ) -> Result<Option<PageChange>, DateError> {
        if from_arrow {
            return Ok(Some(self.swiper.controller_mut().change(count == -1, now)));
        }
        let notifications = self
            .state
            .with_mut(|state| state.add_months(count))
            .inspect_err(|err| warn!(%err, count, "rejected month change"))?;
        self.sync_header(now);
        notifications.dispatch();
        Ok(None)
    }

    /// Handles a tap on a day. Returns whether it was accepted.
    pub fn press_day(&mut self, day: CalendarDate, now: Instant) -> bool {
        let notifications = self.state.with_mut(|state| state.press_day(day));
        self.sync_header(now);
        match notifications {
            Some(notifications) => {
                notifications.dispatch();
                true
            }
            None => false,
        }
    }

    /// Follows a controlled current date without notifying listeners.
    pub fn set_current(&mut self, date: CalendarDate, now: Instant) -> bool {
        let changed = self
            .state
            .with_mut(|state| state.request_jump_to_month(date.year_month()));
        self.sync_header(now);
        changed
    }

    /// Like [`Calendar::set_current`], parsing a `YYYY-MM-DD` date.
    pub fn set_current_str(&mut self, input: &str, now: Instant) -> Result<bool, DateError> {
        match input.parse::<CalendarDate>() {
            Ok(date) => Ok(self.set_current(date, now)),
            Err(err) => {
                warn!(%err, "rejected current date");
                Err(err)
            }
        }
    }

    /// Replaces the configuration. Returns whether the displayed month
    /// changed.
    pub fn set_args(&mut self, args: CalendarArgs, now: Instant) -> bool {
        let changed = self.state.with_mut(|state| state.set_args(args));
        self.sync_header(now);
        changed
    }

    /// Renders the header and the panes.
    pub fn render(&self) -> CalendarView {
        let header = self.state.with(|state| {
            let args = state.args();
            self.header.render(HeaderRenderArgs {
                month_format: &args.month_format,
                hide_arrows: args.hide_arrows,
                render_arrow: args.render_arrow.as_ref(),
                show_indicator: state.should_show_indicator(),
            })
        });
        CalendarView {
            header,
            panes: self.swiper.render(),
        }
    }

    fn sync_header(&mut self, now: Instant) {
        let month = self.displayed_month();
        self.header.set_month(month, now);
    }
}
