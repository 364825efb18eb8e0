//! Month paging controller: the displayed month and the month panes.
//!
//! ## Usage
//!
//! [`CalendarState`] owns the displayed month of a swipe calendar. The
//! carousel reports settled page changes through
//! [`CalendarState::on_page_committed`]; hosts push controlled values
//! through [`CalendarState::request_jump_to_month`]. Panes are described by
//! [`CalendarState::render_pane`], relative to the displayed month.
//!
//! Mutating methods do not call listeners themselves. They return
//! [`CalendarNotifications`], which the caller dispatches once it no longer
//! holds the state, so a listener may read the state it was notified about.
use std::time::Duration;

use chrono::Weekday;
use derive_setters::Setters;
use smallvec::SmallVec;
use swipecal_ui::CallbackWith;
use tracing::{debug, trace, warn};

use crate::{
    calendar_header::ArrowDirection,
    date::{
        CalendarDate, DAYS_PER_WEEK, DateError, YearMonth, month_page, weekday_names,
        weekday_sequence,
    },
    day::{DayMarking, DayProps, DayState, DayView, MarkedDates, basic_day},
};

/// Defaults for the calendar.
pub struct CalendarDefaults;

impl CalendarDefaults {
    /// Fraction of the pane width a swipe must cover to change month.
    pub const SUCCESS_CAPTURE: f32 = 0.4;
    /// Duration of the month paging animation.
    pub const PAGE_ANIMATION: Duration = Duration::from_millis(450);
    /// Duration of each half of the header title fade.
    pub const HEADER_ANIMATION: Duration = Duration::from_millis(350);
    /// Default `chrono` format of the header title.
    pub const MONTH_FORMAT: &'static str = "%B %Y";
    /// Default first day of the week.
    pub const FIRST_DAY: Weekday = Weekday::Sun;
}

/// Configuration for [`CalendarState`] and the calendar composite.
#[derive(Clone, Debug, Setters)]
pub struct CalendarArgs {
    /// Controlled current date; its month is displayed.
    #[setters(strip_option)]
    pub current: Option<CalendarDate>,
    /// Selected days.
    #[setters(into)]
    pub selected: Vec<CalendarDate>,
    /// Earliest pressable day, inclusive.
    #[setters(strip_option)]
    pub min_date: Option<CalendarDate>,
    /// Latest pressable day, inclusive.
    #[setters(strip_option)]
    pub max_date: Option<CalendarDate>,
    /// First column of every week.
    pub first_day: Weekday,
    /// Per-day markings.
    #[setters(strip_option)]
    pub marked_dates: Option<MarkedDates>,
    /// Hide the header navigation arrows.
    pub hide_arrows: bool,
    /// Render days of neighbouring months as empty placeholders.
    pub hide_extra_days: bool,
    /// Show a loading indicator until the displayed month's last day is
    /// marked.
    pub display_loading_indicator: bool,
    /// `chrono` format of the header title.
    #[setters(into)]
    pub month_format: String,
    /// Overrides the current date used for the `Today` state.
    #[setters(strip_option)]
    pub today: Option<CalendarDate>,
    /// Called with a pressed in-range day.
    #[setters(skip)]
    pub on_day_press: Option<CallbackWith<CalendarDate>>,
    /// Called with the new displayed month.
    #[setters(skip)]
    pub on_month_change: Option<CallbackWith<YearMonth>>,
    /// Called with the months now visible.
    #[setters(skip)]
    pub on_visible_months_change: Option<CallbackWith<Vec<YearMonth>>>,
    /// Renders one day.
    #[setters(skip)]
    pub day_renderer: CallbackWith<DayProps, DayView>,
    /// Renders a header arrow; the header uses plain glyphs when unset.
    #[setters(skip)]
    pub render_arrow: Option<CallbackWith<ArrowDirection, String>>,
}

impl Default for CalendarArgs {
    fn default() -> Self {
        Self {
            current: None,
            selected: Vec::new(),
            min_date: None,
            max_date: None,
            first_day: CalendarDefaults::FIRST_DAY,
            marked_dates: None,
            hide_arrows: false,
            hide_extra_days: false,
            display_loading_indicator: false,
            month_format: CalendarDefaults::MONTH_FORMAT.to_owned(),
            today: None,
            on_day_press: None,
            on_month_change: None,
            on_visible_months_change: None,
            day_renderer: CallbackWith::new(basic_day),
            render_arrow: None,
        }
    }
}

impl CalendarArgs {
    /// Sets the day press listener.
    pub fn on_day_press(mut self, on_day_press: impl Into<CallbackWith<CalendarDate>>) -> Self {
        self.on_day_press = Some(on_day_press.into());
        self
    }

    /// Sets the month change listener.
    pub fn on_month_change(mut self, on_month_change: impl Into<CallbackWith<YearMonth>>) -> Self {
        self.on_month_change = Some(on_month_change.into());
        self
    }

    /// Sets the visible months listener.
    pub fn on_visible_months_change(
        mut self,
        on_visible_months_change: impl Into<CallbackWith<Vec<YearMonth>>>,
    ) -> Self {
        self.on_visible_months_change = Some(on_visible_months_change.into());
        self
    }

    /// Replaces the day renderer.
    pub fn day_renderer(
        mut self,
        day_renderer: impl Into<CallbackWith<DayProps, DayView>>,
    ) -> Self {
        self.day_renderer = day_renderer.into();
        self
    }

    /// Sets a custom arrow renderer.
    pub fn render_arrow(
        mut self,
        render_arrow: impl Into<CallbackWith<ArrowDirection, String>>,
    ) -> Self {
        self.render_arrow = Some(render_arrow.into());
        self
    }

    fn initial_month(&self) -> YearMonth {
        self.current
            .or_else(|| self.selected.first().copied())
            .unwrap_or_else(|| self.today.unwrap_or_else(CalendarDate::today))
            .year_month()
    }
}

/// One column of the weekday header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayLabel {
    /// The weekday.
    pub weekday: Weekday,
    /// Short name.
    pub name: &'static str,
    /// Saturday or Sunday.
    pub is_weekend: bool,
}

/// A cell of a week row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCell {
    /// A rendered day.
    Day(DayView),
    /// Empty space for a hidden neighbouring-month day.
    Placeholder,
}

/// Render description of one month pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPage {
    /// The month shown.
    pub month: YearMonth,
    /// Weekday header row.
    pub weekdays: [WeekdayLabel; DAYS_PER_WEEK],
    /// Week rows, seven cells each.
    pub weeks: Vec<SmallVec<[DayCell; DAYS_PER_WEEK]>>,
}

/// Listener calls produced by a change to a [`CalendarState`].
#[must_use = "listeners only run when the notifications are dispatched"]
#[derive(Debug, Default)]
pub struct CalendarNotifications {
    calls: SmallVec<[Notification; 3]>,
}

#[derive(Debug)]
enum Notification {
    MonthChange(CallbackWith<YearMonth>, YearMonth),
    VisibleMonths(CallbackWith<Vec<YearMonth>>, Vec<YearMonth>),
    DayPress(CallbackWith<CalendarDate>, CalendarDate),
}

impl CalendarNotifications {
    /// Whether no listener is waiting to be called.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Calls the listeners in the order the changes happened.
    pub fn dispatch(self) {
        for call in self.calls {
            match call {
                Notification::MonthChange(listener, month) => listener.call(month),
                Notification::VisibleMonths(listener, months) => listener.call(months),
                Notification::DayPress(listener, day) => listener.call(day),
            }
        }
    }
}

/// Displayed month plus everything needed to render and page it.
#[derive(Debug, Clone)]
pub struct CalendarState {
    args: CalendarArgs,
    displayed_month: YearMonth,
}

impl CalendarState {
    /// Creates the state. The initial month is taken from `current`, then
    /// the first selected day, then today.
    pub fn new(args: CalendarArgs) -> Self {
        let displayed_month = args.initial_month();
        Self {
            args,
            displayed_month,
        }
    }

    /// Current configuration.
    pub fn args(&self) -> &CalendarArgs {
        &self.args
    }

    /// Applies new host configuration. A changed `current` month is
    /// followed without notifying listeners. Returns whether the displayed
    /// month changed.
    pub fn set_args(&mut self, args: CalendarArgs) -> bool {
        let current = args.current;
        self.args = args;
        current.is_some_and(|current| self.request_jump_to_month(current.year_month()))
    }

    /// The month in the current pane.
    pub fn displayed_month(&self) -> YearMonth {
        self.displayed_month
    }

    /// The date rendered as today.
    pub fn today(&self) -> CalendarDate {
        self.args.today.unwrap_or_else(CalendarDate::today)
    }

    /// Applies a settled carousel page change.
    ///
    /// A page past the last representable month leaves the month unchanged.
    pub fn on_page_committed(
        &mut self,
        moved_to_previous: bool,
        suppress_notification: bool,
    ) -> CalendarNotifications {
        let delta = if moved_to_previous { -1 } else { 1 };
        match self.displayed_month.add_months(delta) {
            Ok(month) => self
                .update_month(month, suppress_notification)
                .unwrap_or_default(),
            Err(err) => {
                warn!(%err, from = %self.displayed_month, "committed page is out of range");
                CalendarNotifications::default()
            }
        }
    }

    /// Shows `month` without animation or notification. Returns whether the
    /// displayed month changed.
    pub fn request_jump_to_month(&mut self, month: YearMonth) -> bool {
        self.update_month(month, true).is_some()
    }

    /// Moves by `count` months. Fails without changing the month when the
    /// target cannot be represented.
    pub fn add_months(&mut self, count: i32) -> Result<CalendarNotifications, DateError> {
        let month = self.displayed_month.add_months(count)?;
        Ok(self.update_month(month, false).unwrap_or_default())
    }

    /// Sets the displayed month. Returns `None` when it was already shown.
    pub fn update_month(
        &mut self,
        month: YearMonth,
        suppress_notification: bool,
    ) -> Option<CalendarNotifications> {
        if month == self.displayed_month {
            return None;
        }
        debug!(
            from = %self.displayed_month,
            to = %month,
            suppress_notification,
            "displayed month changed"
        );
        self.displayed_month = month;

        let mut notifications = CalendarNotifications::default();
        if !suppress_notification {
            if let Some(on_month_change) = &self.args.on_month_change {
                notifications
                    .calls
                    .push(Notification::MonthChange(on_month_change.clone(), month));
            }
            if let Some(on_visible_months_change) = &self.args.on_visible_months_change {
                notifications.calls.push(Notification::VisibleMonths(
                    on_visible_months_change.clone(),
                    vec![month],
                ));
            }
        }
        Some(notifications)
    }

    /// Whether `day` lies inside the optional inclusive bounds.
    pub fn within_bounds(&self, day: CalendarDate) -> bool {
        self.args.min_date.is_none_or(|min| day >= min)
            && self.args.max_date.is_none_or(|max| day <= max)
    }

    /// Whether `day` is in the selection.
    pub fn is_selected(&self, day: CalendarDate) -> bool {
        self.args.selected.contains(&day)
    }

    /// Marking for `day`, if any.
    pub fn marking(&self, day: CalendarDate) -> Option<&DayMarking> {
        self.args.marked_dates.as_ref()?.get(&day)
    }

    /// State of `day` rendered in a pane showing `pane_month`.
    pub fn day_state(&self, day: CalendarDate, pane_month: YearMonth) -> DayState {
        self.day_state_at(day, pane_month, self.today())
    }

    /// Handles a press on `day`. Out-of-range presses are ignored and
    /// return `None`.
    pub fn press_day(&mut self, day: CalendarDate) -> Option<CalendarNotifications> {
        if !self.within_bounds(day) {
            trace!(%day, "press outside bounds ignored");
            return None;
        }
        let mut notifications = self
            .update_month(day.year_month(), false)
            .unwrap_or_default();
        if let Some(on_day_press) = &self.args.on_day_press {
            notifications
                .calls
                .push(Notification::DayPress(on_day_press.clone(), day));
        }
        Some(notifications)
    }

    /// Whether the header shows the loading indicator.
    pub fn should_show_indicator(&self) -> bool {
        if !self.args.display_loading_indicator {
            return false;
        }
        let last_day = self.displayed_month.last_day();
        self.marking(last_day).is_none()
    }

    /// Describes the pane `month_offset` months away from the displayed one.
    pub fn render_pane(&self, month_offset: i32) -> MonthPage {
        // Panes past the representable range repeat the edge month.
        let month = self
            .displayed_month
            .add_months(month_offset)
            .unwrap_or(self.displayed_month);
        let today = self.today();
        let weeks = month_page(month, self.args.first_day)
            .chunks(DAYS_PER_WEEK)
            .map(|week| {
                week.iter()
                    .map(|&day| self.render_day(day, month, today))
                    .collect()
            })
            .collect();

        MonthPage {
            month,
            weekdays: self.weekday_labels(),
            weeks,
        }
    }

    /// Weekday header row starting at the configured first day.
    pub fn weekday_labels(&self) -> [WeekdayLabel; DAYS_PER_WEEK] {
        let names = weekday_names(self.args.first_day);
        let days = weekday_sequence(self.args.first_day);
        std::array::from_fn(|idx| WeekdayLabel {
            weekday: days[idx],
            name: names[idx],
            is_weekend: matches!(days[idx], Weekday::Sat | Weekday::Sun),
        })
    }

    fn render_day(&self, day: CalendarDate, month: YearMonth, today: CalendarDate) -> DayCell {
        if self.args.hide_extra_days && !month.contains(day) {
            return DayCell::Placeholder;
        }
        let props = DayProps {
            date: day,
            state: self.day_state_at(day, month, today),
            marking: self.marking(day).cloned(),
            marking_exists: self.args.marked_dates.is_some(),
        };
        DayCell::Day(self.args.day_renderer.call(props))
    }

    fn day_state_at(&self, day: CalendarDate, month: YearMonth, today: CalendarDate) -> DayState {
        if self.is_selected(day) {
            DayState::Selected
        } else if !self.within_bounds(day) || !month.contains(day) {
            DayState::Disabled
        } else if day == today {
            DayState::Today
        } else {
            DayState::Normal
        }
    }
}

impl Default for CalendarState {
    fn default() -> Self {
        Self::new(CalendarArgs::default())
    }
}
