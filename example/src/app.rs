use std::{fmt::Write as _, sync::Arc, time::Duration};

use futures::FutureExt as _;
use parking_lot::Mutex;
use swipecal_components::{
    calendar::Calendar,
    calendar_header::ArrowDirection,
    calendar_state::{CalendarArgs, DayCell},
    date::{CalendarDate, YearMonth},
    day::{DayMarking, DayText, MarkedDates},
    swiper::PaneSlot,
};
use swipecal_ui::{Px, TouchEvent, TouchTracker, touch::px_position};
use tracing::{info, warn};

use crate::clock::FrameClock;

const PANE_WIDTH: Px = Px(360);
const DRAG_STEPS: i32 = 8;
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Default)]
struct Journal {
    month_changes: usize,
    refreshes: usize,
    last_indicator: f32,
}

pub struct App {
    calendar: Calendar,
    touch: TouchTracker,
    journal: Arc<Mutex<Journal>>,
    next_touch_id: u64,
    today: CalendarDate,
}

impl App {
    pub fn new(now: std::time::Instant) -> Self {
        let journal = Arc::new(Mutex::new(Journal::default()));
        let today = CalendarDate::today();

        let mut marked = MarkedDates::default();
        marked.insert(today.add_days(2), DayMarking::dot());
        marked.insert(today.add_days(9), DayMarking::dot());

        let months = journal.clone();
        let args = CalendarArgs::default()
            .current(today)
            .selected(vec![today.add_days(1)])
            .min_date(today.add_days(-40))
            .marked_dates(marked)
            .display_loading_indicator(true)
            .on_month_change(move |month: YearMonth| {
                months.lock().month_changes += 1;
                info!(%month, "month changed");
            })
            .on_visible_months_change(|visible: Vec<YearMonth>| info!(?visible, "visible months"))
            .on_day_press(|day: CalendarDate| info!(%day, "day pressed"));

        let refreshes = journal.clone();
        let indicator = journal.clone();
        let swiper_args = Calendar::default_swiper_args()
            .on_refresh(move || {
                refreshes.lock().refreshes += 1;
                info!("refresh requested");
            })
            .on_indicator_move(move |distance: f32| indicator.lock().last_indicator = distance)
            .on_indicator_dispose(|| info!("refresh indicator disposed"));

        Self {
            calendar: Calendar::with_swiper_args(args, swiper_args, now),
            touch: TouchTracker::new(),
            journal,
            next_touch_id: 0,
            today,
        }
    }

    pub fn layout(&mut self, now: std::time::Instant) {
        self.calendar.layout(PANE_WIDTH, now);
    }

    pub fn tick(&mut self, now: std::time::Instant) -> bool {
        self.calendar.tick(now)
    }

    pub fn displayed_month(&self) -> YearMonth {
        self.calendar.displayed_month()
    }

    pub fn swipe_to_next_month(&mut self, clock: &mut FrameClock) {
        let before = self.displayed_month();
        self.drag(clock, (320, 200), (60, 204));
        clock.run_until_idle(|now| self.calendar.tick(now));
        info!(from = %before, to = %self.displayed_month(), "swiped");
    }

    pub fn tap_previous_arrow(&mut self, clock: &mut FrameClock) {
        let Some(change) = self.calendar.press_arrow(ArrowDirection::Left, clock.now()) else {
            warn!("arrows are hidden");
            return;
        };
        clock.run_until_idle(|now| self.calendar.tick(now));
        info!(outcome = ?change.now_or_never(), month = %self.displayed_month(), "arrow tapped");
    }

    pub fn pull_to_refresh(&mut self, clock: &mut FrameClock) {
        self.drag(clock, (180, 60), (184, 190));
        clock.run_until_idle(|now| self.calendar.tick(now));
        let journal = self.journal.lock();
        info!(
            refreshes = journal.refreshes,
            indicator = journal.last_indicator,
            "pulled"
        );
    }

    pub fn press_days(&mut self, clock: &mut FrameClock) {
        let too_early = self.today.add_days(-60);
        if !self.calendar.press_day(too_early, clock.now()) {
            info!(day = %too_early, "press ignored");
        }
        match self.displayed_month().add_months(1) {
            Ok(next_month) => {
                self.calendar.press_day(next_month.first_day(), clock.now());
            }
            Err(err) => warn!(%err, "no month after the displayed one"),
        }
        clock.run_until_idle(|now| self.calendar.tick(now));
    }

    pub fn sync_current(&mut self, clock: &mut FrameClock) {
        if self.calendar.set_current_str("31/12/2024", clock.now()).is_err() {
            info!(month = %self.displayed_month(), "kept month");
        }
        let today = self.today.to_string();
        match self.calendar.set_current_str(&today, clock.now()) {
            Ok(changed) => info!(changed, month = %self.displayed_month(), "synced current"),
            Err(err) => warn!(%err, "could not sync"),
        }
        clock.run_until_idle(|now| self.calendar.tick(now));
        info!(
            month_changes = self.journal.lock().month_changes,
            "listener summary"
        );
    }

    /// Text rendering of the header and the current pane.
    pub fn render_text(&self) -> String {
        let view = self.calendar.render();
        let mut out = String::new();
        let indicator = if view.header.show_indicator { " …" } else { "" };
        let _ = writeln!(out, "{:^28}", format!("{}{indicator}", view.header.title));

        let Some(pane) = view.panes.iter().find(|pane| pane.slot == PaneSlot::Current) else {
            return out;
        };
        for label in &pane.content.weekdays {
            let _ = write!(out, "{:>4}", label.name);
        }
        out.push('\n');
        for week in &pane.content.weeks {
            for cell in week {
                let text = match cell {
                    DayCell::Placeholder => String::new(),
                    DayCell::Day(day) => match day.text {
                        DayText::Selected => format!("[{}]", day.label),
                        DayText::Today => format!("*{}", day.label),
                        DayText::Disabled => "·".to_owned(),
                        _ if day.dot.is_some() => format!("{}•", day.label),
                        _ => day.label.clone(),
                    },
                };
                let _ = write!(out, "{text:>4}");
            }
            out.push('\n');
        }
        out
    }

    fn drag(&mut self, clock: &mut FrameClock, from: (i32, i32), to: (i32, i32)) {
        let id = self.next_touch_id;
        self.next_touch_id += 1;

        let began = self.touch.touch_start(id, px_position(from.0, from.1), clock.now());
        self.dispatch(began);
        for step in 1..=DRAG_STEPS {
            let x = from.0 + (to.0 - from.0) * step / DRAG_STEPS;
            let y = from.1 + (to.1 - from.1) * step / DRAG_STEPS;
            let now = clock.advance(FRAME);
            let moved = self.touch.touch_move(id, px_position(x, y), now);
            self.dispatch(moved);
            self.calendar.tick(now);
        }
        let ended = self.touch.touch_end(id, clock.now());
        self.dispatch(ended);
    }

    fn dispatch(&mut self, event: Option<TouchEvent>) {
        if let Some(event) = event {
            self.calendar.handle_touch(&event);
        }
    }
}
