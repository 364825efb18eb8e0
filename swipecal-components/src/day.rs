//! Per-day state, markings and the basic day presentation.
//!
//! ## Usage
//!
//! The month controller computes a [`DayProps`] for every rendered day and
//! hands it to a day renderer. [`basic_day`] is the default renderer; hosts
//! can replace it through `CalendarArgs::day_renderer`.
use rustc_hash::FxHashMap;

use crate::date::CalendarDate;

/// Interaction state of a rendered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DayState {
    /// Part of the host's selection.
    Selected,
    /// Outside the allowed range or outside the pane's month.
    Disabled,
    /// The current date.
    Today,
    /// Nothing special.
    #[default]
    Normal,
}

/// A colored period bar drawn under a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    /// Bar color as understood by the host.
    pub color: String,
    /// The period starts on this day.
    pub starting_day: bool,
    /// The period ends on this day.
    pub ending_day: bool,
}

/// Marking metadata supplied by the host for one day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayMarking {
    /// Draw a dot under the day.
    pub marked: bool,
    /// Style the day as selected regardless of the selection list.
    pub selected: bool,
    /// Style the day as disabled.
    pub disabled: bool,
    /// Period bars; entries with an empty color are skipped.
    pub periods: Vec<Period>,
}

impl DayMarking {
    /// A marking that only draws a dot.
    pub fn dot() -> Self {
        Self {
            marked: true,
            ..Self::default()
        }
    }
}

/// Marked dates keyed by day.
pub type MarkedDates = FxHashMap<CalendarDate, DayMarking>;

/// Everything a day renderer needs to know about one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayProps {
    /// The day.
    pub date: CalendarDate,
    /// Computed interaction state.
    pub state: DayState,
    /// Marking from the host's marked dates, if any.
    pub marking: Option<DayMarking>,
    /// Whether the host passed a marked-dates map at all.
    pub marking_exists: bool,
}

/// Container background of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayContainer {
    /// No background.
    Plain,
    /// Selected background.
    Selected,
    /// Selected background shifted to leave room for a dot.
    SelectedWithMarks,
}

/// Text style of a day label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayText {
    /// Default text.
    Normal,
    /// Weekend text.
    Weekend,
    /// Text on a selected background.
    Selected,
    /// Greyed-out text.
    Disabled,
    /// Highlighted current date.
    Today,
}

/// Dot drawn under a marked day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayDot {
    /// Regular marking dot.
    Visible,
    /// Dot drawn on a selected background.
    Selected,
}

/// A period bar as laid out under a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodBar {
    /// Bar color.
    pub color: String,
    /// Round and inset the leading edge.
    pub rounded_start: bool,
    /// Round and inset the trailing edge.
    pub rounded_end: bool,
}

/// Visual description of a day cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayView {
    /// The day.
    pub date: CalendarDate,
    /// Label text.
    pub label: String,
    /// Background.
    pub container: DayContainer,
    /// Label style.
    pub text: DayText,
    /// Add top spacing so labels align with dotted neighbours.
    pub align_text: bool,
    /// Marking dot, if any.
    pub dot: Option<DayDot>,
    /// Period bars.
    pub periods: Vec<PeriodBar>,
}

/// Default day renderer.
pub fn basic_day(props: DayProps) -> DayView {
    let marking = props.marking.unwrap_or_default();
    let is_selected = props.state == DayState::Selected || marking.selected;

    let dot = match (marking.marked, is_selected) {
        (true, true) => Some(DayDot::Selected),
        (true, false) => Some(DayDot::Visible),
        (false, _) => None,
    };

    let container = match (is_selected, marking.marked) {
        (true, true) => DayContainer::SelectedWithMarks,
        (true, false) => DayContainer::Selected,
        (false, _) => DayContainer::Plain,
    };

    let text = if is_selected {
        DayText::Selected
    } else if props.state == DayState::Disabled || marking.disabled {
        DayText::Disabled
    } else if props.state == DayState::Today {
        DayText::Today
    } else if props.date.is_weekend() {
        DayText::Weekend
    } else {
        DayText::Normal
    };

    let periods = marking
        .periods
        .into_iter()
        .filter(|period| !period.color.is_empty())
        .map(|period| PeriodBar {
            color: period.color,
            rounded_start: period.starting_day,
            rounded_end: period.ending_day,
        })
        .collect();

    DayView {
        date: props.date,
        label: props.date.day().to_string(),
        container,
        text,
        align_text: !marking.marked && !props.marking_exists,
        dot,
        periods,
    }
}
