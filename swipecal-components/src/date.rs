//! Calendar dates, month identities and the month grid.
//!
//! ## Usage
//!
//! [`YearMonth`] identifies the month a pane shows; [`month_page`] expands
//! it into whole weeks of [`CalendarDate`]s starting on the configured
//! first day of the week.
use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use thiserror::Error;

/// Number of days in a rendered week row.
pub const DAYS_PER_WEEK: usize = 7;

const SHORT_WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] =
    ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Errors raised for date values that cannot be represented.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Month outside 1..=12, or a year outside the supported range.
    #[error("invalid month {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
    /// Day that does not exist in its month.
    #[error("invalid date {year}-{month}-{day}")]
    InvalidDate {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
        /// Requested day.
        day: u32,
    },
    /// Text that is not a `YYYY-MM-DD` date.
    #[error("cannot parse date `{input}`: {reason}")]
    Parse {
        /// Input text.
        input: String,
        /// Parser message.
        reason: String,
    },
}

/// A calendar day without time or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a date, rejecting days that do not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Today in the local time zone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month, 1-12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, 1-31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Whether this day falls on Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The month containing this date.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year(),
            month: self.month(),
        }
    }

    /// The date `days` days later (or earlier for negative values),
    /// saturating at the representable range.
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(chrono::Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(chrono::Days::new(days.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }

    /// Formats with a `chrono` format string.
    pub fn format(&self, pattern: &str) -> String {
        self.0.format(pattern).to_string()
    }

    /// Returns the underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|err| DateError::Parse {
                input: input.to_owned(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A year and month pair used for month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year/month pair if the values are valid.
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DateError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Adds or subtracts months, adjusting the year as needed.
    ///
    /// Fails with [`DateError::InvalidMonth`] when the result lies outside
    /// the years chrono can represent.
    pub fn add_months(&self, delta: i32) -> Result<Self, DateError> {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        let month = (total.rem_euclid(12) + 1) as u32;
        let year = i32::try_from(total.div_euclid(12)).map_err(|_| DateError::InvalidMonth {
            year: if delta < 0 { i32::MIN } else { i32::MAX },
            month,
        })?;
        Self::new(year, month)
    }

    /// The first day of the month.
    pub fn first_day(&self) -> CalendarDate {
        CalendarDate(self.naive_first())
    }

    /// The last day of the month.
    pub fn last_day(&self) -> CalendarDate {
        let first = self.naive_first();
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // December of chrono's last year has no following month.
            .or_else(|| NaiveDate::from_ymd_opt(self.year, self.month, 31))
            .unwrap_or(first);
        CalendarDate(last)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year_month() == *self
    }

    /// Formats the first day of the month with a `chrono` format string.
    pub fn format(&self, pattern: &str) -> String {
        self.first_day().format(pattern)
    }

    fn naive_first(&self) -> NaiveDate {
        // Every constructor checks the month against chrono's range.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl From<CalendarDate> for YearMonth {
    fn from(date: CalendarDate) -> Self {
        date.year_month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Days from `first_day` to `weekday`, in 0..7.
pub fn weekday_offset(weekday: Weekday, first_day: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - first_day.num_days_from_sunday()) % 7
}

/// All days of the whole weeks covering `month`.
///
/// The first entry falls on `first_day`, the last on the day before it,
/// so the length is always a multiple of seven.
pub fn month_page(month: YearMonth, first_day: Weekday) -> Vec<CalendarDate> {
    let first = month.first_day();
    let last = month.last_day();
    let start = first.add_days(-i64::from(weekday_offset(first.weekday(), first_day)));
    let trailing = 6 - weekday_offset(last.weekday(), first_day);
    let end = last.add_days(i64::from(trailing));

    let mut days = Vec::with_capacity(42);
    let mut day = start;
    while day <= end {
        days.push(day);
        day = day.add_days(1);
    }
    days
}

/// Short weekday names starting at `first_day`.
pub fn weekday_names(first_day: Weekday) -> [&'static str; DAYS_PER_WEEK] {
    let shift = first_day.num_days_from_sunday() as usize;
    std::array::from_fn(|idx| SHORT_WEEKDAY_NAMES[(idx + shift) % DAYS_PER_WEEK])
}

/// Weekdays in display order starting at `first_day`.
pub fn weekday_sequence(first_day: Weekday) -> [Weekday; DAYS_PER_WEEK] {
    let mut day = first_day;
    std::array::from_fn(|_| {
        let current = day;
        day = day.succ();
        current
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn add_months_wraps_years() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.add_months(-1), YearMonth::new(2023, 12));
        assert_eq!(jan.add_months(13), YearMonth::new(2025, 2));
        assert_eq!(jan.add_months(-25), YearMonth::new(2021, 12));
    }

    #[test]
    fn add_months_rejects_months_past_the_supported_range() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert!(matches!(
            jan.add_months(i32::MAX),
            Err(DateError::InvalidMonth { .. })
        ));
        assert!(matches!(
            jan.add_months(i32::MIN),
            Err(DateError::InvalidMonth { .. })
        ));

        let edge = YearMonth::new(NaiveDate::MAX.year(), NaiveDate::MAX.month()).unwrap();
        assert!(edge.add_months(1).is_err());
        assert_eq!(edge.last_day(), CalendarDate::from(NaiveDate::MAX));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            YearMonth::new(2024, 13),
            Err(DateError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
        assert!(CalendarDate::new(2023, 2, 29).is_err());
        assert!(matches!(
            "2024-02-30".parse::<CalendarDate>(),
            Err(DateError::Parse { .. })
        ));
        assert_eq!("2024-02-29".parse::<CalendarDate>(), Ok(date(2024, 2, 29)));
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert_eq!(YearMonth::new(2023, 12).unwrap().last_day(), date(2023, 12, 31));
    }

    #[test]
    fn month_page_covers_whole_weeks_from_sunday() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let page = month_page(YearMonth::new(2024, 3).unwrap(), Weekday::Sun);
        assert_eq!(page.len(), 42);
        assert_eq!(page[0], date(2024, 2, 25));
        assert_eq!(page[5], date(2024, 3, 1));
        assert_eq!(page[41], date(2024, 4, 6));
    }

    #[test]
    fn month_page_respects_monday_start() {
        let page = month_page(YearMonth::new(2024, 3).unwrap(), Weekday::Mon);
        assert_eq!(page.len(), 35);
        assert_eq!(page[0], date(2024, 2, 26));
        assert_eq!(page[0].weekday(), Weekday::Mon);
        assert_eq!(page[34], date(2024, 3, 31));
    }

    #[test]
    fn month_page_without_padding() {
        // February 2015 starts on Sunday and has exactly four weeks.
        let page = month_page(YearMonth::new(2015, 2).unwrap(), Weekday::Sun);
        assert_eq!(page.len(), 28);
        assert_eq!(page[0], date(2015, 2, 1));
    }

    #[test]
    fn weekday_names_rotate() {
        assert_eq!(weekday_names(Weekday::Sun)[0], "Sun");
        assert_eq!(weekday_names(Weekday::Mon), ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(weekday_sequence(Weekday::Sat)[1], Weekday::Sun);
    }
}
