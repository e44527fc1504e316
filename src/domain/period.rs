//! Custom-period calendar arithmetic.
//!
//! A financial month runs from the 26th of the previous calendar month through
//! the 25th of the reference date's month. All containment checks happen at
//! whole calendar-day granularity, so any time on the 25th is inside the window.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::errors::ExpenseError;

/// First day of a financial month, taken from the preceding calendar month.
pub const PERIOD_START_DAY: u32 = 26;
/// Last day of a financial month, inclusive.
pub const PERIOD_END_DAY: u32 = 25;

/// Anything that can be reduced to a local calendar day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// View granularity: financial months or calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Year,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Month => "month",
            Granularity::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" | "m" => Ok(Granularity::Month),
            "year" | "y" => Ok(Granularity::Year),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown view `{other}` (expected month or year)"
            ))),
        }
    }
}

/// Navigation direction for [`advance_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, candidate: &impl CalendarDay) -> bool {
        let day = candidate.calendar_day();
        self.start <= day && day <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1).max(0) as u32
    }

    /// Every day of the window in chronological order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days() as usize)
    }

    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::default())
    }

    /// Last representable instant of the end day. Built from the end date
    /// itself, so it holds even at `NaiveDate::MAX`.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::default()))
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// The 26th of the month before `reference`'s month.
pub fn custom_month_start(reference: &impl CalendarDay) -> NaiveDate {
    let day = reference.calendar_day();
    let (year, month) = month_offset(day.year(), day.month(), -1);
    calendar_date(year, month, PERIOD_START_DAY)
}

/// The 25th of `reference`'s month. Inclusive of the whole day.
pub fn custom_month_end(reference: &impl CalendarDay) -> NaiveDate {
    let day = reference.calendar_day();
    calendar_date(day.year(), day.month(), PERIOD_END_DAY)
}

pub fn custom_month_window(reference: &impl CalendarDay) -> PeriodWindow {
    PeriodWindow {
        start: custom_month_start(reference),
        end: custom_month_end(reference),
    }
}

pub fn is_in_custom_period(candidate: &impl CalendarDay, reference: &impl CalendarDay) -> bool {
    custom_month_window(reference).contains(candidate)
}

/// Length of the financial month containing `reference`; always recomputed.
pub fn days_in_custom_month(reference: &impl CalendarDay) -> u32 {
    custom_month_window(reference).days()
}

pub fn is_same_year(a: &impl CalendarDay, b: &impl CalendarDay) -> bool {
    a.calendar_day().year() == b.calendar_day().year()
}

/// Active window for a view: the financial month, or January 1 through December 31.
pub fn window_for(reference: &impl CalendarDay, granularity: Granularity) -> PeriodWindow {
    match granularity {
        Granularity::Month => custom_month_window(reference),
        Granularity::Year => {
            let year = reference.calendar_day().year();
            PeriodWindow {
                start: calendar_date(year, 1, 1),
                end: calendar_date(year, 12, 31),
            }
        }
    }
}

/// Period containment for the given granularity.
pub fn in_period(
    candidate: &impl CalendarDay,
    reference: &impl CalendarDay,
    granularity: Granularity,
) -> bool {
    match granularity {
        Granularity::Month => is_in_custom_period(candidate, reference),
        Granularity::Year => is_same_year(candidate, reference),
    }
}

/// Moves the reference date one month or one year, clamping the day when the
/// target month is shorter.
pub fn advance_period(
    reference: NaiveDate,
    granularity: Granularity,
    direction: Direction,
) -> NaiveDate {
    let step = match direction {
        Direction::Prev => -1,
        Direction::Next => 1,
    };
    shift_period(reference, granularity, step)
}

/// Applies `steps` navigation moves at once (negative goes back).
pub fn shift_period(reference: NaiveDate, granularity: Granularity, steps: i32) -> NaiveDate {
    match granularity {
        Granularity::Month => shift_month(reference, steps),
        Granularity::Year => shift_year(reference, steps),
    }
}

/// Reference date that makes `today` visible in the month view: from the 26th
/// onward today already belongs to the next financial month.
pub fn reference_for_today(today: NaiveDate) -> NaiveDate {
    if today.day() >= PERIOD_START_DAY {
        let (year, month) = month_offset(today.year(), today.month(), 1);
        calendar_date(year, month, 1)
    } else {
        today
    }
}

/// Header text for a period: `March 2024` or `2024`.
pub fn period_title(reference: &impl CalendarDay, granularity: Granularity) -> String {
    let day = reference.calendar_day();
    match granularity {
        Granularity::Month => day.format("%B %Y").to_string(),
        Granularity::Year => day.format("%Y").to_string(),
    }
}

/// Three-letter name for a zero-based month index.
pub fn month_abbreviation(month_index: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES[(month_index % 12) as usize]
}

fn month_offset(year: i32, month: u32, months: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + months;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let (year, month) = month_offset(date.year(), date.month(), months);
    let day = date.day().min(days_in_month(year, month));
    calendar_date(year, month, day)
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    calendar_date(year, date.month(), day)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_offset(year, month, 1);
    let first_next = calendar_date(next_year, next_month, 1);
    (first_next - Duration::days(1)).day()
}

// Saturates at chrono's representable range instead of panicking.
fn calendar_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}
