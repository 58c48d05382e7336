//! Month grids and month arithmetic
//!
//! A month is displayed as a 7-column grid (weeks start on Sunday), where day 1 is preceded by as
//! many blank cells as needed to sit under its weekday. The last week is not padded.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];


/// One position of a month grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayCell {
    /// Padding before day 1
    Blank,
    /// A day of the month (1-based)
    Day(u32),
}

impl DayCell {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Blank => None,
            DayCell::Day(d) => Some(*d),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.day().is_none()
    }
}


pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a (zero-based) month. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        1 => if is_leap_year(year) { 29 } else { 28 },
        3 | 5 | 8 | 10 => 30,
        0..=11 => 31,
        _ => 0,
    }
}

/// Weekday of the first day of a (zero-based) month (0 = Sunday, ..., 6 = Saturday)
pub fn first_weekday(year: i32, month0: u32) -> u32 {
    match NaiveDate::from_ymd_opt(year, month0.saturating_add(1), 1) {
        Some(date) => date.weekday().num_days_from_sunday(),
        None => {
            log::warn!("Invalid month {}-{}, assuming it starts on a Sunday", year, month0.saturating_add(1));
            0
        }
    }
}

/// Builds the grid of a (zero-based) month: leading blanks, then every day of the month
pub fn build_month_grid(year: i32, month0: u32) -> Vec<DayCell> {
    let days = days_in_month(year, month0);
    if days == 0 {
        return Vec::new();
    }
    let blanks = first_weekday(year, month0) as usize;

    let mut cells = Vec::with_capacity(blanks + days as usize);
    cells.extend(std::iter::repeat(DayCell::Blank).take(blanks));
    cells.extend((1..=days).map(DayCell::Day));
    cells
}


/// An interval of instants, both bounds included
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        &self.start <= instant && instant <= &self.end
    }
}


/// Converts a wall-clock time of `tz` into an instant.
///
/// Ambiguous times (DST fold) resolve to the earliest instant, times skipped by a DST gap are moved one hour later.
pub fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    let shifted = *naive + Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(naive),
    }
}


/// A month of a given year
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    first: NaiveDate,
}

impl MonthRef {
    /// Returns `None` in case `month0` is not in `0..12` (or the year is out of range)
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month0.saturating_add(1), 1).map(|first| Self { first })
    }

    /// The month this date belongs to
    pub fn containing<D: Datelike>(date: &D) -> Self {
        match NaiveDate::from_ymd_opt(date.year(), date.month(), 1) {
            Some(first) => Self { first },
            None => Self { first: NaiveDate::MIN },
        }
    }

    /// The current month, in the given timezone
    pub fn today_in<Tz: TimeZone>(tz: &Tz) -> Self {
        Self::containing(&Utc::now().with_timezone(tz))
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Zero-based month (0 = January)
    pub fn month0(&self) -> u32 {
        self.first.month0()
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year(), self.month0())
    }

    pub fn grid(&self) -> Vec<DayCell> {
        build_month_grid(self.year(), self.month0())
    }

    pub fn previous(&self) -> Self {
        self.first.pred_opt()
            .map(|d| Self::containing(&d))
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.first.checked_add_signed(Duration::days(self.days() as i64))
            .map(|d| Self::containing(&d))
            .unwrap_or(*self)
    }

    /// The date of a day of this month, or `None` if this month has no such day
    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.date_of(self.days()).unwrap_or(self.first)
    }

    /// From the first day at 00:00:00 to the last day at 23:59:59, in the timezone `tz`
    pub fn range_in<Tz: TimeZone>(&self, tz: &Tz) -> DateRange {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        DateRange {
            start: local_to_utc(tz, &self.first_day().and_time(NaiveTime::MIN)),
            end: local_to_utc(tz, &self.last_day().and_time(end_of_day)),
        }
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month0() as usize]
    }

    /// E.g. "November 2024"
    pub fn title(&self) -> String {
        format!("{} {}", self.name(), self.year())
    }
}

impl Display for MonthRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{:04}-{:02}", self.year(), self.month0() + 1)
    }
}
