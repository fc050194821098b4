//! Weekly calendar primitives.
//!
//! Defines the time vocabulary of a timetable: weekdays, clock times,
//! half-open time windows, and the discrete period grid that the
//! optimizer places sessions on.
//!
//! # Time Model
//! A time of day is stored as minutes since midnight and serialized as
//! `"HH:MM"`. A week is a set of weekdays; a [`WeekGrid`] slices each day
//! into equal-length periods starting at `day_start`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Standard working week (Monday to Friday).
    pub const WORKING_DAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Short display name ("Mon", "Tue", ...).
    pub fn short_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A time of day with minute resolution.
///
/// Serialized as `"HH:MM"` (24-hour clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

/// Error returned when a clock time cannot be parsed or is out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClockTimeError(String);

impl fmt::Display for ParseClockTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid clock time '{}', expected HH:MM", self.0)
    }
}

impl std::error::Error for ParseClockTimeError {}

impl ClockTime {
    /// Minutes in a day.
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Creates a clock time from hours and minutes.
    ///
    /// Returns `None` if the time is not within a single day.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Creates a clock time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Shorthand for whole hours, clamped into the day.
    pub fn hours(hour: u16) -> Self {
        Self(hour.min(23) * 60)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Adds minutes, saturating at the last minute of the day.
    pub fn saturating_add(&self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(Self::MINUTES_PER_DAY - 1))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: u16 = h.parse().map_err(|_| err())?;
        let minute: u16 = m.parse().map_err(|_| err())?;
        ClockTime::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// A time interval [start, end) within one day.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Duration of this window in minutes (0 if inverted).
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: ClockTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether the interval `[start, start + duration)` lies entirely inside this window.
    pub fn covers(&self, start: ClockTime, duration_minutes: u16) -> bool {
        let end = start.minutes() as u32 + duration_minutes as u32;
        start >= self.start && end <= self.end.minutes() as u32
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this window overlaps `[start, start + duration)`.
    pub fn overlaps_span(&self, start: ClockTime, duration_minutes: u16) -> bool {
        let span_start = start.minutes() as u32;
        let span_end = span_start + duration_minutes as u32;
        (self.start.minutes() as u32) < span_end && span_start < self.end.minutes() as u32
    }
}

/// Discrete weekly period grid.
///
/// Every scheduled session occupies exactly one period: a weekday plus a
/// start time `day_start + k * period_minutes` for `k < periods_per_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekGrid {
    /// Teaching days.
    pub days: Vec<Weekday>,
    /// Start of the first period.
    pub day_start: ClockTime,
    /// Length of one period (minutes).
    pub period_minutes: u16,
    /// Number of periods per day.
    pub periods_per_day: u16,
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self {
            days: Weekday::WORKING_DAYS.to_vec(),
            day_start: ClockTime::hours(9),
            period_minutes: 60,
            periods_per_day: 8,
        }
    }
}

impl WeekGrid {
    /// Creates a grid over the given days.
    pub fn new(days: Vec<Weekday>, day_start: ClockTime, period_minutes: u16, periods_per_day: u16) -> Self {
        Self {
            days,
            day_start,
            period_minutes,
            periods_per_day,
        }
    }

    /// Number of teaching days.
    pub fn working_days(&self) -> usize {
        self.days.len()
    }

    /// Start times of each period in a day.
    ///
    /// Periods that would run past midnight are dropped.
    pub fn period_starts(&self) -> Vec<ClockTime> {
        (0..self.periods_per_day)
            .filter_map(|k| {
                let minutes = self.day_start.minutes() as u32 + k as u32 * self.period_minutes as u32;
                let end = minutes + self.period_minutes as u32;
                if end <= ClockTime::MINUTES_PER_DAY as u32 {
                    ClockTime::from_minutes(minutes as u16)
                } else {
                    None
                }
            })
            .collect()
    }

    /// All (day, start) periods of the week, day-major.
    pub fn periods(&self) -> Vec<(Weekday, ClockTime)> {
        let starts = self.period_starts();
        self.days
            .iter()
            .flat_map(|&day| starts.iter().map(move |&start| (day, start)))
            .collect()
    }

    /// Total periods in the week.
    pub fn period_count(&self) -> usize {
        self.days.len() * self.period_starts().len()
    }
}
