//! Faculty model.
//!
//! Faculty members teach subjects. Each member declares which subjects
//! they can teach, a weekly availability pattern, and a number of leave
//! days that reduces their effective weekly capacity.
//!
//! # Availability
//! An empty availability map means the member is available whenever the
//! grid has periods. Otherwise a session is allowed iff its day has an
//! entry, the session lies inside `[start, end)`, and it does not overlap
//! any break.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClockTime, TimeWindow, WeekGrid, Weekday};

/// A faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Department.
    pub department: String,
    /// Names of the subjects this member can teach.
    pub subjects: Vec<String>,
    /// Per-weekday availability. Empty = always available.
    #[serde(default)]
    pub availability: BTreeMap<Weekday, DayAvailability>,
    /// Leave days in the week.
    #[serde(default)]
    pub leave_days: u32,
}

/// Working hours of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Start of the working window.
    pub start: ClockTime,
    /// End of the working window (exclusive).
    pub end: ClockTime,
    /// Break intervals inside the window.
    #[serde(default)]
    pub breaks: Vec<TimeWindow>,
}

impl DayAvailability {
    /// Creates a window with no breaks.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self {
            start,
            end,
            breaks: Vec::new(),
        }
    }

    /// Adds a break.
    pub fn with_break(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.breaks.push(TimeWindow::new(start, end));
        self
    }

    /// Whether a session `[start, start + duration)` fits this day.
    pub fn allows(&self, start: ClockTime, duration_minutes: u16) -> bool {
        TimeWindow::new(self.start, self.end).covers(start, duration_minutes)
            && !self
                .breaks
                .iter()
                .any(|b| b.overlaps_span(start, duration_minutes))
    }
}

impl Faculty {
    /// Creates a faculty member with no subjects.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            department: String::new(),
            subjects: Vec::new(),
            availability: BTreeMap::new(),
            leave_days: 0,
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds a teachable subject by name.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Sets the availability of one weekday.
    pub fn with_availability(mut self, day: Weekday, hours: DayAvailability) -> Self {
        self.availability.insert(day, hours);
        self
    }

    /// Sets the number of leave days.
    pub fn with_leave_days(mut self, days: u32) -> Self {
        self.leave_days = days;
        self
    }

    /// Whether this member can teach a subject.
    pub fn can_teach(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Whether this member is available for `[start, start + duration)` on `day`.
    pub fn is_available(&self, day: Weekday, start: ClockTime, duration_minutes: u16) -> bool {
        if self.availability.is_empty() {
            return true;
        }
        self.availability
            .get(&day)
            .is_some_and(|hours| hours.allows(start, duration_minutes))
    }

    /// Effective weekly session capacity on a grid.
    ///
    /// Counts grid periods the member is available for, discounted by the
    /// leave-day fraction `leave_days / working_days`. Never negative.
    pub fn weekly_capacity(&self, grid: &WeekGrid) -> f64 {
        let working_days = grid.working_days();
        if working_days == 0 {
            return 0.0;
        }
        let available = grid
            .periods()
            .into_iter()
            .filter(|&(day, start)| self.is_available(day, start, grid.period_minutes))
            .count() as f64;
        let presence = 1.0 - self.leave_days as f64 / working_days as f64;
        (available * presence).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(h: u16) -> ClockTime {
        ClockTime::hours(h)
    }

    #[test]
    fn test_faculty_builder() {
        let f = Faculty::new("F1", "Dr. Rao")
            .with_email("rao@uni.edu")
            .with_department("CSE")
            .with_subject("Algorithms")
            .with_leave_days(1);
        assert!(f.can_teach("Algorithms"));
        assert!(!f.can_teach("Physics"));
        assert_eq!(f.leave_days, 1);
    }

    #[test]
    fn test_always_available_without_entries() {
        let f = Faculty::new("F1", "A");
        assert!(f.is_available(Weekday::Saturday, hours(7), 60));
    }

    #[test]
    fn test_availability_with_breaks() {
        let f = Faculty::new("F1", "A").with_availability(
            Weekday::Monday,
            DayAvailability::new(hours(9), hours(13)).with_break(hours(11), hours(12)),
        );
        assert!(f.is_available(Weekday::Monday, hours(9), 60));
        assert!(f.is_available(Weekday::Monday, hours(12), 60));
        assert!(!f.is_available(Weekday::Monday, hours(11), 60));
        assert!(!f.is_available(Weekday::Monday, hours(13), 60));
        assert!(!f.is_available(Weekday::Tuesday, hours(9), 60));
    }

    #[test]
    fn test_weekly_capacity() {
        let grid = WeekGrid::default();
        let full = Faculty::new("F1", "A");
        assert!((full.weekly_capacity(&grid) - 40.0).abs() < 1e-10);

        let on_leave = Faculty::new("F2", "B").with_leave_days(1);
        assert!((on_leave.weekly_capacity(&grid) - 32.0).abs() < 1e-10);

        let mornings = Faculty::new("F3", "C")
            .with_availability(Weekday::Monday, DayAvailability::new(hours(9), hours(12)));
        assert!((mornings.weekly_capacity(&grid) - 3.0).abs() < 1e-10);

        let gone = Faculty::new("F4", "D").with_leave_days(7);
        assert_eq!(gone.weekly_capacity(&grid), 0.0);
    }
}
