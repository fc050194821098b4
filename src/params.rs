//! Optimization parameters.
//!
//! The coarse, count-level description of a timetabling problem used for
//! pre-generation feasibility checks. Counts are signed so that malformed
//! input (negative or zero values arriving over the wire) can be reported
//! by validation instead of failing to decode.

use serde::{Deserialize, Serialize};

use crate::models::EntitySnapshot;

/// Tunable parameters of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationParameters {
    pub classroom_count: i64,
    pub batch_count: i64,
    pub subject_count: i64,
    pub faculty_count: i64,
    /// Maximum sessions a class may have in one day.
    pub max_classes_per_day: i64,
    /// Maximum sessions of one subject per class per week.
    pub max_classes_per_subject_per_week: i64,
    /// Maximum sessions of one subject per class per day.
    pub max_classes_per_subject_per_day: i64,
    /// Leave days per faculty member per week.
    pub faculty_leave_days: i64,
    /// Reserved: fixed slot requests.
    #[serde(default)]
    pub fixed_slots: Vec<String>,
    /// Reserved: scheduling preferences.
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Reserved: scheduling restrictions.
    #[serde(default)]
    pub restrictions: Vec<String>,
}

impl Default for OptimizationParameters {
    fn default() -> Self {
        Self {
            classroom_count: 1,
            batch_count: 1,
            subject_count: 1,
            faculty_count: 1,
            max_classes_per_day: 6,
            max_classes_per_subject_per_week: 3,
            max_classes_per_subject_per_day: 1,
            faculty_leave_days: 0,
            fixed_slots: Vec::new(),
            preferences: Vec::new(),
            restrictions: Vec::new(),
        }
    }
}

impl OptimizationParameters {
    /// Derives entity counts from a snapshot, keeping the session limits of `self`.
    ///
    /// `subject_count` is the largest number of subjects any one class requires,
    /// so that `batch × subject × per_week` bounds the weekly demand.
    pub fn with_counts_from(mut self, snapshot: &EntitySnapshot) -> Self {
        self.classroom_count = snapshot.rooms.len() as i64;
        self.batch_count = snapshot.classes.len() as i64;
        self.subject_count = snapshot
            .classes
            .iter()
            .map(|c| c.subjects.len())
            .max()
            .unwrap_or(0) as i64;
        self.faculty_count = snapshot.faculty.len() as i64;
        self
    }

    /// Builds parameters from a snapshot with default session limits.
    pub fn from_snapshot(snapshot: &EntitySnapshot) -> Self {
        Self::default().with_counts_from(snapshot)
    }

    /// Sets the daily session limit per class.
    pub fn with_max_classes_per_day(mut self, max: i64) -> Self {
        self.max_classes_per_day = max;
        self
    }

    /// Sets per-subject weekly and daily session limits.
    pub fn with_subject_limits(mut self, per_week: i64, per_day: i64) -> Self {
        self.max_classes_per_subject_per_week = per_week;
        self.max_classes_per_subject_per_day = per_day;
        self
    }

    /// Sets faculty leave days.
    pub fn with_leave_days(mut self, days: i64) -> Self {
        self.faculty_leave_days = days;
        self
    }

    /// Sessions required per week: `batch × subject × max_per_subject_per_week`.
    pub fn required_weekly_sessions(&self) -> i64 {
        self.batch_count
            .saturating_mul(self.subject_count)
            .saturating_mul(self.max_classes_per_subject_per_week)
    }

    /// Room-periods available per week: `classroom × working_days × max_per_day`.
    pub fn classroom_capacity_slots(&self, working_days: usize) -> i64 {
        self.classroom_count
            .saturating_mul(working_days as i64)
            .saturating_mul(self.max_classes_per_day)
    }

    /// Faculty-periods available per week, discounted by the leave-day fraction.
    pub fn effective_faculty_capacity_slots(&self, working_days: usize) -> f64 {
        if working_days == 0 {
            return 0.0;
        }
        let raw = self.faculty_count as f64 * working_days as f64 * self.max_classes_per_day as f64;
        let presence = 1.0 - self.faculty_leave_days as f64 / working_days as f64;
        (raw * presence).max(0.0)
    }

    /// Daily limit as an unsigned count (0 when non-positive).
    pub(crate) fn daily_limit(&self) -> u32 {
        self.max_classes_per_day.clamp(0, u32::MAX as i64) as u32
    }

    /// Per-subject weekly limit as an unsigned count (0 when non-positive).
    pub(crate) fn subject_weekly_limit(&self) -> u32 {
        self.max_classes_per_subject_per_week.clamp(0, u32::MAX as i64) as u32
    }

    /// Per-subject daily limit as an unsigned count (0 when non-positive).
    pub(crate) fn subject_daily_limit(&self) -> u32 {
        self.max_classes_per_subject_per_day.clamp(0, u32::MAX as i64) as u32
    }
}
