//! Subject model.
//!
//! A subject is a course taught to classes: it carries a credit count,
//! a session type, an optional fixed faculty assignment, and weekly/daily
//! session limits.

use serde::{Deserialize, Serialize};

/// A subject taught to one or more classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Subject name, referenced by `Class::subjects` and `Faculty::subjects`.
    pub name: String,
    /// Catalogue code (e.g., "CS201").
    pub code: String,
    /// Credit count; drives the number of weekly sessions.
    pub credits: u32,
    /// Session type.
    pub subject_type: SubjectType,
    /// Faculty member fixed to this subject, if any.
    #[serde(default)]
    pub faculty_id: Option<String>,
    /// Maximum sessions per class per week.
    pub max_classes_per_week: u32,
    /// Maximum sessions per class per day.
    pub max_classes_per_day: u32,
}

/// Session type of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectType {
    #[default]
    Lecture,
    Lab,
    Tutorial,
}

impl Subject {
    /// Creates a lecture subject with 3 credits, at most 3 sessions a week and 1 a day.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            credits: 3,
            subject_type: SubjectType::Lecture,
            faculty_id: None,
            max_classes_per_week: 3,
            max_classes_per_day: 1,
        }
    }

    /// Sets the catalogue code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the session type.
    pub fn with_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_type = subject_type;
        self
    }

    /// Fixes the subject to one faculty member.
    pub fn with_faculty(mut self, faculty_id: impl Into<String>) -> Self {
        self.faculty_id = Some(faculty_id.into());
        self
    }

    /// Sets weekly and daily session limits.
    pub fn with_limits(mut self, per_week: u32, per_day: u32) -> Self {
        self.max_classes_per_week = per_week;
        self.max_classes_per_day = per_day;
        self
    }

    /// Whether the daily limit does not exceed the weekly limit.
    #[inline]
    pub fn has_consistent_limits(&self) -> bool {
        self.max_classes_per_day <= self.max_classes_per_week
    }

    /// Sessions each class needs per week: credits clamped into `[1, max_classes_per_week]`.
    pub fn weekly_sessions(&self) -> u32 {
        self.credits.min(self.max_classes_per_week).max(1)
    }
}
