//! Timetable (solution) model.
//!
//! A timetable is the artifact of one optimization run: an ordered list
//! of slots plus descriptive metadata. It is disposable. A new run
//! replaces it wholesale; slots are never edited in place by the
//! optimizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClockTime, Conflict, SubjectType, Weekday};

/// One scheduled session: a (day, start, duration) bound to a subject,
/// faculty member, room and class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    /// Slot identifier, unique within a timetable.
    pub id: String,
    /// Day of the session.
    pub day: Weekday,
    /// Start time.
    pub start: ClockTime,
    /// Duration in minutes.
    pub duration_minutes: u16,
    /// Subject taught.
    pub subject_id: String,
    /// Faculty member teaching.
    pub faculty_id: String,
    /// Room used.
    pub room_id: String,
    /// Class attending.
    pub class_id: String,
    /// Session type.
    pub session_type: SubjectType,
}

impl TimetableSlot {
    /// Creates a slot with an empty resource binding.
    pub fn new(id: impl Into<String>, day: Weekday, start: ClockTime, duration_minutes: u16) -> Self {
        Self {
            id: id.into(),
            day,
            start,
            duration_minutes,
            subject_id: String::new(),
            faculty_id: String::new(),
            room_id: String::new(),
            class_id: String::new(),
            session_type: SubjectType::Lecture,
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    /// Sets the faculty member.
    pub fn with_faculty(mut self, faculty_id: impl Into<String>) -> Self {
        self.faculty_id = faculty_id.into();
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    /// Sets the class.
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = class_id.into();
        self
    }

    /// Sets the session type.
    pub fn with_session_type(mut self, session_type: SubjectType) -> Self {
        self.session_type = session_type;
        self
    }

    /// The (day, start) key two slots must share to collide.
    #[inline]
    pub fn period(&self) -> (Weekday, ClockTime) {
        (self.day, self.start)
    }

    /// End time, saturating at the end of the day.
    pub fn end(&self) -> ClockTime {
        self.start.saturating_add(self.duration_minutes)
    }
}

/// A generated weekly timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    /// Unique identifier (the persistence key).
    pub id: String,
    /// Title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub shift: String,
    /// Scheduled slots, in insertion order.
    #[serde(default)]
    pub slots: Vec<TimetableSlot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timetable {
    /// Creates an empty timetable stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            department: String::new(),
            semester: String::new(),
            year: String::new(),
            shift: String::new(),
            slots: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets department, semester, year and shift metadata.
    pub fn with_metadata(
        mut self,
        department: impl Into<String>,
        semester: impl Into<String>,
        year: impl Into<String>,
        shift: impl Into<String>,
    ) -> Self {
        self.department = department.into();
        self.semester = semester.into();
        self.year = year.into();
        self.shift = shift.into();
        self
    }

    /// Replaces all slots.
    pub fn with_slots(mut self, slots: Vec<TimetableSlot>) -> Self {
        self.slots = slots;
        self
    }

    /// Adds a slot.
    pub fn add_slot(&mut self, slot: TimetableSlot) {
        self.slots.push(slot);
        self.updated_at = Utc::now();
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Finds a slot by id.
    pub fn slot(&self, id: &str) -> Option<&TimetableSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Slots of one class.
    pub fn slots_for_class(&self, class_id: &str) -> Vec<&TimetableSlot> {
        self.slots.iter().filter(|s| s.class_id == class_id).collect()
    }

    /// Slots taught by one faculty member.
    pub fn slots_for_faculty(&self, faculty_id: &str) -> Vec<&TimetableSlot> {
        self.slots
            .iter()
            .filter(|s| s.faculty_id == faculty_id)
            .collect()
    }

    /// Slots grouped by (day, start) for display, each group in insertion order.
    pub fn by_period(&self) -> BTreeMap<(Weekday, ClockTime), Vec<&TimetableSlot>> {
        let mut grouped: BTreeMap<(Weekday, ClockTime), Vec<&TimetableSlot>> = BTreeMap::new();
        for slot in &self.slots {
            grouped.entry(slot.period()).or_default().push(slot);
        }
        grouped
    }

    /// Detects conflicts among this timetable's slots.
    pub fn conflicts(&self) -> Vec<Conflict> {
        crate::conflicts::detect_conflicts(&self.slots)
    }
}
