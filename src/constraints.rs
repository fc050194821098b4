//! Timetabling constraints.
//!
//! A constraint pairs a weight with a pure violation-counting function
//! over a candidate schedule. Constraints are plain values: they can be
//! tested in isolation, re-weighted, and combined freely into a
//! [`ConstraintSet`]. Custom rules are added with [`Constraint::custom`].
//!
//! # Built-in rules
//!
//! | Kind | Counts |
//! |------|--------|
//! | Room | room double-bookings (pairs), undersized rooms |
//! | Faculty | faculty double-bookings (pairs), sessions beyond weekly capacity, sessions outside availability or for unqualified staff |
//! | Batch | class double-bookings (pairs) |
//! | SubjectFrequency | sessions beyond a subject's weekly or daily limit per class |
//! | TimeSlotLoad | sessions beyond the class daily limit |

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{ClockTime, TimetableSlot, Weekday};
use crate::problem::ProblemInstance;

/// A violation-counting function.
pub type ViolationCheck = fn(&ProblemInstance, &[TimetableSlot]) -> u32;

/// Tag identifying a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Room,
    Faculty,
    Batch,
    SubjectFrequency,
    TimeSlotLoad,
    /// User-defined rule.
    Custom(&'static str),
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Room => f.write_str("room"),
            ConstraintKind::Faculty => f.write_str("faculty"),
            ConstraintKind::Batch => f.write_str("batch"),
            ConstraintKind::SubjectFrequency => f.write_str("subject-frequency"),
            ConstraintKind::TimeSlotLoad => f.write_str("time-slot-load"),
            ConstraintKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Relative cost of one violation per constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintWeights {
    pub room: f64,
    pub faculty: f64,
    pub batch: f64,
    pub subject_frequency: f64,
    pub time_slot_load: f64,
}

impl Default for ConstraintWeights {
    fn default() -> Self {
        Self {
            room: 10.0,
            faculty: 8.0,
            batch: 7.0,
            subject_frequency: 6.0,
            time_slot_load: 5.0,
        }
    }
}

/// A weighted constraint.
#[derive(Clone, Copy)]
pub struct Constraint {
    /// Which rule this is.
    pub kind: ConstraintKind,
    /// Cost of one violation.
    pub weight: f64,
    check: ViolationCheck,
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .finish()
    }
}

impl Constraint {
    /// No two slots in the same room at the same (day, time); rooms must seat the class.
    pub fn room(weight: f64) -> Self {
        Self {
            kind: ConstraintKind::Room,
            weight,
            check: room_violations,
        }
    }

    /// No faculty double-booking; weekly load within capacity; availability and qualification respected.
    pub fn faculty(weight: f64) -> Self {
        Self {
            kind: ConstraintKind::Faculty,
            weight,
            check: faculty_violations,
        }
    }

    /// No class with two simultaneous sessions.
    pub fn batch(weight: f64) -> Self {
        Self {
            kind: ConstraintKind::Batch,
            weight,
            check: batch_violations,
        }
    }

    /// Per (class, subject) sessions within weekly and daily limits.
    pub fn subject_frequency(weight: f64) -> Self {
        Self {
            kind: ConstraintKind::SubjectFrequency,
            weight,
            check: subject_frequency_violations,
        }
    }

    /// Per (class, day) sessions within the daily limit.
    pub fn time_slot_load(weight: f64) -> Self {
        Self {
            kind: ConstraintKind::TimeSlotLoad,
            weight,
            check: time_slot_load_violations,
        }
    }

    /// A user-defined rule.
    pub fn custom(name: &'static str, weight: f64, check: ViolationCheck) -> Self {
        Self {
            kind: ConstraintKind::Custom(name),
            weight,
            check,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Number of violations in `slots`.
    #[inline]
    pub fn violations(&self, problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
        (self.check)(problem, slots)
    }

    /// Weighted penalty: `violations × weight`.
    pub fn penalty(&self, problem: &ProblemInstance, slots: &[TimetableSlot]) -> f64 {
        self.violations(problem, slots) as f64 * self.weight
    }
}

/// An ordered collection of constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The five built-in rules with the given weights.
    pub fn standard(weights: &ConstraintWeights) -> Self {
        Self::new()
            .with(Constraint::room(weights.room))
            .with(Constraint::faculty(weights.faculty))
            .with(Constraint::batch(weights.batch))
            .with(Constraint::subject_frequency(weights.subject_frequency))
            .with(Constraint::time_slot_load(weights.time_slot_load))
    }

    /// Builder: adds a constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.add(constraint);
        self
    }

    /// Adds a constraint.
    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Iterates constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Finds the first constraint of a kind.
    pub fn get(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.kind == kind)
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

type PeriodKey = (Weekday, ClockTime);

/// Colliding pairs among slots sharing (day, start) and a resource id.
///
/// A group of `n` slots contributes `n(n-1)/2` pairs. Empty ids never collide.
fn colliding_pairs<'a>(
    slots: &'a [TimetableSlot],
    resource: impl Fn(&'a TimetableSlot) -> &'a str,
) -> u32 {
    let mut groups: HashMap<(PeriodKey, &'a str), u32> = HashMap::new();
    for slot in slots {
        let id = resource(slot);
        if !id.is_empty() {
            *groups.entry((slot.period(), id)).or_insert(0) += 1;
        }
    }
    groups
        .values()
        .map(|&n| n.saturating_mul(n.saturating_sub(1)) / 2)
        .fold(0, u32::saturating_add)
}

fn excess(count: u32, limit: u32) -> u32 {
    count.saturating_sub(limit)
}

fn room_violations(problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
    let undersized = slots
        .iter()
        .filter(|s| match (problem.room(&s.room_id), problem.class(&s.class_id)) {
            (Some(room), Some(class)) => !room.fits(class.student_count),
            _ => false,
        })
        .count() as u32;
    colliding_pairs(slots, |s| s.room_id.as_str()).saturating_add(undersized)
}

fn faculty_violations(problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
    let double_booked = colliding_pairs(slots, |s| s.faculty_id.as_str());

    let mut load: HashMap<&str, u32> = HashMap::new();
    let mut misplaced = 0;
    for slot in slots {
        if slot.faculty_id.is_empty() {
            continue;
        }
        *load.entry(slot.faculty_id.as_str()).or_insert(0) += 1;
        let available = problem
            .faculty_member(&slot.faculty_id)
            .is_some_and(|f| f.is_available(slot.day, slot.start, slot.duration_minutes));
        if !available {
            misplaced += 1;
        }
        if !problem.is_qualified(&slot.faculty_id, &slot.subject_id) {
            misplaced += 1;
        }
    }

    let overloaded: u32 = load
        .iter()
        .filter(|(id, _)| problem.faculty_member(id).is_some())
        .map(|(id, &n)| excess(n, problem.faculty_capacity(id).floor() as u32))
        .sum();

    double_booked + overloaded + misplaced
}

fn batch_violations(_problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
    colliding_pairs(slots, |s| s.class_id.as_str())
}

fn subject_frequency_violations(problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
    let mut weekly: HashMap<(&str, &str), u32> = HashMap::new();
    let mut daily: HashMap<(&str, &str, Weekday), u32> = HashMap::new();
    for slot in slots {
        *weekly
            .entry((slot.class_id.as_str(), slot.subject_id.as_str()))
            .or_insert(0) += 1;
        *daily
            .entry((slot.class_id.as_str(), slot.subject_id.as_str(), slot.day))
            .or_insert(0) += 1;
    }

    let over_week: u32 = weekly
        .iter()
        .filter_map(|(&(_, subject_id), &n)| {
            problem
                .subject(subject_id)
                .map(|s| excess(n, problem.subject_weekly_limit(s)))
        })
        .sum();
    let over_day: u32 = daily
        .iter()
        .filter_map(|(&(_, subject_id, _), &n)| {
            problem
                .subject(subject_id)
                .map(|s| excess(n, problem.subject_daily_limit(s)))
        })
        .sum();
    over_week + over_day
}

fn time_slot_load_violations(problem: &ProblemInstance, slots: &[TimetableSlot]) -> u32 {
    let mut per_day: HashMap<(&str, Weekday), u32> = HashMap::new();
    for slot in slots {
        *per_day.entry((slot.class_id.as_str(), slot.day)).or_insert(0) += 1;
    }
    let limit = problem.class_daily_limit();
    per_day.values().map(|&n| excess(n, limit)).sum()
}
