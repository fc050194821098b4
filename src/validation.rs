//! Input validation for timetabling problems.
//!
//! Two layers of checks run before optimization:
//!
//! - [`validate_parameters`]: count-level sanity and aggregate
//!   feasibility (enough room-time and faculty-time for the weekly demand).
//!   Reports human-readable messages; never fails hard. The caller
//!   decides whether to abort or proceed with a warning.
//! - [`validate_entities`]: structural integrity of an entity snapshot
//!   (duplicate ids, dangling subject/faculty references, inconsistent
//!   limits, subjects nobody can teach).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{EntitySnapshot, Weekday};
use crate::params::OptimizationParameters;

/// Working days assumed by [`validate_parameters`].
pub const DEFAULT_WORKING_DAYS: usize = Weekday::WORKING_DAYS.len();

/// Outcome of parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether no problems were found.
    pub valid: bool,
    /// Human-readable problems, in check order.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Builds a result from collected messages.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// A structural validation error in an entity snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of entity validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of one kind share the same ID.
    DuplicateId,
    /// A class requires a subject name that no subject carries.
    UnknownSubject,
    /// A subject is fixed to a faculty member that doesn't exist.
    UnknownFaculty,
    /// A subject's daily limit exceeds its weekly limit.
    InconsistentLimits,
    /// No faculty member can teach a required subject.
    NoCapableFaculty,
    /// There are sessions to place but no rooms.
    NoRooms,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates optimization parameters against a standard five-day week.
///
/// See [`validate_parameters_for`].
pub fn validate_parameters(params: &OptimizationParameters) -> ValidationResult {
    validate_parameters_for(params, DEFAULT_WORKING_DAYS)
}

/// Validates optimization parameters for a week of `working_days` days.
///
/// Checks:
/// 1. Classroom, batch, subject and faculty counts are positive
/// 2. Daily and per-subject session maxima are positive
/// 3. Per-subject daily maximum ≤ per-subject weekly maximum
/// 4. Faculty leave days are non-negative
/// 5. Required weekly sessions fit the classroom capacity
/// 6. Required weekly sessions fit the leave-discounted faculty capacity
pub fn validate_parameters_for(params: &OptimizationParameters, working_days: usize) -> ValidationResult {
    let mut errors = Vec::new();

    let counts = [
        ("Classroom count", params.classroom_count),
        ("Batch count", params.batch_count),
        ("Subject count", params.subject_count),
        ("Faculty count", params.faculty_count),
    ];
    for (label, value) in counts {
        if value <= 0 {
            errors.push(format!("{label} must be a positive integer (got {value})"));
        }
    }

    let maxima = [
        ("Maximum classes per day", params.max_classes_per_day),
        (
            "Maximum classes per subject per week",
            params.max_classes_per_subject_per_week,
        ),
        (
            "Maximum classes per subject per day",
            params.max_classes_per_subject_per_day,
        ),
    ];
    for (label, value) in maxima {
        if value <= 0 {
            errors.push(format!("{label} must be positive (got {value})"));
        }
    }

    if params.max_classes_per_subject_per_day > params.max_classes_per_subject_per_week {
        errors.push(format!(
            "Maximum classes per subject per day ({}) cannot exceed maximum classes per subject per week ({})",
            params.max_classes_per_subject_per_day, params.max_classes_per_subject_per_week
        ));
    }

    if params.faculty_leave_days < 0 {
        errors.push(format!(
            "Faculty leave days cannot be negative (got {})",
            params.faculty_leave_days
        ));
    }

    let required = params.required_weekly_sessions();
    let classroom_slots = params.classroom_capacity_slots(working_days);
    if required > classroom_slots {
        errors.push(format!(
            "Insufficient classroom slots: {required} weekly sessions required but only {classroom_slots} classroom slots available"
        ));
    }

    let faculty_slots = params.effective_faculty_capacity_slots(working_days);
    if required as f64 > faculty_slots {
        errors.push(format!(
            "Insufficient faculty capacity: {required} weekly sessions required but only {:.0} faculty slots available after leave",
            faculty_slots.floor()
        ));
    }

    ValidationResult::from_errors(errors)
}

/// Validates the structure of an entity snapshot.
///
/// Checks:
/// 1. No duplicate class, subject, faculty or room IDs
/// 2. Every subject a class requires exists
/// 3. Every fixed faculty assignment points to an existing member
/// 4. Every subject has `max_classes_per_day ≤ max_classes_per_week`
/// 5. Every required subject has at least one capable faculty member
/// 6. Rooms exist whenever any class requires subjects
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_entities(snapshot: &EntitySnapshot) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_unique("class", snapshot.classes.iter().map(|c| c.id.as_str()), &mut errors);
    check_unique("subject", snapshot.subjects.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique("faculty", snapshot.faculty.iter().map(|f| f.id.as_str()), &mut errors);
    check_unique("room", snapshot.rooms.iter().map(|r| r.id.as_str()), &mut errors);

    let faculty_ids: HashSet<&str> = snapshot.faculty.iter().map(|f| f.id.as_str()).collect();

    for subject in &snapshot.subjects {
        if let Some(fid) = &subject.faculty_id {
            if !faculty_ids.contains(fid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownFaculty,
                    format!("Subject '{}' is assigned to unknown faculty '{}'", subject.id, fid),
                ));
            }
        }
        if !subject.has_consistent_limits() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InconsistentLimits,
                format!(
                    "Subject '{}' allows {} sessions per day but only {} per week",
                    subject.id, subject.max_classes_per_day, subject.max_classes_per_week
                ),
            ));
        }
    }

    let mut reported: HashSet<&str> = HashSet::new();
    for class in &snapshot.classes {
        for name in &class.subjects {
            match snapshot.subject_by_name(name) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSubject,
                    format!("Class '{}' requires unknown subject '{}'", class.id, name),
                )),
                Some(subject) => {
                    let capable = match &subject.faculty_id {
                        Some(fid) => faculty_ids.contains(fid.as_str()),
                        None => snapshot.faculty.iter().any(|f| f.can_teach(name)),
                    };
                    if !capable && reported.insert(name.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::NoCapableFaculty,
                            format!("No faculty member can teach subject '{name}'"),
                        ));
                    }
                }
            }
        }
    }

    let has_demand = snapshot.classes.iter().any(|c| !c.subjects.is_empty());
    if has_demand && snapshot.rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRooms,
            "Classes require sessions but no rooms are defined",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, Faculty, Room, Subject};

    fn scenario_params() -> OptimizationParameters {
        OptimizationParameters {
            classroom_count: 4,
            batch_count: 4,
            subject_count: 3,
            faculty_count: 3,
            max_classes_per_day: 4,
            max_classes_per_subject_per_week: 3,
            max_classes_per_subject_per_day: 1,
            faculty_leave_days: 0,
            ..Default::default()
        }
    }

    fn sample_snapshot() -> EntitySnapshot {
        EntitySnapshot::new()
            .with_class(Class::new("C1", "A").with_students(30).with_subject("Math"))
            .with_subject(Subject::new("S1", "Math"))
            .with_faculty(Faculty::new("F1", "P").with_subject("Math"))
            .with_room(Room::new("R1", 40))
    }

    #[test]
    fn test_valid_parameters() {
        let result = validate_parameters(&scenario_params());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_insufficient_classroom_slots() {
        let params = OptimizationParameters {
            classroom_count: 1,
            max_classes_per_day: 2,
            ..scenario_params()
        };
        // 36 required vs 1 * 5 * 2 = 10
        let result = validate_parameters(&params);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.to_lowercase().contains("insufficient classroom slots")));
    }

    #[test]
    fn test_insufficient_faculty_capacity_after_leave() {
        let params = OptimizationParameters {
            classroom_count: 20,
            faculty_count: 1,
            faculty_leave_days: 2,
            ..scenario_params()
        };
        // 36 required vs 1 * 5 * 4 * 0.6 = 12
        let result = validate_parameters(&params);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("Insufficient faculty capacity")));
        assert!(!result.errors.iter().any(|e| e.contains("classroom slots")));
    }

    #[test]
    fn test_non_positive_counts_and_limits() {
        let params = OptimizationParameters {
            classroom_count: 0,
            batch_count: -1,
            max_classes_per_subject_per_day: 0,
            faculty_leave_days: -2,
            ..scenario_params()
        };
        let result = validate_parameters(&params);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.starts_with("Classroom count")));
        assert!(result.errors.iter().any(|e| e.starts_with("Batch count")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.starts_with("Maximum classes per subject per day must be positive")));
        assert!(result.errors.iter().any(|e| e.contains("leave days cannot be negative")));
    }

    #[test]
    fn test_per_day_exceeds_per_week() {
        let params = scenario_params().with_subject_limits(1, 2);
        let result = validate_parameters(&params);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("cannot exceed")));
    }

    #[test]
    fn test_custom_working_days() {
        // 36 required vs 4 * 2 * 4 = 32 classroom slots
        let result = validate_parameters_for(&scenario_params(), 2);
        assert!(!result.valid);
    }

    #[test]
    fn test_valid_entities() {
        assert!(validate_entities(&sample_snapshot()).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let snap = sample_snapshot().with_room(Room::new("R1", 10));
        let errors = validate_entities(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_unknown_subject_and_faculty() {
        let snap = sample_snapshot()
            .with_class(Class::new("C2", "B").with_subject("Art"))
            .with_subject(Subject::new("S2", "Bio").with_faculty("F9"));
        let errors = validate_entities(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownSubject));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownFaculty));
    }

    #[test]
    fn test_no_capable_faculty_reported_once() {
        let snap = EntitySnapshot::new()
            .with_class(Class::new("C1", "A").with_subject("Chem"))
            .with_class(Class::new("C2", "B").with_subject("Chem"))
            .with_subject(Subject::new("S1", "Chem"))
            .with_room(Room::new("R1", 40));
        let errors = validate_entities(&snap).unwrap_err();
        let count = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::NoCapableFaculty)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_inconsistent_limits_and_no_rooms() {
        let snap = EntitySnapshot::new()
            .with_class(Class::new("C1", "A").with_subject("Math"))
            .with_subject(Subject::new("S1", "Math").with_limits(1, 3))
            .with_faculty(Faculty::new("F1", "P").with_subject("Math"));
        let errors = validate_entities(&snap).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InconsistentLimits));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoRooms));
    }
}
