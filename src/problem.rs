//! Indexed problem instance.
//!
//! Bridges the entity snapshot to the optimizer: resolves subject names,
//! expands classes into per-session requirements, precomputes candidate
//! faculty and rooms, and caches faculty capacities. Built once per run
//! and shared read-only by the generator, the constraints and the ranker.
//!
//! # Requirement order
//! Requirements are expanded class by class, in each class's subject
//! order, one entry per weekly session. Every candidate schedule stores
//! its slots in this order, so slot `i` always encodes requirement `i`.

use log::warn;
use std::collections::HashMap;

use crate::models::{Class, EntitySnapshot, Faculty, Room, Subject, SubjectType, WeekGrid};
use crate::params::OptimizationParameters;

/// One session a class must receive for one subject.
#[derive(Debug, Clone)]
pub struct SessionRequirement {
    /// Stable slot id (`<class>-<subject>-<n>`).
    pub slot_id: String,
    pub class_id: String,
    pub subject_id: String,
    /// Index into `ProblemInstance::classes`.
    pub class_idx: usize,
    /// Index into `ProblemInstance::subjects`.
    pub subject_idx: usize,
    pub session_type: SubjectType,
    /// 1-based session ordinal within the week.
    pub ordinal: u32,
    /// Indices into `ProblemInstance::faculty` able to teach this session.
    pub faculty_candidates: Vec<usize>,
    /// Whether the candidates are a fallback (nobody is capable).
    pub faculty_fallback: bool,
    /// Indices into `ProblemInstance::rooms` suitable for this session.
    pub room_candidates: Vec<usize>,
}

/// A timetabling problem ready for optimization.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub faculty: Vec<Faculty>,
    pub rooms: Vec<Room>,
    pub grid: WeekGrid,
    pub params: OptimizationParameters,
    /// Expanded session requirements (the chromosome layout).
    pub requirements: Vec<SessionRequirement>,
    class_index: HashMap<String, usize>,
    subject_index: HashMap<String, usize>,
    faculty_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    faculty_capacity: Vec<f64>,
}

impl ProblemInstance {
    /// Builds a problem from an entity snapshot.
    ///
    /// Unknown subject names are skipped with a warning; they are reported
    /// by [`validate_entities`](crate::validation::validate_entities).
    pub fn new(snapshot: &EntitySnapshot, params: &OptimizationParameters, grid: &WeekGrid) -> Self {
        let index_of = |ids: Vec<&str>| -> HashMap<String, usize> {
            ids.into_iter()
                .enumerate()
                .map(|(i, id)| (id.to_string(), i))
                .collect()
        };
        let class_index = index_of(snapshot.classes.iter().map(|c| c.id.as_str()).collect());
        let subject_index = index_of(snapshot.subjects.iter().map(|s| s.id.as_str()).collect());
        let faculty_index = index_of(snapshot.faculty.iter().map(|f| f.id.as_str()).collect());
        let room_index = index_of(snapshot.rooms.iter().map(|r| r.id.as_str()).collect());

        let faculty_capacity = snapshot
            .faculty
            .iter()
            .map(|f| f.weekly_capacity(grid))
            .collect();

        let mut requirements = Vec::new();
        for (class_idx, class) in snapshot.classes.iter().enumerate() {
            for name in &class.subjects {
                let Some(subject) = snapshot.subject_by_name(name) else {
                    warn!("Class '{}' requires unknown subject '{}', skipping", class.id, name);
                    continue;
                };
                let subject_idx = subject_index[&subject.id];
                let (faculty_candidates, faculty_fallback) =
                    candidate_faculty(subject, &snapshot.faculty, &faculty_index);
                let room_candidates = candidate_rooms(subject, class, &snapshot.rooms);
                for ordinal in 1..=weekly_demand(subject, params) {
                    requirements.push(SessionRequirement {
                        slot_id: format!("{}-{}-{}", class.id, subject.id, ordinal),
                        class_id: class.id.clone(),
                        subject_id: subject.id.clone(),
                        class_idx,
                        subject_idx,
                        session_type: subject.subject_type,
                        ordinal,
                        faculty_candidates: faculty_candidates.clone(),
                        faculty_fallback,
                        room_candidates: room_candidates.clone(),
                    });
                }
            }
        }

        Self {
            classes: snapshot.classes.clone(),
            subjects: snapshot.subjects.clone(),
            faculty: snapshot.faculty.clone(),
            rooms: snapshot.rooms.clone(),
            grid: grid.clone(),
            params: params.clone(),
            requirements,
            class_index,
            subject_index,
            faculty_index,
            room_index,
            faculty_capacity,
        }
    }

    /// Looks up a class by id.
    pub fn class(&self, id: &str) -> Option<&Class> {
        self.class_index.get(id).map(|&i| &self.classes[i])
    }

    /// Looks up a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subject_index.get(id).map(|&i| &self.subjects[i])
    }

    /// Looks up a faculty member by id.
    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty_index.get(id).map(|&i| &self.faculty[i])
    }

    /// Looks up a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    /// Index of a class by id.
    pub fn class_idx(&self, id: &str) -> Option<usize> {
        self.class_index.get(id).copied()
    }

    /// Index of a subject by id.
    pub fn subject_idx(&self, id: &str) -> Option<usize> {
        self.subject_index.get(id).copied()
    }

    /// Index of a faculty member by id.
    pub fn faculty_idx(&self, id: &str) -> Option<usize> {
        self.faculty_index.get(id).copied()
    }

    /// Index of a room by id.
    pub fn room_idx(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    /// Weekly session capacity of the faculty member at `idx`.
    pub fn faculty_capacity_at(&self, idx: usize) -> f64 {
        self.faculty_capacity.get(idx).copied().unwrap_or(0.0)
    }

    /// Weekly session capacity of a faculty member (0 if unknown).
    pub fn faculty_capacity(&self, id: &str) -> f64 {
        self.faculty_index
            .get(id)
            .map(|&i| self.faculty_capacity[i])
            .unwrap_or(0.0)
    }

    /// Effective weekly limit for a subject: min(subject limit, parameter limit).
    pub fn subject_weekly_limit(&self, subject: &Subject) -> u32 {
        weekly_limit(subject, &self.params)
    }

    /// Effective daily limit for a subject: min(subject limit, parameter limit).
    pub fn subject_daily_limit(&self, subject: &Subject) -> u32 {
        subject.max_classes_per_day.min(self.params.subject_daily_limit())
    }

    /// Whether a faculty member may teach a subject.
    ///
    /// A fixed assignment admits only that member; otherwise the member must
    /// list the subject. Unknown subjects cannot be judged and pass.
    pub fn is_qualified(&self, faculty_id: &str, subject_id: &str) -> bool {
        let Some(subject) = self.subject(subject_id) else {
            return true;
        };
        match &subject.faculty_id {
            Some(fixed) if self.faculty_index.contains_key(fixed) => fixed == faculty_id,
            _ => self
                .faculty_member(faculty_id)
                .is_some_and(|f| f.can_teach(&subject.name)),
        }
    }

    /// Maximum sessions per class per day.
    pub fn class_daily_limit(&self) -> u32 {
        self.params.daily_limit()
    }

    /// Number of session requirements (chromosome length).
    pub fn session_count(&self) -> usize {
        self.requirements.len()
    }
}

/// Faculty able to teach `subject`.
///
/// A fixed assignment wins; otherwise everyone listing the subject. When
/// nobody qualifies, every member is a (violating) fallback candidate.
fn candidate_faculty(
    subject: &Subject,
    faculty: &[Faculty],
    faculty_index: &HashMap<String, usize>,
) -> (Vec<usize>, bool) {
    if let Some(idx) = subject
        .faculty_id
        .as_ref()
        .and_then(|fid| faculty_index.get(fid))
    {
        return (vec![*idx], false);
    }
    let capable: Vec<usize> = faculty
        .iter()
        .enumerate()
        .filter(|(_, f)| f.can_teach(&subject.name))
        .map(|(i, _)| i)
        .collect();
    if capable.is_empty() {
        ((0..faculty.len()).collect(), true)
    } else {
        (capable, false)
    }
}

fn weekly_limit(subject: &Subject, params: &OptimizationParameters) -> u32 {
    subject.max_classes_per_week.min(params.subject_weekly_limit())
}

/// Sessions to schedule per class for a subject: `credits` clamped into
/// `[1, weekly limit]`, or none when the effective limit is 0.
fn weekly_demand(subject: &Subject, params: &OptimizationParameters) -> u32 {
    match weekly_limit(subject, params) {
        0 => 0,
        limit => subject.weekly_sessions().min(limit),
    }
}

/// Rooms for a session, most suitable tier first.
///
/// Prefers rooms that fit the class and suit the session type, then rooms
/// that merely fit, then any room.
fn candidate_rooms(subject: &Subject, class: &Class, rooms: &[Room]) -> Vec<usize> {
    let pick = |pred: &dyn Fn(&Room) -> bool| -> Vec<usize> {
        rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| pred(r))
            .map(|(i, _)| i)
            .collect()
    };
    let ideal = pick(&|r: &Room| r.fits(class.student_count) && r.suits(subject.subject_type));
    if !ideal.is_empty() {
        return ideal;
    }
    let fitting = pick(&|r: &Room| r.fits(class.student_count));
    if !fitting.is_empty() {
        return fitting;
    }
    (0..rooms.len()).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Class, Faculty, Room, Subject};

    /// 4 classes × 3 subjects, 3 faculty capable of all, 4 rooms.
    pub(crate) fn scenario_snapshot() -> EntitySnapshot {
        let subjects = ["Mathematics", "Physics", "Programming"];
        let mut snap = EntitySnapshot::new();
        for (i, name) in subjects.iter().enumerate() {
            snap = snap.with_subject(Subject::new(format!("S{}", i + 1), *name).with_credits(3));
        }
        for c in 1..=4 {
            let mut class = Class::new(format!("C{c}"), format!("Batch {c}")).with_students(40);
            for name in subjects {
                class = class.with_subject(name);
            }
            snap = snap.with_class(class);
        }
        for f in 1..=3 {
            let mut member = Faculty::new(format!("F{f}"), format!("Faculty {f}"));
            for name in subjects {
                member = member.with_subject(name);
            }
            snap = snap.with_faculty(member);
        }
        for r in 1..=4 {
            snap = snap.with_room(Room::new(format!("R{r}"), 60));
        }
        snap
    }

    pub(crate) fn scenario_params() -> OptimizationParameters {
        OptimizationParameters::from_snapshot(&scenario_snapshot())
            .with_max_classes_per_day(4)
            .with_subject_limits(3, 1)
    }

    pub(crate) fn scenario_problem() -> ProblemInstance {
        ProblemInstance::new(&scenario_snapshot(), &scenario_params(), &WeekGrid::default())
    }

    #[test]
    fn test_requirements_expansion() {
        let problem = scenario_problem();
        // 4 classes × 3 subjects × 3 weekly sessions
        assert_eq!(problem.session_count(), 36);
        let first = &problem.requirements[0];
        assert_eq!(first.slot_id, "C1-S1-1");
        assert_eq!(first.faculty_candidates.len(), 3);
        assert_eq!(first.room_candidates.len(), 4);
        assert!(!first.faculty_fallback);
    }

    #[test]
    fn test_demand_capped_by_parameter_limit() {
        let snap = EntitySnapshot::new()
            .with_subject(Subject::new("S1", "Math"))
            .with_class(Class::new("C1", "A").with_students(20).with_subject("Math"))
            .with_faculty(Faculty::new("F1", "A").with_subject("Math"))
            .with_room(Room::new("R1", 50));
        let grid = WeekGrid::default();

        let params = OptimizationParameters::from_snapshot(&snap).with_subject_limits(2, 1);
        let problem = ProblemInstance::new(&snap, &params, &grid);
        assert_eq!(problem.session_count(), 2);
        assert_eq!(problem.requirements[1].slot_id, "C1-S1-2");

        let params = OptimizationParameters::from_snapshot(&snap).with_subject_limits(0, 0);
        assert_eq!(ProblemInstance::new(&snap, &params, &grid).session_count(), 0);
    }

    #[test]
    fn test_lookups_and_capacity() {
        let problem = scenario_problem();
        assert_eq!(problem.class("C2").map(|c| c.name.as_str()), Some("Batch 2"));
        assert!(problem.subject("S3").is_some());
        assert!(problem.room("R9").is_none());
        assert!((problem.faculty_capacity("F1") - 40.0).abs() < 1e-10);
        assert_eq!(problem.faculty_capacity("nobody"), 0.0);
        assert_eq!(problem.class_daily_limit(), 4);
    }

    #[test]
    fn test_fixed_faculty_and_lab_rooms() {
        let snap = EntitySnapshot::new()
            .with_class(Class::new("C1", "A").with_students(20).with_subject("Chem Lab"))
            .with_subject(
                Subject::new("S1", "Chem Lab")
                    .with_type(SubjectType::Lab)
                    .with_credits(1)
                    .with_faculty("F2"),
            )
            .with_faculty(Faculty::new("F1", "A").with_subject("Chem Lab"))
            .with_faculty(Faculty::new("F2", "B"))
            .with_room(Room::new("R1", 50))
            .with_room(Room::laboratory("L1", 25));
        let problem = ProblemInstance::new(
            &snap,
            &OptimizationParameters::from_snapshot(&snap),
            &WeekGrid::default(),
        );
        let req = &problem.requirements[0];
        assert_eq!(req.faculty_candidates, vec![1]);
        assert_eq!(req.room_candidates, vec![1]);
    }

    #[test]
    fn test_fallback_candidates() {
        let snap = EntitySnapshot::new()
            .with_class(Class::new("C1", "A").with_students(500).with_subject("Art"))
            .with_class(Class::new("C2", "B").with_subject("Unknown"))
            .with_subject(Subject::new("S1", "Art").with_credits(1))
            .with_faculty(Faculty::new("F1", "A"))
            .with_room(Room::new("R1", 50));
        let problem = ProblemInstance::new(
            &snap,
            &OptimizationParameters::from_snapshot(&snap),
            &WeekGrid::default(),
        );
        assert_eq!(problem.session_count(), 1);
        let req = &problem.requirements[0];
        assert!(req.faculty_fallback);
        assert_eq!(req.faculty_candidates, vec![0]);
        assert_eq!(req.room_candidates, vec![0]);
    }

    #[test]
    fn test_is_qualified() {
        let problem = scenario_problem();
        assert!(problem.is_qualified("F1", "S1"));
        assert!(!problem.is_qualified("F9", "S1"));
        assert!(problem.is_qualified("F9", "unknown-subject"));
    }

    #[test]
    fn test_effective_subject_limits() {
        let problem = scenario_problem();
        let subject = Subject::new("X", "X").with_limits(5, 2);
        assert_eq!(problem.subject_weekly_limit(&subject), 3);
        assert_eq!(problem.subject_daily_limit(&subject), 1);
    }
}
