//! Fitness evaluation.
//!
//! Aggregates weighted constraint violations into a single score:
//!
//! ```text
//! fitness = max(0, 100 − Σ violations_c × weight_c)
//! ```
//!
//! Higher is better; 100 means no violations. Evaluation is pure and
//! deterministic, and cheap enough to run once per candidate per
//! generation.

use crate::constraints::{ConstraintKind, ConstraintSet, ConstraintWeights};
use crate::models::TimetableSlot;
use crate::problem::ProblemInstance;

/// Score of a schedule with no violations.
pub const MAX_FITNESS: f64 = 100.0;

/// Violations found by one constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintReport {
    pub kind: ConstraintKind,
    pub violations: u32,
    pub penalty: f64,
}

/// Scores candidate schedules against a constraint set.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    constraints: ConstraintSet,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(ConstraintSet::standard(&ConstraintWeights::default()))
    }
}

impl FitnessEvaluator {
    /// Creates an evaluator over a constraint set.
    pub fn new(constraints: ConstraintSet) -> Self {
        Self { constraints }
    }

    /// Creates an evaluator with the built-in constraints.
    pub fn with_weights(weights: &ConstraintWeights) -> Self {
        Self::new(ConstraintSet::standard(weights))
    }

    /// The constraint set.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Total weighted penalty.
    pub fn penalty(&self, problem: &ProblemInstance, slots: &[TimetableSlot]) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.penalty(problem, slots))
            .sum()
    }

    /// Fitness in `[0, 100]`.
    pub fn evaluate(&self, problem: &ProblemInstance, slots: &[TimetableSlot]) -> f64 {
        (MAX_FITNESS - self.penalty(problem, slots)).clamp(0.0, MAX_FITNESS)
    }

    /// Per-constraint violation counts.
    pub fn breakdown(&self, problem: &ProblemInstance, slots: &[TimetableSlot]) -> Vec<ConstraintReport> {
        self.constraints
            .iter()
            .map(|c| {
                let violations = c.violations(problem, slots);
                ConstraintReport {
                    kind: c.kind,
                    violations,
                    penalty: violations as f64 * c.weight,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraint;
    use crate::models::{ClockTime, Weekday};
    use crate::problem::tests::scenario_problem;

    fn slot(id: &str, hour: u16, class: &str, faculty: &str, room: &str) -> TimetableSlot {
        TimetableSlot::new(id, Weekday::Monday, ClockTime::hours(hour), 60)
            .with_class(class)
            .with_subject("S1")
            .with_faculty(faculty)
            .with_room(room)
    }

    #[test]
    fn test_clean_schedule_scores_max() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let slots = vec![slot("a", 9, "C1", "F1", "R1"), slot("b", 9, "C2", "F2", "R2")];
        assert_eq!(evaluator.evaluate(&problem, &slots), MAX_FITNESS);
        assert_eq!(evaluator.evaluate(&problem, &[]), MAX_FITNESS);
    }

    #[test]
    fn test_room_collision_lowers_fitness() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let mut slots = vec![slot("a", 9, "C1", "F1", "R1"), slot("b", 9, "C2", "F2", "R2")];
        let before = evaluator.evaluate(&problem, &slots);

        slots.push(slot("c", 9, "C3", "F3", "R1"));
        let after = evaluator.evaluate(&problem, &slots);
        assert!(after <= before);
        assert!((before - after - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_fitness_monotone_in_room_collisions() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let mut slots = Vec::new();
        let mut previous = evaluator.evaluate(&problem, &slots);
        for i in 0..4 {
            slots.push(slot(&format!("s{i}"), 9, &format!("C{}", i + 1), &format!("F{}", i % 3 + 1), "R1"));
            let current = evaluator.evaluate(&problem, &slots);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_fitness_floored_at_zero() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::new(ConstraintSet::new().with(Constraint::batch(1000.0)));
        let slots = vec![slot("a", 9, "C1", "F1", "R1"), slot("b", 9, "C1", "F2", "R2")];
        assert_eq!(evaluator.evaluate(&problem, &slots), 0.0);
    }

    #[test]
    fn test_breakdown() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let slots = vec![
            slot("a", 9, "C1", "F1", "R1"),
            slot("b", 9, "C1", "F2", "R1").with_subject("S2"),
        ];
        let report = evaluator.breakdown(&problem, &slots);
        assert_eq!(report.len(), 5);
        let room = report.iter().find(|r| r.kind == ConstraintKind::Room).unwrap();
        let batch = report.iter().find(|r| r.kind == ConstraintKind::Batch).unwrap();
        assert_eq!(room.violations, 1);
        assert_eq!(batch.violations, 1);
        assert!((evaluator.penalty(&problem, &slots) - 17.0).abs() < 1e-10);
    }
}
