//! Feasibility-aware schedule generator.
//!
//! Builds candidate schedules one requirement at a time. For each session
//! the grid periods are visited in random order and the first period with
//! a free class, a free available faculty member and a free suitable room
//! is taken, choosing faculty and room uniformly among the free
//! candidates. When no period is feasible the generator falls back to the
//! period/faculty/room combination with the fewest collisions; the
//! resulting violations are left for the fitness evaluator to punish.
//!
//! The generator is also the mutation primitive: [`ScheduleGenerator::reassign`]
//! re-places one slot against the occupancy of all the others.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::prelude::IndexedRandom;
use rand::seq::SliceRandom;

use super::chromosome::TimetableChromosome;
use crate::models::{ClockTime, TimetableSlot, Weekday};
use crate::problem::{ProblemInstance, SessionRequirement};

type Period = (Weekday, ClockTime);

/// Resource usage of a partial schedule, keyed by problem indices.
#[derive(Debug, Clone, Default)]
struct Occupancy {
    faculty: HashMap<(usize, Period), u32>,
    rooms: HashMap<(usize, Period), u32>,
    classes: HashMap<(usize, Period), u32>,
    class_day: HashMap<(usize, Weekday), u32>,
    class_subject_day: HashMap<(usize, usize, Weekday), u32>,
    faculty_load: HashMap<usize, u32>,
}

impl Occupancy {
    /// Occupancy of `slots`, skipping the slot at `skip`.
    fn from_slots(problem: &ProblemInstance, slots: &[TimetableSlot], skip: Option<usize>) -> Self {
        let mut occ = Self::default();
        for (i, slot) in slots.iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            let placement = Placement {
                period: slot.period(),
                faculty: problem.faculty_idx(&slot.faculty_id),
                room: problem.room_idx(&slot.room_id),
            };
            occ.record(
                problem.class_idx(&slot.class_id),
                problem.subject_idx(&slot.subject_id),
                &placement,
            );
        }
        occ
    }

    fn record(&mut self, class: Option<usize>, subject: Option<usize>, placement: &Placement) {
        let (day, _) = placement.period;
        if let Some(c) = class {
            *self.classes.entry((c, placement.period)).or_insert(0) += 1;
            *self.class_day.entry((c, day)).or_insert(0) += 1;
            if let Some(s) = subject {
                *self.class_subject_day.entry((c, s, day)).or_insert(0) += 1;
            }
        }
        if let Some(f) = placement.faculty {
            *self.faculty.entry((f, placement.period)).or_insert(0) += 1;
            *self.faculty_load.entry(f).or_insert(0) += 1;
        }
        if let Some(r) = placement.room {
            *self.rooms.entry((r, placement.period)).or_insert(0) += 1;
        }
    }

    fn count<K: std::hash::Hash + Eq>(map: &HashMap<K, u32>, key: &K) -> u32 {
        map.get(key).copied().unwrap_or(0)
    }
}

/// Where one requirement lands.
#[derive(Debug, Clone, Copy)]
struct Placement {
    period: Period,
    faculty: Option<usize>,
    room: Option<usize>,
}

/// Generates candidate schedules for a problem instance.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator<'a> {
    problem: &'a ProblemInstance,
    periods: Vec<Period>,
}

impl<'a> ScheduleGenerator<'a> {
    /// Creates a generator over the problem's grid.
    pub fn new(problem: &'a ProblemInstance) -> Self {
        let mut periods = problem.grid.periods();
        if periods.is_empty() {
            periods.push((Weekday::Monday, problem.grid.day_start));
        }
        Self { problem, periods }
    }

    /// The problem being scheduled.
    pub fn problem(&self) -> &'a ProblemInstance {
        self.problem
    }

    /// Generates one schedule; slot `i` encodes requirement `i`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<TimetableSlot> {
        let mut occ = Occupancy::default();
        let mut fallbacks = 0usize;
        let slots = self
            .problem
            .requirements
            .iter()
            .map(|req| {
                let placement = self.feasible(req, &occ, rng).unwrap_or_else(|| {
                    fallbacks += 1;
                    self.least_conflicting(req, &occ, rng)
                });
                occ.record(Some(req.class_idx), Some(req.subject_idx), &placement);
                self.build_slot(req, &placement)
            })
            .collect();
        if fallbacks > 0 {
            debug!(
                "Generated schedule with {} of {} sessions placed by fallback",
                fallbacks,
                self.problem.session_count()
            );
        }
        slots
    }

    /// Generates `size` unevaluated candidates.
    pub fn seed_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<TimetableChromosome> {
        (0..size)
            .map(|_| TimetableChromosome::new(self.generate(rng)))
            .collect()
    }

    /// Re-places the slot at `index` against the occupancy of all other slots.
    ///
    /// Out-of-range indices and slots whose id does not match the
    /// requirement layout are left untouched.
    pub fn reassign<R: Rng>(&self, slots: &mut [TimetableSlot], index: usize, rng: &mut R) {
        let Some(req) = self.problem.requirements.get(index) else {
            return;
        };
        if slots.get(index).map_or(true, |s| s.id != req.slot_id) {
            return;
        }
        let occ = Occupancy::from_slots(self.problem, slots, Some(index));
        let placement = self
            .feasible(req, &occ, rng)
            .unwrap_or_else(|| self.least_conflicting(req, &occ, rng));
        slots[index] = self.build_slot(req, &placement);
    }

    /// A random fully feasible placement, if any.
    fn feasible<R: Rng>(&self, req: &SessionRequirement, occ: &Occupancy, rng: &mut R) -> Option<Placement> {
        let subject = &self.problem.subjects[req.subject_idx];
        let class_daily = self.problem.class_daily_limit();
        let subject_daily = self.problem.subject_daily_limit(subject);

        let mut order: Vec<usize> = (0..self.periods.len()).collect();
        order.shuffle(rng);

        for p in order {
            let period = self.periods[p];
            let (day, _) = period;
            if Occupancy::count(&occ.classes, &(req.class_idx, period)) > 0
                || Occupancy::count(&occ.class_day, &(req.class_idx, day)) >= class_daily
                || Occupancy::count(&occ.class_subject_day, &(req.class_idx, req.subject_idx, day))
                    >= subject_daily
            {
                continue;
            }

            let faculty: Vec<usize> = req
                .faculty_candidates
                .iter()
                .copied()
                .filter(|&f| self.faculty_cost(req, f, period, occ) == 0)
                .collect();
            if !req.faculty_candidates.is_empty() && faculty.is_empty() {
                continue;
            }

            let rooms: Vec<usize> = req
                .room_candidates
                .iter()
                .copied()
                .filter(|&r| Occupancy::count(&occ.rooms, &(r, period)) == 0)
                .collect();
            if !req.room_candidates.is_empty() && rooms.is_empty() {
                continue;
            }

            return Some(Placement {
                period,
                faculty: faculty.choose(rng).copied(),
                room: rooms.choose(rng).copied(),
            });
        }
        None
    }

    /// The placement with the fewest collisions; ties go to the first
    /// period in a random visiting order.
    fn least_conflicting<R: Rng>(&self, req: &SessionRequirement, occ: &Occupancy, rng: &mut R) -> Placement {
        let subject = &self.problem.subjects[req.subject_idx];
        let class_daily = self.problem.class_daily_limit();
        let subject_daily = self.problem.subject_daily_limit(subject);

        let mut order: Vec<usize> = (0..self.periods.len()).collect();
        order.shuffle(rng);

        let mut best: Option<(u32, Placement)> = None;
        for p in order {
            let period = self.periods[p];
            let (day, _) = period;
            let mut cost = Occupancy::count(&occ.classes, &(req.class_idx, period));
            if Occupancy::count(&occ.class_day, &(req.class_idx, day)) >= class_daily {
                cost += 1;
            }
            if Occupancy::count(&occ.class_subject_day, &(req.class_idx, req.subject_idx, day)) >= subject_daily {
                cost += 1;
            }

            let faculty = req
                .faculty_candidates
                .iter()
                .map(|&f| (self.faculty_cost(req, f, period, occ), f))
                .min_by_key(|&(c, _)| c);
            let room = req
                .room_candidates
                .iter()
                .map(|&r| (Occupancy::count(&occ.rooms, &(r, period)), r))
                .min_by_key(|&(c, _)| c);
            cost += faculty.map_or(0, |(c, _)| c) + room.map_or(0, |(c, _)| c);

            if best.as_ref().map_or(true, |(b, _)| cost < *b) {
                best = Some((
                    cost,
                    Placement {
                        period,
                        faculty: faculty.map(|(_, f)| f),
                        room: room.map(|(_, r)| r),
                    },
                ));
            }
            if cost == 0 {
                break;
            }
        }

        match best {
            Some((_, placement)) => placement,
            None => Placement {
                period: self.periods[0],
                faculty: req.faculty_candidates.first().copied(),
                room: req.room_candidates.first().copied(),
            },
        }
    }

    /// Collisions incurred by giving `period` to faculty member `f`.
    fn faculty_cost(&self, req: &SessionRequirement, f: usize, period: Period, occ: &Occupancy) -> u32 {
        let member = &self.problem.faculty[f];
        let (day, start) = period;
        let mut cost = Occupancy::count(&occ.faculty, &(f, period));
        if !member.is_available(day, start, self.problem.grid.period_minutes) {
            cost += 1;
        }
        let load = Occupancy::count(&occ.faculty_load, &f) as f64;
        if load + 1.0 > self.problem.faculty_capacity_at(f).floor() {
            cost += 1;
        }
        if req.faculty_fallback {
            cost += 1;
        }
        cost
    }

    fn build_slot(&self, req: &SessionRequirement, placement: &Placement) -> TimetableSlot {
        let (day, start) = placement.period;
        let faculty_id = placement
            .faculty
            .map(|f| self.problem.faculty[f].id.clone())
            .unwrap_or_default();
        let room_id = placement
            .room
            .map(|r| self.problem.rooms[r].id.clone())
            .unwrap_or_default();
        TimetableSlot::new(req.slot_id.clone(), day, start, self.problem.grid.period_minutes)
            .with_class(req.class_id.clone())
            .with_subject(req.subject_id.clone())
            .with_faculty(faculty_id)
            .with_room(room_id)
            .with_session_type(req.session_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::detect_conflicts;
    use crate::fitness::{FitnessEvaluator, MAX_FITNESS};
    use crate::models::{Class, EntitySnapshot, Faculty, Room, Subject, WeekGrid};
    use crate::params::OptimizationParameters;
    use crate::problem::tests::scenario_problem;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_generate_covers_every_requirement() {
        let problem = scenario_problem();
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let slots = generator.generate(&mut rng);

        assert_eq!(slots.len(), problem.session_count());
        for (slot, req) in slots.iter().zip(&problem.requirements) {
            assert_eq!(slot.id, req.slot_id);
            assert_eq!(slot.class_id, req.class_id);
            assert_eq!(slot.subject_id, req.subject_id);
            assert!(!slot.faculty_id.is_empty());
            assert!(!slot.room_id.is_empty());
        }
    }

    #[test]
    fn test_roomy_problem_is_conflict_free() {
        let problem = scenario_problem();
        let generator = ScheduleGenerator::new(&problem);
        let evaluator = FitnessEvaluator::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..5 {
            let slots = generator.generate(&mut rng);
            assert!(detect_conflicts(&slots).is_empty());
            assert_eq!(evaluator.evaluate(&problem, &slots), MAX_FITNESS);
        }
    }

    #[test]
    fn test_overconstrained_problem_still_places_everything() {
        // 3 classes share one room in a one-period week.
        let mut snap = EntitySnapshot::new()
            .with_subject(Subject::new("S1", "Art").with_credits(1))
            .with_faculty(Faculty::new("F1", "A").with_subject("Art"))
            .with_room(Room::new("R1", 100));
        for c in 1..=3 {
            snap = snap.with_class(Class::new(format!("C{c}"), "x").with_subject("Art"));
        }
        let grid = WeekGrid::new(vec![Weekday::Monday], ClockTime::hours(9), 60, 1);
        let problem = ProblemInstance::new(&snap, &OptimizationParameters::from_snapshot(&snap), &grid);
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);

        let slots = generator.generate(&mut rng);
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|s| s.room_id == "R1" && s.faculty_id == "F1"));
        assert!(!detect_conflicts(&slots).is_empty());
    }

    #[test]
    fn test_seed_population_unevaluated() {
        let problem = scenario_problem();
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let population = generator.seed_population(7, &mut rng);
        assert_eq!(population.len(), 7);
        assert!(population.iter().all(|c| !c.is_evaluated()));
    }

    #[test]
    fn test_reassign_keeps_layout() {
        let problem = scenario_problem();
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut slots = generator.generate(&mut rng);

        for i in 0..slots.len() {
            generator.reassign(&mut slots, i, &mut rng);
            assert_eq!(slots[i].id, problem.requirements[i].slot_id);
        }
        assert!(detect_conflicts(&slots).is_empty());

        let before = slots.clone();
        generator.reassign(&mut slots, 999, &mut rng);
        assert_eq!(slots, before);
    }

    #[test]
    fn test_empty_problem() {
        let problem = ProblemInstance::new(
            &EntitySnapshot::new(),
            &OptimizationParameters::default(),
            &WeekGrid::default(),
        );
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(generator.generate(&mut rng).is_empty());
    }
}
