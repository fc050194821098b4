//! Slot-list chromosome for timetabling.
//!
//! # Encoding
//!
//! A chromosome is the full slot list of a candidate schedule, laid out in
//! requirement order: gene `i` is the placement (period, faculty, room) of
//! requirement `i`. Because every candidate shares the layout, positional
//! crossover never loses or duplicates a session.

use rand::Rng;

use super::generator::ScheduleGenerator;
use crate::models::TimetableSlot;
use crate::problem::ProblemInstance;

/// Candidate schedule for the timetabling GA.
///
/// Higher fitness = better schedule (maximization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableChromosome {
    /// Slots in requirement order.
    pub slots: Vec<TimetableSlot>,
    /// Fitness value (higher = better), `NEG_INFINITY` until evaluated.
    pub fitness: f64,
}

impl TimetableChromosome {
    /// Wraps a slot list as an unevaluated chromosome.
    pub fn new(slots: Vec<TimetableSlot>) -> Self {
        Self {
            slots,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Whether fitness has been computed.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_finite()
    }

    /// Clears the cached fitness after a change.
    pub fn invalidate(&mut self) {
        self.fitness = f64::NEG_INFINITY;
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Validates the layout against the problem's requirements.
    pub fn is_valid(&self, problem: &ProblemInstance) -> bool {
        self.slots.len() == problem.requirements.len()
            && self
                .slots
                .iter()
                .zip(&problem.requirements)
                .all(|(slot, req)| slot.id == req.slot_id && slot.class_id == req.class_id)
    }

    /// Same placements as `other`, ignoring fitness.
    pub fn same_schedule(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

// ======================== Crossover operators ========================

/// Single-point crossover.
///
/// Picks a cut in `1..len` and joins the head of `p1` with the tail of
/// `p2`. Parents shorter than two genes are copied from `p1`.
pub fn single_point_crossover<R: Rng>(
    p1: &TimetableChromosome,
    p2: &TimetableChromosome,
    rng: &mut R,
) -> TimetableChromosome {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return TimetableChromosome::new(p1.slots.clone());
    }
    let point = rng.random_range(1..len);
    let mut slots = Vec::with_capacity(p1.len());
    slots.extend_from_slice(&p1.slots[..point]);
    slots.extend_from_slice(&p2.slots[point..]);
    TimetableChromosome::new(slots)
}

/// Uniform crossover: each gene comes from either parent with equal
/// probability.
pub fn uniform_crossover<R: Rng>(
    p1: &TimetableChromosome,
    p2: &TimetableChromosome,
    rng: &mut R,
) -> TimetableChromosome {
    if p1.len() != p2.len() {
        return TimetableChromosome::new(p1.slots.clone());
    }
    let slots = p1
        .slots
        .iter()
        .zip(&p2.slots)
        .map(|(a, b)| if rng.random_bool(0.5) { a.clone() } else { b.clone() })
        .collect();
    TimetableChromosome::new(slots)
}

// ======================== Mutation operators ========================

/// Re-places one random gene with the generator's feasibility rules.
pub fn reassign_mutation<R: Rng>(
    chromosome: &mut TimetableChromosome,
    generator: &ScheduleGenerator<'_>,
    rng: &mut R,
) {
    if chromosome.is_empty() {
        return;
    }
    let index = rng.random_range(0..chromosome.len());
    generator.reassign(&mut chromosome.slots, index, rng);
    chromosome.invalidate();
}

/// Swaps the periods of two random genes; resources stay in place.
pub fn swap_mutation<R: Rng>(chromosome: &mut TimetableChromosome, rng: &mut R) {
    let len = chromosome.len();
    if len < 2 {
        return;
    }
    let i = rng.random_range(0..len);
    let mut j = rng.random_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    let (day_i, start_i) = chromosome.slots[i].period();
    let (day_j, start_j) = chromosome.slots[j].period();
    chromosome.slots[i].day = day_j;
    chromosome.slots[i].start = start_j;
    chromosome.slots[j].day = day_i;
    chromosome.slots[j].start = start_i;
    chromosome.invalidate();
}
