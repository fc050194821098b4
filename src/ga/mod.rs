//! GA-based timetable optimization.
//!
//! A generational genetic algorithm over complete timetables. Candidates
//! are seeded by a feasibility-aware generator, scored by the
//! [`FitnessEvaluator`](crate::fitness::FitnessEvaluator), and evolved by
//! tournament selection, crossover and mutation.
//!
//! # Encoding
//!
//! - **Gene**: one `TimetableSlot` (period, faculty, room) per session
//!   requirement, in requirement order. Gene `i` of every chromosome
//!   encodes the same class/subject session.
//!
//! # Submodules
//!
//! - [`generator`]: Random feasible construction and single-slot reassignment
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//! - [`optimizer`]: The GA loop, its configuration and cancellation
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

mod chromosome;
pub mod generator;
pub mod operators;
pub mod optimizer;

pub use chromosome::{
    TimetableChromosome, reassign_mutation, single_point_crossover, swap_mutation,
    uniform_crossover,
};
pub use generator::ScheduleGenerator;
pub use optimizer::{
    CancellationToken, GaConfig, GaOutcome, GenerationStats, GeneticOptimizer, OptimizerState,
};
