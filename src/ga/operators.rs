//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{GeneticOperators, CrossoverType, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::SinglePoint);
//! assert_eq!(ops.mutation_type, MutationType::Reassign);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    TimetableChromosome, reassign_mutation, single_point_crossover, swap_mutation,
    uniform_crossover,
};
use super::generator::ScheduleGenerator;

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossoverType {
    /// One cut; head from the first parent, tail from the second.
    #[default]
    SinglePoint,
    /// Gene-wise coin flip between the parents.
    Uniform,
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationType {
    /// Re-place one slot with the generator's feasibility rules.
    #[default]
    Reassign,
    /// Exchange the periods of two slots.
    Swap,
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{GeneticOperators, CrossoverType, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::Uniform,
///     mutation_type: MutationType::Swap,
/// };
/// assert_eq!(ops.crossover_type, CrossoverType::Uniform);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneticOperators {
    pub crossover_type: CrossoverType,
    pub mutation_type: MutationType,
}

impl GeneticOperators {
    /// Creates a child from two parents.
    pub fn crossover<R: Rng>(
        &self,
        p1: &TimetableChromosome,
        p2: &TimetableChromosome,
        rng: &mut R,
    ) -> TimetableChromosome {
        match self.crossover_type {
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
            CrossoverType::Uniform => uniform_crossover(p1, p2, rng),
        }
    }

    /// Mutates a chromosome in place.
    pub fn mutate<R: Rng>(
        &self,
        chromosome: &mut TimetableChromosome,
        generator: &ScheduleGenerator<'_>,
        rng: &mut R,
    ) {
        match self.mutation_type {
            MutationType::Reassign => reassign_mutation(chromosome, generator, rng),
            MutationType::Swap => swap_mutation(chromosome, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::scenario_problem;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_all_combinations_keep_layout() {
        let problem = scenario_problem();
        let generator = ScheduleGenerator::new(&problem);
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = TimetableChromosome::new(generator.generate(&mut rng));
        let p2 = TimetableChromosome::new(generator.generate(&mut rng));

        for crossover_type in [CrossoverType::SinglePoint, CrossoverType::Uniform] {
            for mutation_type in [MutationType::Reassign, MutationType::Swap] {
                let ops = GeneticOperators {
                    crossover_type,
                    mutation_type,
                };
                let mut child = ops.crossover(&p1, &p2, &mut rng);
                ops.mutate(&mut child, &generator, &mut rng);
                assert!(child.is_valid(&problem), "{crossover_type:?}/{mutation_type:?}");
            }
        }
    }

    #[test]
    fn test_operators_serde() {
        let ops: GeneticOperators = serde_json::from_str(r#"{"crossoverType":"uniform"}"#).unwrap();
        assert_eq!(ops.crossover_type, CrossoverType::Uniform);
        assert_eq!(ops.mutation_type, MutationType::Reassign);
    }
}
