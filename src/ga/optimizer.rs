//! Generational GA loop.
//!
//! ```text
//! Seeded → Evaluating → Selecting → Recombining → Mutating → Replaced
//!              ↑                                                │
//!              └────────────────────────────────────────────────┘
//! Evaluating → Converged | Terminated
//! ```
//!
//! Each generation keeps `⌊N/2⌋` tournament winners as parents and fills
//! the rest of the population with their children. The loop stops at the
//! generation cap, when the best/average fitness gap falls below the
//! convergence threshold, or when the cancellation token fires.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::TimetableChromosome;
use super::generator::ScheduleGenerator;
use super::operators::GeneticOperators;
use crate::fitness::FitnessEvaluator;
use crate::problem::ProblemInstance;

/// GA hyper-parameters.
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default().with_population_size(20).with_mutation_rate(0.2);
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.max_generations, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaConfig {
    /// Population size N.
    pub population_size: usize,
    /// Generation cap.
    pub max_generations: usize,
    /// Contestants per tournament (sampled with replacement).
    pub tournament_size: usize,
    /// Per-child mutation probability.
    pub mutation_rate: f64,
    /// Stop once best − average falls below this.
    pub convergence_threshold: f64,
    /// Evaluate fitness on the rayon pool.
    pub parallel: bool,
    /// Crossover and mutation strategies.
    pub operators: GeneticOperators,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            tournament_size: 5,
            mutation_rate: 0.1,
            convergence_threshold: 1.0,
            parallel: true,
            operators: GeneticOperators::default(),
        }
    }
}

impl GaConfig {
    /// Sets the number of chromosomes per generation.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation limit.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets how many chromosomes compete in each tournament.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the per-child mutation probability (0.0 to 1.0).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the best/average fitness gap below which the run stops.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the crossover and mutation operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }
}

/// Phase of the GA loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    Seeded,
    Evaluating,
    Selecting,
    Recombining,
    Mutating,
    Replaced,
    Converged,
    Terminated,
}

impl fmt::Display for OptimizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Cooperative cancellation flag shared between a caller and a running GA.
///
/// ```
/// use u_timetable::ga::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!handle.is_cancelled());
/// token.cancel();
/// assert!(handle.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the run to stop at the next generation boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub worst: f64,
}

impl GenerationStats {
    fn of(generation: usize, population: &[TimetableChromosome]) -> Self {
        if population.is_empty() {
            return Self {
                generation,
                best: 0.0,
                average: 0.0,
                worst: 0.0,
            };
        }
        let (best, worst, sum) = population.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY, 0.0),
            |(b, w, s), c| (b.max(c.fitness), w.min(c.fitness), s + c.fitness),
        );
        Self {
            generation,
            best,
            average: sum / population.len() as f64,
            worst,
        }
    }

    /// Best − average.
    pub fn spread(&self) -> f64 {
        self.best - self.average
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Final population, evaluated and sorted by descending fitness.
    pub population: Vec<TimetableChromosome>,
    /// Generations completed.
    pub generations: usize,
    pub converged: bool,
    pub cancelled: bool,
    pub best_fitness: f64,
    /// Per-generation statistics.
    pub history: Vec<GenerationStats>,
}

impl GaOutcome {
    /// The fittest candidate.
    pub fn best(&self) -> Option<&TimetableChromosome> {
        self.population.first()
    }
}

/// Genetic optimizer over one problem instance.
pub struct GeneticOptimizer<'a> {
    problem: &'a ProblemInstance,
    evaluator: &'a FitnessEvaluator,
    config: GaConfig,
    cancellation: Option<CancellationToken>,
}

impl<'a> GeneticOptimizer<'a> {
    pub fn new(problem: &'a ProblemInstance, evaluator: &'a FitnessEvaluator, config: GaConfig) -> Self {
        Self {
            problem,
            evaluator,
            config,
            cancellation: None,
        }
    }

    /// Attaches a cancellation token checked between generations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA to termination.
    pub fn run<R: Rng>(&self, rng: &mut R) -> GaOutcome {
        let size = self.config.population_size.max(1);
        let generator = ScheduleGenerator::new(self.problem);
        info!(
            "GA start: {} sessions, population {}, max {} generations",
            self.problem.session_count(),
            size,
            self.config.max_generations
        );

        let mut population = generator.seed_population(size, rng);
        self.transition(OptimizerState::Seeded);

        let mut history = Vec::new();
        let mut generations = 0;
        let mut converged = false;
        let mut cancelled = false;

        while generations < self.config.max_generations {
            self.transition(OptimizerState::Evaluating);
            self.evaluate(&mut population);
            let stats = GenerationStats::of(generations, &population);
            debug!(
                "Generation {}: best {:.2}, avg {:.2}, worst {:.2}",
                stats.generation, stats.best, stats.average, stats.worst
            );
            history.push(stats);

            if stats.spread() < self.config.convergence_threshold {
                converged = true;
                self.transition(OptimizerState::Converged);
                break;
            }
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            self.transition(OptimizerState::Selecting);
            let parent_count = (size / 2).max(1);
            let parents: Vec<TimetableChromosome> = (0..parent_count)
                .map(|_| population[self.tournament(&population, rng)].clone())
                .collect();

            self.transition(OptimizerState::Recombining);
            let child_count = size.saturating_sub(parent_count);
            let mut offspring: Vec<TimetableChromosome> = (0..child_count)
                .map(|i| {
                    let a = &parents[i % parent_count];
                    let b = &parents[(i + 1) % parent_count];
                    self.config.operators.crossover(a, b, rng)
                })
                .collect();

            self.transition(OptimizerState::Mutating);
            for child in &mut offspring {
                if rng.random::<f64>() < self.config.mutation_rate {
                    self.config.operators.mutate(child, &generator, rng);
                }
            }

            population = parents;
            population.extend(offspring);
            generations += 1;
            self.transition(OptimizerState::Replaced);
        }

        self.evaluate(&mut population);
        population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let best_fitness = population.first().map_or(0.0, |c| c.fitness);
        self.transition(OptimizerState::Terminated);
        info!(
            "GA done: {} generations, best fitness {:.2}{}{}",
            generations,
            best_fitness,
            if converged { ", converged" } else { "" },
            if cancelled { ", cancelled" } else { "" }
        );

        GaOutcome {
            population,
            generations,
            converged,
            cancelled,
            best_fitness,
            history,
        }
    }

    /// Scores every unevaluated chromosome.
    fn evaluate(&self, population: &mut [TimetableChromosome]) {
        let score = |c: &mut TimetableChromosome| {
            if !c.is_evaluated() {
                c.fitness = self.evaluator.evaluate(self.problem, &c.slots);
            }
        };
        if self.config.parallel {
            population.par_iter_mut().for_each(score);
        } else {
            population.iter_mut().for_each(score);
        }
    }

    /// Index of a tournament winner.
    fn tournament<R: Rng>(&self, population: &[TimetableChromosome], rng: &mut R) -> usize {
        let mut best = rng.random_range(0..population.len());
        for _ in 1..self.config.tournament_size {
            let contender = rng.random_range(0..population.len());
            if population[contender].fitness > population[best].fitness {
                best = contender;
            }
        }
        best
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(|t| t.is_cancelled())
    }

    fn transition(&self, state: OptimizerState) {
        trace!("GA state -> {}", state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, Class, EntitySnapshot, Faculty, Room, Subject, WeekGrid, Weekday};
    use crate::params::OptimizationParameters;
    use crate::problem::tests::scenario_problem;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// 10 sessions for 8 room-periods, so some collision always remains.
    fn tight_problem() -> ProblemInstance {
        let mut snap = EntitySnapshot::new()
            .with_subject(Subject::new("S1", "Art").with_credits(2).with_limits(2, 2))
            .with_faculty(Faculty::new("F1", "A").with_subject("Art"))
            .with_faculty(Faculty::new("F2", "B").with_subject("Art"))
            .with_room(Room::new("R1", 100))
            .with_room(Room::new("R2", 100));
        for c in 1..=5 {
            snap = snap.with_class(Class::new(format!("C{c}"), "x").with_subject("Art"));
        }
        let grid = WeekGrid::new(vec![Weekday::Monday, Weekday::Tuesday], ClockTime::hours(9), 60, 2);
        let params = OptimizationParameters::from_snapshot(&snap).with_subject_limits(2, 2);
        ProblemInstance::new(&snap, &params, &grid)
    }

    #[test]
    fn test_single_generation() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(1)
            .with_convergence_threshold(0.0);
        let optimizer = GeneticOptimizer::new(&problem, &evaluator, config);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = optimizer.run(&mut rng);
        assert!(outcome.population.len() >= 10);
        assert!(outcome.generations <= 1);
        for c in &outcome.population {
            assert!(c.is_evaluated());
            assert!((0.0..=100.0).contains(&c.fitness));
            assert!(c.is_valid(&problem));
        }
    }

    #[test]
    fn test_population_sorted_and_size_preserved() {
        let problem = tight_problem();
        let evaluator = FitnessEvaluator::default();
        let config = GaConfig::default()
            .with_population_size(12)
            .with_max_generations(5)
            .with_convergence_threshold(-1.0)
            .with_mutation_rate(0.5);
        let optimizer = GeneticOptimizer::new(&problem, &evaluator, config);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = optimizer.run(&mut rng);
        assert_eq!(outcome.generations, 5);
        assert_eq!(outcome.history.len(), 5);
        assert!(!outcome.converged);
        assert_eq!(outcome.population.len(), 12);
        for w in outcome.population.windows(2) {
            assert!(w[0].fitness >= w[1].fitness);
        }
        assert_eq!(outcome.best().map(|c| c.fitness), Some(outcome.best_fitness));
    }

    #[test]
    fn test_final_best_beats_initial_average() {
        let problem = tight_problem();
        let evaluator = FitnessEvaluator::default();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_convergence_threshold(-1.0);
        let optimizer = GeneticOptimizer::new(&problem, &evaluator, config);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = optimizer.run(&mut rng);
        let first = outcome.history[0];
        assert!(outcome.best_fitness >= first.average);
    }

    #[test]
    fn test_converges_on_easy_problem() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let config = GaConfig::default().with_population_size(8);
        let optimizer = GeneticOptimizer::new(&problem, &evaluator, config);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = optimizer.run(&mut rng);
        assert!(outcome.converged);
        assert!(outcome.generations < 100);
    }

    #[test]
    fn test_cancelled_before_start() {
        let problem = tight_problem();
        let evaluator = FitnessEvaluator::default();
        let token = CancellationToken::new();
        token.cancel();
        let config = GaConfig::default()
            .with_population_size(6)
            .with_convergence_threshold(-1.0);
        let optimizer = GeneticOptimizer::new(&problem, &evaluator, config).with_cancellation(token);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = optimizer.run(&mut rng);
        assert!(outcome.cancelled);
        assert_eq!(outcome.generations, 0);
        assert_eq!(outcome.population.len(), 6);
        assert!(outcome.population.iter().all(|c| c.is_evaluated()));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let problem = tight_problem();
        let evaluator = FitnessEvaluator::default();
        let run = |parallel: bool| {
            let config = GaConfig::default()
                .with_population_size(10)
                .with_max_generations(3)
                .with_convergence_threshold(-1.0)
                .with_parallel(parallel);
            let mut rng = SmallRng::seed_from_u64(7);
            GeneticOptimizer::new(&problem, &evaluator, config).run(&mut rng)
        };
        let a = run(true);
        let b = run(false);
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_zero_generations() {
        let problem = scenario_problem();
        let evaluator = FitnessEvaluator::default();
        let config = GaConfig::default().with_population_size(4).with_max_generations(0);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = GeneticOptimizer::new(&problem, &evaluator, config).run(&mut rng);
        assert_eq!(outcome.generations, 0);
        assert!(outcome.history.is_empty());
        assert_eq!(outcome.population.len(), 4);
    }
}
