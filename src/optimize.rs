//! Top-level optimization entry point.
//!
//! Wires the pipeline together: validate → build the problem instance →
//! run the GA → rank the final population → re-check conflicts on the
//! winners. Always yields at least one result, even for infeasible input.

use log::{info, warn};
use rand::Rng;

use crate::config::OptimizerConfig;
use crate::fitness::FitnessEvaluator;
use crate::ga::{CancellationToken, GeneticOptimizer, ScheduleGenerator};
use crate::models::EntitySnapshot;
use crate::params::OptimizationParameters;
use crate::problem::ProblemInstance;
use crate::ranking::{OptimizationResult, ResultRanker};
use crate::validation::{validate_entities, validate_parameters_for};

/// Extra generator draws allowed per missing distinct candidate.
const SUPPLEMENT_ATTEMPTS: usize = 8;

/// Runs complete optimizations under one configuration.
#[derive(Debug, Clone, Default)]
pub struct TimetableOptimizer {
    config: OptimizerConfig,
    cancellation: Option<CancellationToken>,
}

impl TimetableOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Attaches a cancellation token; a cancelled run still returns results.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimizes a timetable for `snapshot`.
    ///
    /// Parameter and entity problems are logged, not fatal: the run
    /// proceeds and the violations surface in fitness and conflicts.
    /// Results are sorted by descending score.
    pub fn optimize<R: Rng>(
        &self,
        snapshot: &EntitySnapshot,
        params: &OptimizationParameters,
        rng: &mut R,
    ) -> Vec<OptimizationResult> {
        let validation = validate_parameters_for(params, self.config.grid.working_days());
        for error in &validation.errors {
            warn!("Parameter check: {}", error);
        }
        if let Err(errors) = validate_entities(snapshot) {
            for error in errors {
                warn!("Entity check: {}", error.message);
            }
        }

        let problem = ProblemInstance::new(snapshot, params, &self.config.grid);
        let evaluator = FitnessEvaluator::with_weights(&self.config.weights);
        let mut optimizer = GeneticOptimizer::new(&problem, &evaluator, self.config.ga.clone());
        if let Some(token) = &self.cancellation {
            optimizer = optimizer.with_cancellation(token.clone());
        }

        let outcome = optimizer.run(rng);
        let mut candidates = outcome.population;

        let ranker = ResultRanker::new(self.config.top_n);
        let mut distinct = ResultRanker::distinct_count(&candidates);
        if distinct < ranker.top_n() {
            let generator = ScheduleGenerator::new(&problem);
            let mut attempts = (ranker.top_n() - distinct) * SUPPLEMENT_ATTEMPTS;
            while distinct < ranker.top_n() && attempts > 0 {
                candidates.extend(generator.seed_population(1, rng));
                distinct = ResultRanker::distinct_count(&candidates);
                attempts -= 1;
            }
        }

        let results = ranker.rank(&problem, &evaluator, &candidates);
        info!(
            "Optimization finished: {} results, best score {:.2}",
            results.len(),
            results.first().map_or(0.0, |r| r.score)
        );
        results
    }
}

/// Optimizes with the thread RNG.
pub fn optimize_timetable(
    snapshot: &EntitySnapshot,
    params: &OptimizationParameters,
    config: &OptimizerConfig,
) -> Vec<OptimizationResult> {
    let mut rng = rand::rng();
    TimetableOptimizer::new(config.clone()).optimize(snapshot, params, &mut rng)
}
