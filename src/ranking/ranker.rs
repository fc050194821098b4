//! Result ranking.
//!
//! Turns the final GA population into the handful of alternatives offered
//! to a caller: the best `top_n` distinct schedules by fitness, each
//! labelled with a strategy name and scored on a composite of fitness,
//! classroom utilization and workload balance.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::kpi::TimetableKpi;
use crate::fitness::{FitnessEvaluator, MAX_FITNESS};
use crate::ga::TimetableChromosome;
use crate::models::{Timetable, TimetableSlot};
use crate::problem::ProblemInstance;

/// Labels given to ranked alternatives, in fitness order.
pub const STRATEGY_LABELS: [&str; 4] = [
    "Balanced Optimization",
    "Resource Efficient",
    "Faculty Friendly",
    "Conflict Minimized",
];

/// Composite score weights: fitness, utilization, balance.
const SCORE_WEIGHTS: (f64, f64, f64) = (0.7, 0.15, 0.15);

/// Overall quality class of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultStatus {
    /// No violations of any kind.
    Optimal,
    /// No resource clashes; soft limits may be exceeded.
    Feasible,
    HasConflicts,
}

impl ResultStatus {
    fn classify(fitness: f64, conflict_count: usize) -> Self {
        match conflict_count {
            0 if fitness >= MAX_FITNESS => Self::Optimal,
            0 => Self::Feasible,
            _ => Self::HasConflicts,
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::HasConflicts => "has conflicts",
        };
        f.write_str(name)
    }
}

/// One ranked alternative timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub id: String,
    pub title: String,
    pub strategy: String,
    pub classroom_utilization_percent: f64,
    pub faculty_workload_balance_percent: f64,
    pub conflict_count: usize,
    /// Raw fitness in [0, 100].
    pub fitness: f64,
    /// Composite score in [0, 100].
    pub score: f64,
    pub status: ResultStatus,
    /// The schedule, in requirement order.
    pub schedule_data: Vec<TimetableSlot>,
}

impl OptimizationResult {
    /// Whether the schedule has no resource clashes.
    pub fn is_conflict_free(&self) -> bool {
        self.conflict_count == 0
    }

    /// Converts the result into a timetable carrying its slots.
    pub fn into_timetable(self) -> Timetable {
        Timetable::new(self.id, self.title)
            .with_description(format!(
                "{} (score {:.1}, {})",
                self.strategy, self.score, self.status
            ))
            .with_slots(self.schedule_data)
    }
}

/// `0.7·fitness + 0.15·utilization + 0.15·balance`, clamped to [0, 100].
pub fn composite_score(fitness: f64, utilization_percent: f64, balance_percent: f64) -> f64 {
    let (wf, wu, wb) = SCORE_WEIGHTS;
    (wf * fitness + wu * utilization_percent + wb * balance_percent).clamp(0.0, 100.0)
}

/// Picks and scores the top distinct candidates.
#[derive(Debug, Clone)]
pub struct ResultRanker {
    top_n: usize,
}

impl Default for ResultRanker {
    fn default() -> Self {
        Self { top_n: 4 }
    }
}

impl ResultRanker {
    /// Creates a ranker keeping at most `top_n` results (at least 1).
    pub fn new(top_n: usize) -> Self {
        Self { top_n: top_n.max(1) }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Number of distinct schedules among `candidates`.
    pub fn distinct_count(candidates: &[TimetableChromosome]) -> usize {
        candidates
            .iter()
            .map(|c| &c.slots)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Ranks candidates into at most `top_n` results, sorted by descending
    /// score. Unevaluated candidates are scored first.
    ///
    /// Selection is by fitness (ties keep input order); duplicates of an
    /// already selected schedule are skipped. Strategy labels follow the
    /// fitness order; ids and titles are numbered by final position.
    pub fn rank(
        &self,
        problem: &ProblemInstance,
        evaluator: &FitnessEvaluator,
        candidates: &[TimetableChromosome],
    ) -> Vec<OptimizationResult> {
        let fitness: Vec<f64> = candidates
            .iter()
            .map(|c| {
                if c.is_evaluated() {
                    c.fitness
                } else {
                    evaluator.evaluate(problem, &c.slots)
                }
            })
            .collect();

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let mut seen: HashSet<&Vec<TimetableSlot>> = HashSet::new();
        let chosen: Vec<usize> = order
            .into_iter()
            .filter(|&i| seen.insert(&candidates[i].slots))
            .take(self.top_n)
            .collect();

        let mut results: Vec<OptimizationResult> = chosen
            .into_iter()
            .enumerate()
            .map(|(rank, i)| {
                let strategy = STRATEGY_LABELS[rank % STRATEGY_LABELS.len()];
                let kpi = TimetableKpi::calculate(problem, &candidates[i].slots);
                let score = composite_score(
                    fitness[i],
                    kpi.classroom_utilization_percent,
                    kpi.faculty_workload_balance_percent,
                );
                OptimizationResult {
                    id: String::new(),
                    title: String::new(),
                    strategy: strategy.to_string(),
                    classroom_utilization_percent: kpi.classroom_utilization_percent,
                    faculty_workload_balance_percent: kpi.faculty_workload_balance_percent,
                    conflict_count: kpi.conflict_count,
                    fitness: fitness[i],
                    score,
                    status: ResultStatus::classify(fitness[i], kpi.conflict_count),
                    schedule_data: candidates[i].slots.clone(),
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (position, result) in results.iter_mut().enumerate() {
            result.id = format!("result-{}", position + 1);
            result.title = format!("Option {}: {}", position + 1, result.strategy);
        }
        results
    }
}
