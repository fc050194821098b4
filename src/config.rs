//! Optimizer configuration.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! topN = 3
//!
//! [ga]
//! populationSize = 80
//! maxGenerations = 200
//!
//! [weights]
//! room = 12.0
//!
//! [grid]
//! periodsPerDay = 6
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintWeights;
use crate::error::ConfigError;
use crate::ga::GaConfig;
use crate::models::WeekGrid;

/// Everything one optimization run needs besides its input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerConfig {
    pub ga: GaConfig,
    pub weights: ConstraintWeights,
    pub grid: WeekGrid,
    /// Number of ranked alternatives returned.
    pub top_n: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            weights: ConstraintWeights::default(),
            grid: WeekGrid::default(),
            top_n: 4,
        }
    }
}

impl OptimizerConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OptimizerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_weights(mut self, weights: ConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_grid(mut self, grid: WeekGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Rejects values the optimizer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.ga.population_size == 0 {
            return invalid("ga.populationSize", "must be at least 1");
        }
        if self.ga.tournament_size == 0 {
            return invalid("ga.tournamentSize", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.ga.mutation_rate) {
            return invalid("ga.mutationRate", "must be within [0, 1]");
        }
        if self.ga.convergence_threshold.is_nan() {
            return invalid("ga.convergenceThreshold", "must be a number");
        }
        let weights = [
            ("weights.room", self.weights.room),
            ("weights.faculty", self.weights.faculty),
            ("weights.batch", self.weights.batch),
            ("weights.subjectFrequency", self.weights.subject_frequency),
            ("weights.timeSlotLoad", self.weights.time_slot_load),
        ];
        for (field, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return invalid(field, "must be a non-negative number");
            }
        }
        if self.grid.days.is_empty() || self.grid.periods_per_day == 0 {
            return invalid("grid", "must contain at least one period");
        }
        if self.grid.period_minutes == 0 {
            return invalid("grid.periodMinutes", "must be positive");
        }
        if self.top_n == 0 {
            return invalid("topN", "must be at least 1");
        }
        Ok(())
    }
}
