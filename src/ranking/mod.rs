//! Result ranking and timetable quality metrics.
//!
//! # Modules
//!
//! - **`kpi`**: Classroom utilization, faculty workload balance, conflict count
//! - **`ranker`**: Top-N distinct selection, strategy labels, composite score

pub mod kpi;
pub mod ranker;

pub use kpi::{TimetableKpi, workload_balance};
pub use ranker::{
    OptimizationResult, ResultRanker, ResultStatus, STRATEGY_LABELS, composite_score,
};
