//! Academic timetable optimizer.
//!
//! Builds weekly timetables for classes, subjects, faculty and rooms. Hard
//! constraints (no double-booked room, faculty member or class) and soft
//! limits (per-subject frequency, daily load, faculty capacity) are scored
//! by a weighted penalty; a genetic algorithm searches for low-penalty
//! schedules and the best distinct ones are returned as ranked
//! alternatives.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Class`, `Subject`, `Faculty`, `Room`,
//!   `TimetableSlot`, `Timetable`, `Conflict`, `WeekGrid`, `EntitySnapshot`
//! - **`params`** / **`validation`**: Capacity feasibility checks and
//!   entity integrity checks (duplicate IDs, dangling references)
//! - **`problem`**: Indexed problem instance and session requirements
//! - **`constraints`** / **`fitness`**: Weighted violation counting
//! - **`ga`**: Schedule generator, genetic operators, optimizer loop
//! - **`conflicts`**: Room / faculty / batch clash detection
//! - **`ranking`**: KPIs and top-N result ranking
//! - **`optimize`**: End-to-end entry point
//! - **`state`**: Shared entities and atomic timetable commits
//! - **`persistence`**: JSON export/import and timetable stores
//! - **`config`**: TOML-loadable optimizer configuration
//!
//! # Example
//!
//! ```
//! use u_timetable::config::OptimizerConfig;
//! use u_timetable::models::{Class, EntitySnapshot, Faculty, Room, Subject};
//! use u_timetable::optimize::optimize_timetable;
//! use u_timetable::params::OptimizationParameters;
//!
//! let snapshot = EntitySnapshot::new()
//!     .with_subject(Subject::new("S1", "Mathematics"))
//!     .with_class(Class::new("C1", "Batch 1").with_students(30).with_subject("Mathematics"))
//!     .with_faculty(Faculty::new("F1", "Dr. Rao").with_subject("Mathematics"))
//!     .with_room(Room::new("R1", 40));
//! let params = OptimizationParameters::from_snapshot(&snapshot);
//!
//! let results = optimize_timetable(&snapshot, &params, &OptimizerConfig::default());
//! assert!(!results.is_empty());
//! assert_eq!(results[0].conflict_count, 0);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod config;
pub mod conflicts;
pub mod constraints;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod models;
pub mod optimize;
pub mod params;
pub mod persistence;
pub mod problem;
pub mod ranking;
pub mod state;
pub mod validation;

pub use config::OptimizerConfig;
pub use optimize::{TimetableOptimizer, optimize_timetable};
