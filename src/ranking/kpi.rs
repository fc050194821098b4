//! Timetable quality metrics (KPIs).
//!
//! Computes the indicators reported alongside every ranked candidate.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Classroom utilization | Distinct occupied (room, day, start) ÷ (rooms × grid periods), capped at 100% |
//! | Faculty workload balance | `100 × (1 − cv)` of sessions per faculty member, clamped to [0, 100] |
//! | Conflict count | Records from [`detect_conflicts`](crate::conflicts::detect_conflicts) |
//!
//! `cv` is the coefficient of variation (population standard deviation ÷
//! mean) over every faculty member, idle ones included. An empty
//! timetable is perfectly balanced.

use std::collections::{HashMap, HashSet};

use crate::conflicts::count_conflicts;
use crate::models::TimetableSlot;
use crate::problem::ProblemInstance;

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Share of room-periods in use (0.0..=100.0).
    pub classroom_utilization_percent: f64,
    /// Evenness of teaching load (0.0..=100.0).
    pub faculty_workload_balance_percent: f64,
    /// Number of conflict records.
    pub conflict_count: usize,
    /// Sessions per faculty member (all known faculty).
    pub sessions_by_faculty: HashMap<String, usize>,
    /// Per-room share of grid periods in use (0.0..=1.0).
    pub utilization_by_room: HashMap<String, f64>,
}

impl TimetableKpi {
    /// Computes KPIs for a slot list over a problem's rooms, faculty and grid.
    pub fn calculate(problem: &ProblemInstance, slots: &[TimetableSlot]) -> Self {
        let periods = problem.grid.period_count();

        // Utilization
        let occupied: HashSet<(&str, _)> = slots
            .iter()
            .filter(|s| problem.room(&s.room_id).is_some())
            .map(|s| (s.room_id.as_str(), s.period()))
            .collect();
        let mut per_room: HashMap<&str, usize> = HashMap::new();
        for (room, _) in &occupied {
            *per_room.entry(*room).or_insert(0) += 1;
        }
        let utilization_by_room = problem
            .rooms
            .iter()
            .map(|r| {
                let used = per_room.get(r.id.as_str()).copied().unwrap_or(0);
                let share = if periods == 0 { 0.0 } else { used as f64 / periods as f64 };
                (r.id.clone(), share.min(1.0))
            })
            .collect();
        let room_periods = problem.rooms.len() * periods;
        let classroom_utilization_percent = if room_periods == 0 {
            0.0
        } else {
            (occupied.len() as f64 / room_periods as f64 * 100.0).min(100.0)
        };

        // Workload balance
        let mut sessions_by_faculty: HashMap<String, usize> =
            problem.faculty.iter().map(|f| (f.id.clone(), 0)).collect();
        for slot in slots {
            if let Some(n) = sessions_by_faculty.get_mut(&slot.faculty_id) {
                *n += 1;
            }
        }
        let loads: Vec<f64> = sessions_by_faculty.values().map(|&n| n as f64).collect();
        let faculty_workload_balance_percent = workload_balance(&loads);

        Self {
            classroom_utilization_percent,
            faculty_workload_balance_percent,
            conflict_count: count_conflicts(slots),
            sessions_by_faculty,
            utilization_by_room,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_conflicts: usize, min_utilization_percent: f64) -> bool {
        self.conflict_count <= max_conflicts
            && self.classroom_utilization_percent >= min_utilization_percent
    }
}

/// `clamp(100 × (1 − cv), 0, 100)`; 100 when nothing is scheduled.
pub fn workload_balance(loads: &[f64]) -> f64 {
    if loads.is_empty() {
        return 100.0;
    }
    let n = loads.len() as f64;
    let mean = loads.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 100.0;
    }
    let variance = loads.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;
    (100.0 * (1.0 - cv)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, Weekday};
    use crate::problem::tests::scenario_problem;

    fn slot(id: &str, day: Weekday, hour: u16, room: &str, faculty: &str) -> TimetableSlot {
        TimetableSlot::new(id, day, ClockTime::hours(hour), 60)
            .with_class(id)
            .with_room(room)
            .with_faculty(faculty)
    }

    #[test]
    fn test_workload_balance() {
        assert_eq!(workload_balance(&[]), 100.0);
        assert_eq!(workload_balance(&[0.0, 0.0]), 100.0);
        assert_eq!(workload_balance(&[4.0, 4.0, 4.0]), 100.0);
        // mean 2, std 2 → cv 1
        assert_eq!(workload_balance(&[4.0, 0.0]), 0.0);
        // mean 2, std 1 → cv 0.5
        assert!((workload_balance(&[3.0, 1.0]) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty_timetable() {
        let problem = scenario_problem();
        let kpi = TimetableKpi::calculate(&problem, &[]);
        assert_eq!(kpi.classroom_utilization_percent, 0.0);
        assert_eq!(kpi.faculty_workload_balance_percent, 100.0);
        assert_eq!(kpi.conflict_count, 0);
        assert_eq!(kpi.sessions_by_faculty.len(), 3);
    }

    #[test]
    fn test_kpi_basic() {
        let problem = scenario_problem();
        // 4 rooms × 40 periods = 160 room-periods.
        let slots = vec![
            slot("a", Weekday::Monday, 9, "R1", "F1"),
            slot("b", Weekday::Monday, 10, "R1", "F2"),
            slot("c", Weekday::Tuesday, 9, "R2", "F3"),
            slot("d", Weekday::Tuesday, 9, "R2", "F1"),
        ];
        let kpi = TimetableKpi::calculate(&problem, &slots);
        // (R1,Mon9) (R1,Mon10) (R2,Tue9) → 3 distinct
        assert!((kpi.classroom_utilization_percent - 3.0 / 160.0 * 100.0).abs() < 1e-10);
        assert_eq!(kpi.conflict_count, 1);
        assert_eq!(kpi.sessions_by_faculty["F1"], 2);
        assert!(kpi.faculty_workload_balance_percent < 100.0);
        assert!((kpi.utilization_by_room["R1"] - 2.0 / 40.0).abs() < 1e-10);
        assert_eq!(kpi.utilization_by_room["R4"], 0.0);
        assert!(kpi.meets_thresholds(1, 1.0));
        assert!(!kpi.meets_thresholds(0, 1.0));
    }

    #[test]
    fn test_unknown_room_not_counted() {
        let problem = scenario_problem();
        let slots = vec![slot("a", Weekday::Monday, 9, "R99", "F1")];
        let kpi = TimetableKpi::calculate(&problem, &slots);
        assert_eq!(kpi.classroom_utilization_percent, 0.0);
    }
}
