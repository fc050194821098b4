//! Conflict detection.
//!
//! Re-validates a finished timetable. Slots are bucketed by exact
//! `(day, start)`; inside a bucket, any room, faculty member or class used
//! by two or more slots is a clash. Each `(day, start, kind)` with at least
//! one clash yields one [`Conflict`] listing every shared resource and every
//! slot involved.
//!
//! Output is sorted by `(day, time, kind)` and every id list is sorted, so
//! the result does not depend on slot order.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ClockTime, Conflict, ResourceKind, TimetableSlot, Weekday};

/// Detects room, faculty and batch clashes.
pub fn detect_conflicts(slots: &[TimetableSlot]) -> Vec<Conflict> {
    let mut by_period: BTreeMap<(Weekday, ClockTime), Vec<&TimetableSlot>> = BTreeMap::new();
    for slot in slots {
        by_period.entry(slot.period()).or_default().push(slot);
    }

    let mut conflicts = Vec::new();
    for ((day, time), group) in by_period {
        if group.len() < 2 {
            continue;
        }
        for kind in [ResourceKind::Room, ResourceKind::Faculty, ResourceKind::Batch] {
            if let Some(conflict) = clash(day, time, kind, &group) {
                conflicts.push(conflict);
            }
        }
    }
    conflicts
}

/// Number of conflict records in a slot list.
pub fn count_conflicts(slots: &[TimetableSlot]) -> usize {
    detect_conflicts(slots).len()
}

fn resource_of(slot: &TimetableSlot, kind: ResourceKind) -> &str {
    match kind {
        ResourceKind::Room => &slot.room_id,
        ResourceKind::Faculty => &slot.faculty_id,
        ResourceKind::Batch => &slot.class_id,
    }
}

fn clash(day: Weekday, time: ClockTime, kind: ResourceKind, group: &[&TimetableSlot]) -> Option<Conflict> {
    let mut users: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for slot in group {
        let resource = resource_of(slot, kind);
        // Unassigned resources cannot collide.
        if !resource.is_empty() {
            users.entry(resource).or_default().push(&slot.id);
        }
    }

    let mut resource_ids = Vec::new();
    let mut slot_ids = BTreeSet::new();
    for (resource, ids) in users {
        if ids.len() >= 2 {
            resource_ids.push(resource.to_string());
            slot_ids.extend(ids);
        }
    }
    if resource_ids.is_empty() {
        return None;
    }

    Some(Conflict {
        day,
        time,
        resource_kind: kind,
        resource_ids,
        colliding_slot_ids: slot_ids.into_iter().map(String::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, day: Weekday, hour: u16, room: &str, faculty: &str, class: &str) -> TimetableSlot {
        TimetableSlot::new(id, day, ClockTime::hours(hour), 60)
            .with_subject("S1")
            .with_room(room)
            .with_faculty(faculty)
            .with_class(class)
    }

    #[test]
    fn test_no_overlap_no_conflicts() {
        let slots = vec![
            slot("a", Weekday::Monday, 9, "R1", "F1", "C1"),
            slot("b", Weekday::Monday, 10, "R1", "F1", "C1"),
            slot("c", Weekday::Tuesday, 9, "R1", "F1", "C1"),
            slot("d", Weekday::Monday, 9, "R2", "F2", "C2"),
        ];
        assert!(detect_conflicts(&slots).is_empty());
        assert!(detect_conflicts(&[]).is_empty());
    }

    #[test]
    fn test_single_room_conflict() {
        let slots = vec![
            slot("s1", Weekday::Monday, 9, "R1", "F1", "C1"),
            slot("s2", Weekday::Monday, 9, "R1", "F2", "C2"),
        ];
        let conflicts = detect_conflicts(&slots);
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.resource_kind, ResourceKind::Room);
        assert_eq!(c.resource_ids, vec!["R1"]);
        assert_eq!(c.colliding_slot_ids, vec!["s1", "s2"]);
        assert_eq!(c.day, Weekday::Monday);
        assert_eq!(c.time, ClockTime::hours(9));
    }

    #[test]
    fn test_all_kinds_in_one_period() {
        let slots = vec![
            slot("a", Weekday::Friday, 11, "R1", "F1", "C1"),
            slot("b", Weekday::Friday, 11, "R1", "F1", "C1"),
        ];
        let kinds: Vec<_> = detect_conflicts(&slots).iter().map(|c| c.resource_kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Room, ResourceKind::Faculty, ResourceKind::Batch]);
    }

    #[test]
    fn test_one_record_per_kind_lists_all_resources() {
        let slots = vec![
            slot("a", Weekday::Monday, 9, "R1", "F1", "C1"),
            slot("b", Weekday::Monday, 9, "R1", "F2", "C2"),
            slot("c", Weekday::Monday, 9, "R2", "F3", "C3"),
            slot("d", Weekday::Monday, 9, "R2", "F4", "C4"),
        ];
        let conflicts = detect_conflicts(&slots);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].resource_ids, vec!["R1", "R2"]);
        assert_eq!(conflicts[0].colliding_slot_ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_deterministic_and_order_independent() {
        let mut slots = vec![
            slot("a", Weekday::Wednesday, 9, "R1", "F1", "C1"),
            slot("b", Weekday::Monday, 9, "R1", "F1", "C2"),
            slot("c", Weekday::Wednesday, 9, "R1", "F2", "C3"),
            slot("d", Weekday::Monday, 9, "R2", "F1", "C3"),
            slot("e", Weekday::Monday, 13, "R3", "F3", "C3"),
        ];
        let first = detect_conflicts(&slots);
        assert_eq!(first, detect_conflicts(&slots));

        slots.reverse();
        assert_eq!(first, detect_conflicts(&slots));
        slots.swap(0, 3);
        assert_eq!(first, detect_conflicts(&slots));

        // Monday faculty clash precedes Wednesday room clash.
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].day, Weekday::Monday);
        assert_eq!(first[0].resource_kind, ResourceKind::Faculty);
        assert_eq!(first[1].day, Weekday::Wednesday);
        assert_eq!(first[1].resource_kind, ResourceKind::Room);
    }

    #[test]
    fn test_unassigned_resources_ignored() {
        let slots = vec![
            slot("a", Weekday::Monday, 9, "", "F1", "C1"),
            slot("b", Weekday::Monday, 9, "", "F2", "C2"),
        ];
        assert!(detect_conflicts(&slots).is_empty());
        assert_eq!(count_conflicts(&slots), 0);
    }
}
