use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ClockTime, Weekday};

/// A collision between slots sharing one resource at the same (day, time).
///
/// Derived from a timetable on demand; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Day of the collision.
    pub day: Weekday,
    /// Start time shared by the colliding slots.
    pub time: ClockTime,
    /// Which resource dimension collides.
    pub resource_kind: ResourceKind,
    /// The shared resources (room, faculty or class ids), sorted.
    pub resource_ids: Vec<String>,
    /// Ids of the colliding slots, sorted.
    pub colliding_slot_ids: Vec<String>,
}

/// Resource dimension of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Room,
    Faculty,
    Batch,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Room => "room",
            ResourceKind::Faculty => "faculty",
            ResourceKind::Batch => "batch",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {} clash on {}: slots {}",
            self.day,
            self.time,
            self.resource_kind,
            self.resource_ids.join(", "),
            self.colliding_slot_ids.join(", ")
        )
    }
}
