//! Entity snapshot.
//!
//! The read-only input of one optimization run. An optimizer never
//! reaches into shared state: callers hand it a snapshot and receive new
//! data back.

use serde::{Deserialize, Serialize};

use super::{Class, Faculty, Room, Subject};

/// Entities with a stable string identifier.
pub trait Entity {
    /// Unique identifier.
    fn id(&self) -> &str;
}

impl Entity for Class {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Subject {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Faculty {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Room {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Classes, subjects, faculty and rooms as of one moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitySnapshot {
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub faculty: Vec<Faculty>,
    pub rooms: Vec<Room>,
}

impl EntitySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class.
    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Finds a subject by name.
    pub fn subject_by_name(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Whether the snapshot holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.subjects.is_empty()
            && self.faculty.is_empty()
            && self.rooms.is_empty()
    }
}

/// Inserts `item`, replacing any entity with the same id.
pub(crate) fn upsert<T: Entity>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

/// Removes the entity with `id`; returns whether one was removed.
pub(crate) fn remove<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
