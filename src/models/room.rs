//! Room model.
//!
//! Rooms are the physical spaces sessions take place in. Each room has a
//! seating capacity and a type that determines which sessions it suits.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::SubjectType;

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name (e.g., "B-204").
    pub name: String,
    /// Number of seats.
    pub capacity: u32,
    /// Room classification.
    pub room_type: RoomType,
    /// Domain-specific metadata (building, floor, equipment).
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomType {
    /// General lecture room.
    #[default]
    LectureHall,
    /// Laboratory with equipment.
    Laboratory,
    /// Small room for tutorials.
    TutorialRoom,
}

impl Room {
    /// Creates a lecture hall.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            room_type: RoomType::LectureHall,
            attributes: HashMap::new(),
        }
    }

    /// Creates a laboratory.
    pub fn laboratory(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, capacity).with_type(RoomType::Laboratory)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the room type.
    pub fn with_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the room seats at least `students`.
    #[inline]
    pub fn fits(&self, students: u32) -> bool {
        self.capacity >= students
    }

    /// Whether the room type suits a session type.
    ///
    /// Labs need a laboratory; lectures and tutorials use any other room.
    pub fn suits(&self, session: SubjectType) -> bool {
        match session {
            SubjectType::Lab => self.room_type == RoomType::Laboratory,
            SubjectType::Lecture | SubjectType::Tutorial => self.room_type != RoomType::Laboratory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R1", 60)
            .with_name("Main Hall")
            .with_attribute("building", "A");
        assert_eq!(r.id, "R1");
        assert_eq!(r.name, "Main Hall");
        assert_eq!(r.room_type, RoomType::LectureHall);
        assert!(r.fits(60));
        assert!(!r.fits(61));
        assert_eq!(r.attributes["building"], "A");
    }

    #[test]
    fn test_room_suits_session_type() {
        let hall = Room::new("R1", 40);
        let lab = Room::laboratory("L1", 30);
        let tut = Room::new("T1", 20).with_type(RoomType::TutorialRoom);

        assert!(hall.suits(SubjectType::Lecture));
        assert!(!hall.suits(SubjectType::Lab));
        assert!(lab.suits(SubjectType::Lab));
        assert!(!lab.suits(SubjectType::Lecture));
        assert!(tut.suits(SubjectType::Tutorial));
    }
}
