//! Timetabling domain models.
//!
//! Plain value types describing the inputs (classes, subjects, faculty,
//! rooms) and outputs (slots, timetables, conflicts) of the optimizer.
//! All types are immutable in spirit: editing means building a new value.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | Class | Task group / cohort |
//! | Subject | Activity template |
//! | Faculty, Room | Resources |
//! | TimetableSlot | Assignment |
//! | Timetable | Schedule |

mod calendar;
mod class;
mod conflict;
mod faculty;
mod room;
mod snapshot;
mod subject;
mod timetable;

pub use calendar::{ClockTime, ParseClockTimeError, TimeWindow, WeekGrid, Weekday};
pub use class::Class;
pub use conflict::{Conflict, ResourceKind};
pub use faculty::{DayAvailability, Faculty};
pub use room::{Room, RoomType};
pub use snapshot::{Entity, EntitySnapshot};
pub(crate) use snapshot::{remove, upsert};
pub use subject::{Subject, SubjectType};
pub use timetable::{Timetable, TimetableSlot};
