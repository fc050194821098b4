//! Shared timetable state.
//!
//! Holds the current entity lists and the last committed timetable behind
//! an `Arc<RwLock<_>>`. Regeneration snapshots the entities under a read
//! lock, optimizes without holding any lock, and commits the winner with
//! a single write. A separate run mutex keeps two regenerations from
//! interleaving.
//!
//! Every entity change bumps a revision counter and marks the current
//! timetable stale. A commit whose snapshot predates a later change stays
//! stale.

use std::sync::{Arc, Mutex, RwLock};

use log::info;
use rand::Rng;

use crate::error::StateError;
use crate::models::{Class, EntitySnapshot, Faculty, Room, Subject, Timetable, remove, upsert};
use crate::optimize::TimetableOptimizer;
use crate::params::OptimizationParameters;
use crate::ranking::OptimizationResult;

/// Entities plus the timetable generated from them.
#[derive(Debug, Clone, Default)]
pub struct TimetableState {
    pub entities: EntitySnapshot,
    /// Last committed timetable.
    pub current: Option<Timetable>,
    /// Whether entities changed since `current` was generated.
    pub stale: bool,
    /// Incremented on every entity change.
    pub revision: u64,
}

impl TimetableState {
    fn touch(&mut self) {
        self.revision += 1;
        self.stale = true;
    }
}

/// Thread-safe handle to a [`TimetableState`]; clones share the state.
#[derive(Debug, Clone, Default)]
pub struct SharedTimetableState {
    inner: Arc<RwLock<TimetableState>>,
    run_lock: Arc<Mutex<()>>,
}

impl SharedTimetableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing entities, with no timetable yet.
    pub fn from_snapshot(entities: EntitySnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TimetableState {
                entities,
                ..Default::default()
            })),
            run_lock: Arc::default(),
        }
    }

    /// Copy of the current entities.
    pub fn snapshot(&self) -> Result<EntitySnapshot, StateError> {
        Ok(self.inner.read()?.entities.clone())
    }

    /// Copy of the last committed timetable.
    pub fn current(&self) -> Result<Option<Timetable>, StateError> {
        Ok(self.inner.read()?.current.clone())
    }

    pub fn is_stale(&self) -> Result<bool, StateError> {
        Ok(self.inner.read()?.stale)
    }

    /// Replaces the current timetable (e.g. after an import).
    pub fn set_current(&self, timetable: Timetable) -> Result<(), StateError> {
        let mut state = self.inner.write()?;
        state.current = Some(timetable);
        state.stale = false;
        Ok(())
    }

    pub fn upsert_class(&self, class: Class) -> Result<(), StateError> {
        self.update(|s| upsert(&mut s.entities.classes, class))
    }

    pub fn upsert_subject(&self, subject: Subject) -> Result<(), StateError> {
        self.update(|s| upsert(&mut s.entities.subjects, subject))
    }

    pub fn upsert_faculty(&self, faculty: Faculty) -> Result<(), StateError> {
        self.update(|s| upsert(&mut s.entities.faculty, faculty))
    }

    pub fn upsert_room(&self, room: Room) -> Result<(), StateError> {
        self.update(|s| upsert(&mut s.entities.rooms, room))
    }

    pub fn remove_class(&self, id: &str) -> Result<(), StateError> {
        self.delete("class", id, |s| remove(&mut s.entities.classes, id))
    }

    pub fn remove_subject(&self, id: &str) -> Result<(), StateError> {
        self.delete("subject", id, |s| remove(&mut s.entities.subjects, id))
    }

    pub fn remove_faculty(&self, id: &str) -> Result<(), StateError> {
        self.delete("faculty", id, |s| remove(&mut s.entities.faculty, id))
    }

    pub fn remove_room(&self, id: &str) -> Result<(), StateError> {
        self.delete("room", id, |s| remove(&mut s.entities.rooms, id))
    }

    /// Optimizes over the current entities and commits the best result.
    ///
    /// Returns every ranked result; the state keeps only the first.
    pub fn regenerate<R: Rng>(
        &self,
        optimizer: &TimetableOptimizer,
        params: &OptimizationParameters,
        rng: &mut R,
    ) -> Result<Vec<OptimizationResult>, StateError> {
        let _run = self.run_lock.lock()?;

        let (entities, revision) = {
            let state = self.inner.read()?;
            (state.entities.clone(), state.revision)
        };

        let results = optimizer.optimize(&entities, params, rng);

        if let Some(best) = results.first() {
            let timetable = best.clone().into_timetable();
            let mut state = self.inner.write()?;
            state.stale = state.revision != revision;
            info!(
                "Committed timetable '{}' ({} slots){}",
                timetable.id,
                timetable.slot_count(),
                if state.stale { ", already stale" } else { "" }
            );
            state.current = Some(timetable);
        }
        Ok(results)
    }

    fn update(&self, f: impl FnOnce(&mut TimetableState)) -> Result<(), StateError> {
        let mut state = self.inner.write()?;
        f(&mut *state);
        state.touch();
        Ok(())
    }

    fn delete(
        &self,
        kind: &'static str,
        id: &str,
        f: impl FnOnce(&mut TimetableState) -> bool,
    ) -> Result<(), StateError> {
        let mut state = self.inner.write()?;
        if !f(&mut *state) {
            return Err(StateError::UnknownEntity {
                kind,
                id: id.to_string(),
            });
        }
        state.touch();
        Ok(())
    }
}
