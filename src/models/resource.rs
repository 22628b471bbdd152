//! Resource models.
//!
//! Resources are what schedule units consume: teachers and rooms. Both
//! expose availability through the [`Resource`] capability trait; the
//! kind-specific checks (subjects for teachers, capacity and features
//! for rooms) live on the concrete types.
//!
//! Booked timeslots are deliberately not stored here. Bookings change
//! during search and belong to [`crate::ledger::OccupancyLedger`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ScheduleUnit, Timeslot};

/// Capability shared by every resource kind.
pub trait Resource {
    /// Unique name within the resource kind.
    fn name(&self) -> &str;

    /// Declared availability.
    fn available_timeslots(&self) -> &BTreeSet<Timeslot>;

    /// Whether the resource is available at `slot`.
    fn is_available(&self, slot: &Timeslot) -> bool {
        self.available_timeslots().contains(slot)
    }

    /// Whether every slot in `slots` lies within the availability.
    fn covers<'a, I>(&self, slots: I) -> bool
    where
        I: IntoIterator<Item = &'a Timeslot>,
    {
        slots.into_iter().all(|s| self.is_available(s))
    }
}

/// A teacher qualified for a set of subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher name.
    pub name: String,
    /// Timeslots at which the teacher can teach.
    pub available_timeslots: BTreeSet<Timeslot>,
    /// Subjects the teacher is qualified for.
    pub subjects: BTreeSet<String>,
}

/// A room with seats and equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Timeslots at which the room can be used.
    pub available_timeslots: BTreeSet<Timeslot>,
    /// Equipment and features (e.g. "Projector", "Lab").
    pub features: BTreeSet<String>,
}

impl Teacher {
    /// Creates a teacher with no availability and no subjects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available_timeslots: BTreeSet::new(),
            subjects: BTreeSet::new(),
        }
    }

    /// Adds an available timeslot.
    pub fn with_availability(mut self, slot: Timeslot) -> Self {
        self.available_timeslots.insert(slot);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.insert(subject.into());
        self
    }

    /// Whether the teacher is qualified for `unit`'s subject.
    pub fn is_qualified_for(&self, unit: &ScheduleUnit) -> bool {
        self.subjects.contains(&unit.subject)
    }
}

impl Room {
    /// Creates a room with the given capacity and no availability.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            available_timeslots: BTreeSet::new(),
            features: BTreeSet::new(),
        }
    }

    /// Adds an available timeslot.
    pub fn with_availability(mut self, slot: Timeslot) -> Self {
        self.available_timeslots.insert(slot);
        self
    }

    /// Adds a feature.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    /// Whether the room seats `unit` and provides its required features.
    pub fn fits(&self, unit: &ScheduleUnit) -> bool {
        self.capacity >= unit.capacity && unit.required_features.is_subset(&self.features)
    }
}

impl Resource for Teacher {
    fn name(&self) -> &str {
        &self.name
    }

    fn available_timeslots(&self) -> &BTreeSet<Timeslot> {
        &self.available_timeslots
    }
}

impl Resource for Room {
    fn name(&self) -> &str {
        &self.name
    }

    fn available_timeslots(&self) -> &BTreeSet<Timeslot> {
        &self.available_timeslots
    }
}
