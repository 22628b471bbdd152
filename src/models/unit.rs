//! Schedule unit (class) model.
//!
//! A schedule unit is the thing being timetabled: a class with a
//! subject, a head count, and the timeslots it occupies. Units are
//! immutable once the constraint graph is built; which rooms and
//! teachers they currently occupy is tracked by the occupancy ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Timeslot;

/// A class to be placed with a teacher and a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUnit {
    /// Unique unit name.
    pub name: String,
    /// Subject a teacher must be qualified for. Defaults to `name`.
    pub subject: String,
    /// Number of seats required.
    pub capacity: u32,
    /// Whether the unit has special requirements (lab, equipment, ...).
    pub special_requirements: bool,
    /// Room features the unit needs. Empty = any room.
    pub required_features: BTreeSet<String>,
    /// Timeslots the unit occupies, in declaration order, without duplicates.
    pub timeslots: Vec<Timeslot>,
}

impl ScheduleUnit {
    /// Creates a unit whose subject equals its name.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        let name = name.into();
        Self {
            subject: name.clone(),
            name,
            capacity,
            special_requirements: false,
            required_features: BTreeSet::new(),
            timeslots: Vec::new(),
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Marks the unit as having special requirements.
    pub fn with_special_requirements(mut self, special: bool) -> Self {
        self.special_requirements = special;
        self
    }

    /// Adds a required room feature.
    pub fn with_required_feature(mut self, feature: impl Into<String>) -> Self {
        self.required_features.insert(feature.into());
        self
    }

    /// Adds an occupied timeslot. Duplicates are ignored.
    pub fn with_timeslot(mut self, slot: Timeslot) -> Self {
        if !self.timeslots.contains(&slot) {
            self.timeslots.push(slot);
        }
        self
    }

    /// Whether the unit occupies `slot`.
    pub fn occupies(&self, slot: &Timeslot) -> bool {
        self.timeslots.contains(slot)
    }

    /// First occupied timeslot, used as the row key when rendering.
    pub fn primary_timeslot(&self) -> Option<&Timeslot> {
        self.timeslots.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_builder() {
        let u = ScheduleUnit::new("Physics", 25)
            .with_special_requirements(true)
            .with_required_feature("Lab")
            .with_timeslot(Timeslot::new("Wednesday", "2PM"));

        assert_eq!(u.name, "Physics");
        assert_eq!(u.subject, "Physics");
        assert_eq!(u.capacity, 25);
        assert!(u.special_requirements);
        assert!(u.required_features.contains("Lab"));
        assert_eq!(u.primary_timeslot(), Some(&Timeslot::new("Wednesday", "2PM")));
    }

    #[test]
    fn test_subject_override() {
        let u = ScheduleUnit::new("Math-101", 30).with_subject("Math");
        assert_eq!(u.name, "Math-101");
        assert_eq!(u.subject, "Math");
    }

    #[test]
    fn test_duplicate_timeslots_ignored() {
        let slot = Timeslot::new("Monday", "10AM");
        let u = ScheduleUnit::new("Math", 30)
            .with_timeslot(slot.clone())
            .with_timeslot(slot.clone());
        assert_eq!(u.timeslots.len(), 1);
        assert!(u.occupies(&slot));
        assert!(!u.occupies(&Timeslot::new("Monday", "11AM")));
    }
}
