//! Occupancy ledger.
//!
//! Tracks which timeslots are currently booked on each teacher and room
//! while a search is running. Bookings are grouped into frames, one frame
//! per assignment step; popping a frame undoes exactly the bookings made
//! in it. This pairs every `book` with exactly one `unbook` structurally,
//! instead of relying on the caller to mirror its own conditionals.
//!
//! # Exact rollback
//! [`OccupancyLedger::book`] returns a [`Booking`] recording only the
//! slots that were newly inserted. Unbooking removes those and nothing
//! else, so book-then-unbook always restores the previous state, even if
//! some of the slots were already present.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Assignment, ConstraintGraph, RoomId, TeacherId, Timeslot, Value, Variable};

/// A resource whose occupancy is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKey {
    /// A teacher.
    Teacher(TeacherId),
    /// A room.
    Room(RoomId),
}

/// Record of one `book` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Resource that was booked.
    pub resource: ResourceKey,
    /// Slots newly inserted by this booking.
    pub slots: Vec<Timeslot>,
}

/// Per-resource booked timeslots plus an undo log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyLedger {
    booked: BTreeMap<ResourceKey, BTreeSet<Timeslot>>,
    frames: Vec<Vec<Booking>>,
}

impl OccupancyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Books `slots` on `resource`.
    pub fn book<'a, I>(&mut self, resource: ResourceKey, slots: I) -> Booking
    where
        I: IntoIterator<Item = &'a Timeslot>,
    {
        let set = self.booked.entry(resource).or_default();
        let inserted: Vec<Timeslot> = slots
            .into_iter()
            .filter(|s| set.insert((*s).clone()))
            .cloned()
            .collect();
        if set.is_empty() {
            self.booked.remove(&resource);
        }
        Booking {
            resource,
            slots: inserted,
        }
    }

    /// Reverts a booking returned by [`book`](Self::book).
    pub fn unbook(&mut self, booking: &Booking) {
        if let Some(set) = self.booked.get_mut(&booking.resource) {
            for slot in &booking.slots {
                set.remove(slot);
            }
            if set.is_empty() {
                self.booked.remove(&booking.resource);
            }
        }
    }

    /// Opens a frame for the bookings of one assignment step.
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Books into the current frame. Opens one if none is open.
    pub fn book_in_frame<'a, I>(&mut self, resource: ResourceKey, slots: I)
    where
        I: IntoIterator<Item = &'a Timeslot>,
    {
        let booking = self.book(resource, slots);
        if self.frames.is_empty() {
            self.frames.push(Vec::new());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.push(booking);
        }
    }

    /// Closes the current frame, undoing its bookings in reverse order.
    ///
    /// Returns the number of bookings undone.
    pub fn pop_frame(&mut self) -> usize {
        let Some(frame) = self.frames.pop() else {
            return 0;
        };
        for booking in frame.iter().rev() {
            self.unbook(booking);
        }
        frame.len()
    }

    /// Closes every open frame, keeping its bookings.
    pub fn commit(&mut self) {
        self.frames.clear();
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Slots booked on `resource`.
    pub fn booked(&self, resource: ResourceKey) -> Option<&BTreeSet<Timeslot>> {
        self.booked.get(&resource)
    }

    /// Whether `slot` is booked on `resource`.
    pub fn is_booked(&self, resource: ResourceKey, slot: &Timeslot) -> bool {
        self.booked
            .get(&resource)
            .is_some_and(|set| set.contains(slot))
    }

    /// Whether any of `slots` is booked on `resource`.
    pub fn any_booked<'a, I>(&self, resource: ResourceKey, slots: I) -> bool
    where
        I: IntoIterator<Item = &'a Timeslot>,
    {
        match self.booked.get(&resource) {
            Some(set) => slots.into_iter().any(|s| set.contains(s)),
            None => false,
        }
    }

    /// Whether no slot is booked anywhere.
    pub fn is_empty(&self) -> bool {
        self.booked.is_empty()
    }

    /// Booked slots per resource, in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &BTreeSet<Timeslot>)> {
        self.booked.iter().map(|(k, v)| (*k, v))
    }

    /// Drops every booking and frame.
    pub fn clear(&mut self) {
        self.booked.clear();
        self.frames.clear();
    }

    /// The ledger implied by an assignment: each unit's slots booked on
    /// its teacher and on the room it ends up in.
    pub fn from_assignment(graph: &ConstraintGraph, assignment: &Assignment) -> Self {
        let mut ledger = Self::new();
        for (variable, value) in assignment.iter() {
            let Variable::Unit(unit) = variable else {
                continue;
            };
            let slots = &graph.unit(unit).timeslots;
            if let Value::Teacher(t) = value {
                ledger.book(ResourceKey::Teacher(*t), slots);
            }
            if let Some(room) = assignment.room_of(unit) {
                ledger.book(ResourceKey::Room(room), slots);
            }
        }
        ledger
    }

    /// Booked slots only, ignoring open frames.
    pub fn same_bookings(&self, other: &Self) -> bool {
        self.booked == other.booked
    }
}
