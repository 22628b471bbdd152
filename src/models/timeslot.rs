//! Timeslot model.
//!
//! A timeslot is a (day, time) pair with value semantics: two timeslots
//! with equal day and time are the same slot. Availability sets, unit
//! requirements and ledger entries all compare slots by value.
//!
//! # Canonical key
//! Every slot has a canonical string key `"{day}_{time}"`
//! (e.g. `"Monday_10AM"`). Keys are what problem files contain and
//! what the serde representation uses.
//!
//! A day label must not contain `_`, so a key splits back into exactly
//! one (day, time) pair. For canonical slots, equal keys and equal values
//! coincide. [`Timeslot::try_new`] enforces this; graph validation and
//! serialization reject slots built with [`Timeslot::new`] that break it.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::Error;

/// A (day, time) slot in the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct Timeslot {
    /// Day label (e.g. "Monday").
    pub day: String,
    /// Time label within the day (e.g. "10AM").
    pub time: String,
}

impl Timeslot {
    /// Creates a timeslot without checking the labels.
    ///
    /// Use [`try_new`](Self::try_new) for labels that are not known to be
    /// canonical.
    pub fn new(day: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
        }
    }

    /// Creates a timeslot, rejecting an empty label or a `_` in the day.
    pub fn try_new(day: impl Into<String>, time: impl Into<String>) -> Result<Self, Error> {
        let slot = Self::new(day, time);
        if slot.is_canonical() {
            Ok(slot)
        } else {
            Err(Error::InvalidTimeslot(slot.key()))
        }
    }

    /// Whether the key parses back to this exact slot.
    pub fn is_canonical(&self) -> bool {
        !self.day.is_empty() && !self.time.is_empty() && !self.day.contains('_')
    }

    /// Canonical key: `"{day}_{time}"`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.day, self.time)
    }

    /// Parses a canonical key.
    ///
    /// Splits at the first `_`; both halves must be non-empty.
    pub fn parse_key(key: &str) -> Result<Self, Error> {
        match key.split_once('_') {
            Some((day, time)) => Self::try_new(day, time),
            None => Err(Error::InvalidTimeslot(key.to_string())),
        }
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.day, self.time)
    }
}

impl TryFrom<String> for Timeslot {
    type Error = Error;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::parse_key(&key)
    }
}

impl Serialize for Timeslot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_canonical() {
            return Err(serde::ser::Error::custom(Error::InvalidTimeslot(self.key())));
        }
        serializer.serialize_str(&self.key())
    }
}
