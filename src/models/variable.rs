//! CSP variables, values, and the entity view used for compatibility.
//!
//! Units, teachers and rooms all participate as variables. Their
//! candidate values are resources (by id) or timeslots. [`Entity`] is a
//! borrowed, kind-tagged view over whatever a variable or value refers
//! to, and carries the pairwise compatibility rule.

use serde::{Deserialize, Serialize};

use super::{Resource, Room, ScheduleUnit, Teacher, Timeslot};

/// Index of a unit in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// Index of a teacher in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeacherId(pub usize);

/// Index of a room in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// A CSP variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    /// A schedule unit choosing its teacher, room or slot.
    Unit(UnitId),
    /// A teacher choosing its room or a preferred slot.
    Teacher(TeacherId),
    /// A room choosing a preferred slot.
    Room(RoomId),
}

/// A candidate value for a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    /// Pair with a teacher.
    Teacher(TeacherId),
    /// Pair with a room.
    Room(RoomId),
    /// Pick a timeslot.
    Timeslot(Timeslot),
}

impl Value {
    /// The variable this value refers to, if the value is itself a
    /// resource that can act as a variable.
    pub fn as_variable(&self) -> Option<Variable> {
        match self {
            Value::Teacher(t) => Some(Variable::Teacher(*t)),
            Value::Room(r) => Some(Variable::Room(*r)),
            Value::Timeslot(_) => None,
        }
    }

    /// The room id, when this value is a room.
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Value::Room(r) => Some(*r),
            _ => None,
        }
    }

    /// The teacher id, when this value is a teacher.
    pub fn teacher(&self) -> Option<TeacherId> {
        match self {
            Value::Teacher(t) => Some(*t),
            _ => None,
        }
    }
}

impl Variable {
    /// Whether `value` is a kind this variable may take.
    ///
    /// Units take teachers, rooms or slots; teachers take rooms or slots;
    /// rooms take slots.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Variable::Unit(_), _)
                | (Variable::Teacher(_), Value::Room(_) | Value::Timeslot(_))
                | (Variable::Room(_), Value::Timeslot(_))
        )
    }

    /// Short kind label used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Variable::Unit(_) => "unit",
            Variable::Teacher(_) => "teacher",
            Variable::Room(_) => "room",
        }
    }
}

/// Borrowed view of a domain entity.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    /// A schedule unit.
    Unit(&'a ScheduleUnit),
    /// A teacher.
    Teacher(&'a Teacher),
    /// A room.
    Room(&'a Room),
    /// A timeslot.
    Timeslot(&'a Timeslot),
}

impl<'a> Entity<'a> {
    /// Static pairwise compatibility, symmetric in its arguments.
    ///
    /// - unit / teacher: qualified for the subject, available at every unit slot
    /// - unit / room: available at every unit slot, enough seats, required features
    /// - unit / slot: the unit occupies the slot
    /// - teacher or room / slot: the slot is in the declared availability
    /// - teacher / room: always compatible; rooms are checked per unit
    ///
    /// Occupancy is not considered here. The constraint evaluator adds
    /// the ledger check on top of this rule.
    pub fn pairwise_compatible(&self, other: &Entity<'_>) -> bool {
        match (*self, *other) {
            (Entity::Unit(u), Entity::Teacher(t)) | (Entity::Teacher(t), Entity::Unit(u)) => {
                t.is_qualified_for(u) && t.covers(&u.timeslots)
            }
            (Entity::Unit(u), Entity::Room(r)) | (Entity::Room(r), Entity::Unit(u)) => {
                r.covers(&u.timeslots) && r.fits(u)
            }
            (Entity::Unit(u), Entity::Timeslot(s)) | (Entity::Timeslot(s), Entity::Unit(u)) => {
                u.occupies(s)
            }
            (Entity::Teacher(t), Entity::Timeslot(s)) | (Entity::Timeslot(s), Entity::Teacher(t)) => {
                t.is_available(s)
            }
            (Entity::Room(r), Entity::Timeslot(s)) | (Entity::Timeslot(s), Entity::Room(r)) => {
                r.is_available(s)
            }
            (Entity::Teacher(_), Entity::Room(_)) | (Entity::Room(_), Entity::Teacher(_)) => true,
            _ => false,
        }
    }

    /// Display name of the entity.
    pub fn name(&self) -> String {
        match self {
            Entity::Unit(u) => u.name.clone(),
            Entity::Teacher(t) => t.name.clone(),
            Entity::Room(r) => r.name.clone(),
            Entity::Timeslot(s) => s.key(),
        }
    }
}
