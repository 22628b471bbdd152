//! Assignment (search state / solution) model.
//!
//! A partial mapping from variables to chosen values. The search engine
//! grows it one entry per step and removes exactly that entry on
//! backtrack. A complete assignment covers every variable of its graph.
//!
//! Iteration order is the variable order (`BTreeMap`), so two equal
//! assignments always serialize and print identically. The serde form is
//! a list of `[variable, value]` pairs since JSON map keys must be strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ConstraintGraph, RoomId, TeacherId, UnitId, Value, Variable};

/// Mapping from variable to chosen value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<(Variable, Value)>", from = "Vec<(Variable, Value)>")]
pub struct Assignment {
    values: BTreeMap<Variable, Value>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `variable = value`, returning the previous value if any.
    pub fn assign(&mut self, variable: Variable, value: Value) -> Option<Value> {
        self.values.insert(variable, value)
    }

    /// Removes the entry for `variable`.
    pub fn unassign(&mut self, variable: Variable) -> Option<Value> {
        self.values.remove(&variable)
    }

    /// Value of `variable`, if assigned.
    pub fn get(&self, variable: Variable) -> Option<&Value> {
        self.values.get(&variable)
    }

    /// Whether `variable` is assigned.
    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.values.contains_key(&variable)
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every variable of `graph` is assigned.
    pub fn is_complete(&self, graph: &ConstraintGraph) -> bool {
        self.len() == graph.variable_count() && graph.variables().all(|v| self.is_assigned(v))
    }

    /// Entries in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, &Value)> {
        self.values.iter().map(|(v, val)| (*v, val))
    }

    /// Teacher chosen by a unit, when the unit took a teacher value.
    pub fn teacher_of(&self, unit: UnitId) -> Option<TeacherId> {
        self.get(Variable::Unit(unit)).and_then(Value::teacher)
    }

    /// Room a unit ends up in: its own room value, or the room held by
    /// its teacher.
    pub fn room_of(&self, unit: UnitId) -> Option<RoomId> {
        match self.get(Variable::Unit(unit))? {
            Value::Room(r) => Some(*r),
            Value::Teacher(t) => self.get(Variable::Teacher(*t)).and_then(Value::room),
            Value::Timeslot(_) => None,
        }
    }

    /// Variable other than `except` currently holding `room`.
    pub fn room_holder(&self, room: RoomId, except: Variable) -> Option<Variable> {
        self.iter()
            .find(|(v, val)| *v != except && val.room() == Some(room))
            .map(|(v, _)| v)
    }

    /// Units currently paired with `teacher`.
    pub fn units_of(&self, teacher: TeacherId) -> impl Iterator<Item = UnitId> + '_ {
        self.iter().filter_map(move |(v, val)| match (v, val) {
            (Variable::Unit(u), Value::Teacher(t)) if *t == teacher => Some(u),
            _ => None,
        })
    }
}

impl FromIterator<(Variable, Value)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<(Variable, Value)>> for Assignment {
    fn from(entries: Vec<(Variable, Value)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Assignment> for Vec<(Variable, Value)> {
    fn from(assignment: Assignment) -> Self {
        assignment.values.into_iter().collect()
    }
}
