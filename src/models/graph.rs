//! Constraint graph (problem instance).
//!
//! Holds the entity tables, the ordered list of variables with their
//! domains, and the neighbor links between variables. A graph is only
//! produced by [`GraphBuilder::build`], which validates the input and
//! derives neighbor links from the domains. It never changes afterwards:
//! search mutates only the assignment and the occupancy ledger.
//!
//! # Neighbor derivation
//! A domain value that is itself a variable (a teacher or room that has
//! its own entry) links the two variables in both directions. Extra links
//! can be declared with [`GraphBuilder::add_neighbor`]. Neighbor lists are
//! kept in graph order without duplicates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{Entity, Room, RoomId, ScheduleUnit, Teacher, TeacherId, UnitId, Value, Variable};
use crate::error::{Error, Result};
use crate::validation::validate_graph;

/// One variable of the graph with its domain and neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableEntry {
    /// The variable.
    pub variable: Variable,
    /// Candidate values in declaration order.
    pub domain: Vec<Value>,
    /// Positions of neighbor variables, ascending.
    pub neighbors: Vec<usize>,
}

/// A validated, immutable CSP instance.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    units: Vec<ScheduleUnit>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    entries: Vec<VariableEntry>,
    positions: HashMap<Variable, usize>,
}

/// Builder for [`ConstraintGraph`].
///
/// # Example
/// ```
/// use u_timetable::models::{GraphBuilder, Room, ScheduleUnit, Teacher, Timeslot, Value, Variable};
///
/// let mon10 = Timeslot::new("Monday", "10AM");
/// let mut builder = GraphBuilder::new();
/// let math = builder.add_unit(ScheduleUnit::new("Math", 30).with_timeslot(mon10.clone()));
/// let john = builder.add_teacher(
///     Teacher::new("John").with_availability(mon10.clone()).with_subject("Math"),
/// );
/// let room_a = builder.add_room(Room::new("A", 40).with_availability(mon10));
/// builder.add_variable(Variable::Unit(math), vec![Value::Teacher(john)]);
/// builder.add_variable(Variable::Teacher(john), vec![Value::Room(room_a)]);
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.variable_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    pub(crate) units: Vec<ScheduleUnit>,
    pub(crate) teachers: Vec<Teacher>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) variables: Vec<(Variable, Vec<Value>)>,
    pub(crate) links: Vec<(Variable, Variable)>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit entity.
    pub fn add_unit(&mut self, unit: ScheduleUnit) -> UnitId {
        self.units.push(unit);
        UnitId(self.units.len() - 1)
    }

    /// Registers a teacher entity.
    pub fn add_teacher(&mut self, teacher: Teacher) -> TeacherId {
        self.teachers.push(teacher);
        TeacherId(self.teachers.len() - 1)
    }

    /// Registers a room entity.
    pub fn add_room(&mut self, room: Room) -> RoomId {
        self.rooms.push(room);
        RoomId(self.rooms.len() - 1)
    }

    /// Declares a variable with its ordered domain.
    ///
    /// Variable order is the static order used by the baseline search
    /// and for heuristic tie-breaking.
    pub fn add_variable(&mut self, variable: Variable, domain: Vec<Value>) -> &mut Self {
        self.variables.push((variable, domain));
        self
    }

    /// Declares an extra neighbor link (undirected).
    pub fn add_neighbor(&mut self, a: Variable, b: Variable) -> &mut Self {
        self.links.push((a, b));
        self
    }

    /// Validates and freezes the graph.
    ///
    /// Fails with [`Error::InvalidGraph`] listing every issue found.
    pub fn build(self) -> Result<ConstraintGraph> {
        validate_graph(&self).map_err(Error::InvalidGraph)?;

        let positions: HashMap<Variable, usize> = self
            .variables
            .iter()
            .enumerate()
            .map(|(i, (v, _))| (*v, i))
            .collect();

        let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.variables.len()];
        let mut link = |a: usize, b: usize| {
            if a != b {
                adjacency[a].insert(b);
                adjacency[b].insert(a);
            }
        };

        for (i, (_, domain)) in self.variables.iter().enumerate() {
            for value in domain {
                if let Some(j) = value.as_variable().and_then(|w| positions.get(&w)) {
                    link(i, *j);
                }
            }
        }
        for (a, b) in &self.links {
            link(positions[a], positions[b]);
        }

        let entries = self
            .variables
            .into_iter()
            .zip(adjacency)
            .map(|((variable, domain), neighbors)| VariableEntry {
                variable,
                domain,
                neighbors: neighbors.into_iter().collect(),
            })
            .collect();

        Ok(ConstraintGraph {
            units: self.units,
            teachers: self.teachers,
            rooms: self.rooms,
            entries,
            positions,
        })
    }
}

impl ConstraintGraph {
    /// Starts a new builder.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// All units.
    pub fn units(&self) -> &[ScheduleUnit] {
        &self.units
    }

    /// All teachers.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// All rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Unit by id.
    pub fn unit(&self, id: UnitId) -> &ScheduleUnit {
        &self.units[id.0]
    }

    /// Teacher by id.
    pub fn teacher(&self, id: TeacherId) -> &Teacher {
        &self.teachers[id.0]
    }

    /// Room by id.
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.entries.len()
    }

    /// Variable entries in graph order.
    pub fn entries(&self) -> &[VariableEntry] {
        &self.entries
    }

    /// Entry at a graph position.
    pub fn entry(&self, position: usize) -> &VariableEntry {
        &self.entries[position]
    }

    /// Variables in graph order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.entries.iter().map(|e| e.variable)
    }

    /// Graph position of a variable.
    pub fn position(&self, variable: Variable) -> Option<usize> {
        self.positions.get(&variable).copied()
    }

    /// Whether `variable` is part of the graph.
    pub fn contains(&self, variable: Variable) -> bool {
        self.positions.contains_key(&variable)
    }

    /// Domain of a variable (empty slice if unknown).
    pub fn domain(&self, variable: Variable) -> &[Value] {
        self.position(variable)
            .map(|p| self.entries[p].domain.as_slice())
            .unwrap_or(&[])
    }

    /// Neighbors of a variable in graph order.
    pub fn neighbors(&self, variable: Variable) -> impl Iterator<Item = Variable> + '_ {
        self.position(variable)
            .into_iter()
            .flat_map(move |p| self.entries[p].neighbors.iter())
            .map(move |&n| self.entries[n].variable)
    }

    /// Entity referred to by a variable.
    pub fn variable_entity(&self, variable: Variable) -> Entity<'_> {
        match variable {
            Variable::Unit(id) => Entity::Unit(self.unit(id)),
            Variable::Teacher(id) => Entity::Teacher(self.teacher(id)),
            Variable::Room(id) => Entity::Room(self.room(id)),
        }
    }

    /// Entity referred to by a value.
    pub fn value_entity<'a>(&'a self, value: &'a Value) -> Entity<'a> {
        match value {
            Value::Teacher(id) => Entity::Teacher(self.teacher(*id)),
            Value::Room(id) => Entity::Room(self.room(*id)),
            Value::Timeslot(slot) => Entity::Timeslot(slot),
        }
    }

    /// Human-readable variable label, e.g. `unit:Math`.
    pub fn describe_variable(&self, variable: Variable) -> String {
        format!("{}:{}", variable.kind(), self.variable_entity(variable).name())
    }

    /// Human-readable value label, e.g. `room:A`.
    pub fn describe_value(&self, value: &Value) -> String {
        let kind = match value {
            Value::Teacher(_) => "teacher",
            Value::Room(_) => "room",
            Value::Timeslot(_) => "slot",
        };
        format!("{kind}:{}", self.value_entity(value).name())
    }
}
