//! Problem descriptions.
//!
//! A [`ProblemSpec`] is the serializable, name-based form of a timetabling
//! instance. [`ProblemSpec::to_graph`] resolves names to typed ids and
//! builds a validated [`ConstraintGraph`].
//!
//! # JSON layout
//!
//! ```json
//! {
//!   "units":    [{ "name": "Math", "capacity": 30, "timeslots": ["Monday_10AM"],
//!                  "teachers": ["John"] }],
//!   "teachers": [{ "name": "John", "subjects": ["Math"],
//!                  "availability": ["Monday_10AM"], "rooms": ["A"] }],
//!   "rooms":    [{ "name": "A", "capacity": 40, "availability": ["Monday_10AM"] }],
//!   "solver":   { "use_heuristics": true }
//! }
//! ```
//!
//! Candidate lists are optional. A unit without `teachers` may take any
//! teacher; a teacher without `rooms` may take any room. A unit's `rooms`
//! list adds direct room candidates and defaults to none.
//!
//! `slot_candidates` adds timeslot values to a unit's or teacher's domain.
//! On a room it turns the room into a variable whose domain is that list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{
    ConstraintGraph, GraphBuilder, Room, RoomId, ScheduleUnit, Teacher, TeacherId, Timeslot, Value,
    Variable,
};
use crate::search::SolverConfig;

/// A schedule unit and its candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Unique unit name.
    pub name: String,
    /// Subject taught; defaults to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Expected attendance.
    pub capacity: u32,
    /// Whether the unit needs special equipment.
    #[serde(default)]
    pub special_requirements: bool,
    /// Room features the unit needs.
    #[serde(default)]
    pub required_features: Vec<String>,
    /// Timeslots the unit occupies.
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
    /// Candidate teachers by name. `None` = every teacher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teachers: Option<Vec<String>>,
    /// Direct candidate rooms by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<String>,
    /// Timeslot values the unit variable may take.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slot_candidates: Vec<Timeslot>,
}

/// A teacher and its candidate rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSpec {
    /// Unique teacher name.
    pub name: String,
    /// Subjects the teacher can teach.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Timeslots at which the teacher is available.
    #[serde(default)]
    pub availability: Vec<Timeslot>,
    /// Candidate rooms by name. `None` = every room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<String>>,
    /// Timeslot values the teacher variable may take.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slot_candidates: Vec<Timeslot>,
}

/// A room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Unique room name.
    pub name: String,
    /// Seats.
    pub capacity: u32,
    /// Equipment.
    #[serde(default)]
    pub features: Vec<String>,
    /// Timeslots at which the room can be used.
    #[serde(default)]
    pub availability: Vec<Timeslot>,
    /// Domain of the room variable. Empty = the room is not a variable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slot_candidates: Vec<Timeslot>,
}

/// A complete timetabling instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    /// Units to place, in search order.
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    /// Teachers.
    #[serde(default)]
    pub teachers: Vec<TeacherSpec>,
    /// Rooms.
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
    /// Solver settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverConfig>,
}

impl ProblemSpec {
    /// Parses a JSON problem.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON problem file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Solver settings, or the defaults.
    pub fn solver_config(&self) -> SolverConfig {
        self.solver.clone().unwrap_or_default()
    }

    /// Builds the constraint graph.
    ///
    /// Variables are declared units first, then teachers, then rooms with
    /// slot candidates, each in list order.
    ///
    /// # Errors
    /// [`Error::UnknownName`] for an unresolved candidate name,
    /// [`Error::InvalidGraph`] when validation fails.
    pub fn to_graph(&self) -> Result<ConstraintGraph> {
        let mut builder = GraphBuilder::new();

        let units: Vec<_> = self
            .units
            .iter()
            .map(|u| builder.add_unit(u.to_unit()))
            .collect();
        let teachers: HashMap<&str, TeacherId> = self
            .teachers
            .iter()
            .map(|t| (t.name.as_str(), builder.add_teacher(t.to_teacher())))
            .collect();
        let rooms: HashMap<&str, RoomId> = self
            .rooms
            .iter()
            .map(|r| (r.name.as_str(), builder.add_room(r.to_room())))
            .collect();

        for (spec, id) in self.units.iter().zip(units) {
            let mut domain = match &spec.teachers {
                Some(names) => resolve(names, &teachers, "teacher", Value::Teacher)?,
                None => self
                    .teachers
                    .iter()
                    .filter_map(|t| teachers.get(t.name.as_str()))
                    .map(|&t| Value::Teacher(t))
                    .collect(),
            };
            domain.extend(resolve(&spec.rooms, &rooms, "room", Value::Room)?);
            domain.extend(slot_values(&spec.slot_candidates));
            builder.add_variable(Variable::Unit(id), domain);
        }

        for spec in &self.teachers {
            let Some(&id) = teachers.get(spec.name.as_str()) else {
                continue;
            };
            let mut domain = match &spec.rooms {
                Some(names) => resolve(names, &rooms, "room", Value::Room)?,
                None => self
                    .rooms
                    .iter()
                    .filter_map(|r| rooms.get(r.name.as_str()))
                    .map(|&r| Value::Room(r))
                    .collect(),
            };
            domain.extend(slot_values(&spec.slot_candidates));
            builder.add_variable(Variable::Teacher(id), domain);
        }

        for spec in self.rooms.iter().filter(|r| !r.slot_candidates.is_empty()) {
            if let Some(&id) = rooms.get(spec.name.as_str()) {
                builder.add_variable(Variable::Room(id), slot_values(&spec.slot_candidates));
            }
        }

        builder.build()
    }
}

fn slot_values(slots: &[Timeslot]) -> Vec<Value> {
    slots.iter().cloned().map(Value::Timeslot).collect()
}

fn resolve<Id: Copy>(
    names: &[String],
    ids: &HashMap<&str, Id>,
    kind: &'static str,
    value: fn(Id) -> Value,
) -> Result<Vec<Value>> {
    names
        .iter()
        .map(|name| {
            ids.get(name.as_str())
                .map(|&id| value(id))
                .ok_or_else(|| Error::UnknownName {
                    kind,
                    name: name.clone(),
                })
        })
        .collect()
}

impl UnitSpec {
    fn to_unit(&self) -> ScheduleUnit {
        let mut unit = ScheduleUnit::new(self.name.clone(), self.capacity)
            .with_special_requirements(self.special_requirements);
        if let Some(subject) = &self.subject {
            unit = unit.with_subject(subject.clone());
        }
        for feature in &self.required_features {
            unit = unit.with_required_feature(feature.clone());
        }
        for slot in &self.timeslots {
            unit = unit.with_timeslot(slot.clone());
        }
        unit
    }
}

impl TeacherSpec {
    fn to_teacher(&self) -> Teacher {
        let mut teacher = Teacher::new(self.name.clone());
        for subject in &self.subjects {
            teacher = teacher.with_subject(subject.clone());
        }
        for slot in &self.availability {
            teacher = teacher.with_availability(slot.clone());
        }
        teacher
    }
}

impl RoomSpec {
    fn to_room(&self) -> Room {
        let mut room = Room::new(self.name.clone(), self.capacity);
        for feature in &self.features {
            room = room.with_feature(feature.clone());
        }
        for slot in &self.availability {
            room = room.with_availability(slot.clone());
        }
        room
    }
}

fn slots(keys: &[&str]) -> Vec<Timeslot> {
    keys.iter()
        .filter_map(|k| Timeslot::parse_key(k).ok())
        .collect()
}

/// The Math/Physics instance.
///
/// Math (30 seats, Monday 10AM) pairs with John and room A; Physics
/// (25 seats, Wednesday 2PM, needs a lab) pairs with Jane and room B.
/// Jane and room B are not available on Wednesday afternoon, so the
/// instance has no solution.
pub fn sample_spec() -> ProblemSpec {
    ProblemSpec {
        units: vec![
            UnitSpec {
                name: "Math".into(),
                subject: None,
                capacity: 30,
                special_requirements: false,
                required_features: Vec::new(),
                timeslots: slots(&["Monday_10AM"]),
                teachers: Some(vec!["John".into()]),
                rooms: Vec::new(),
                slot_candidates: Vec::new(),
            },
            UnitSpec {
                name: "Physics".into(),
                subject: None,
                capacity: 25,
                special_requirements: true,
                required_features: vec!["Lab".into()],
                timeslots: slots(&["Wednesday_2PM"]),
                teachers: Some(vec!["Jane".into()]),
                rooms: Vec::new(),
                slot_candidates: Vec::new(),
            },
        ],
        teachers: vec![
            TeacherSpec {
                name: "John".into(),
                subjects: vec!["Math".into(), "Physics".into()],
                availability: slots(&["Monday_10AM", "Wednesday_2PM"]),
                rooms: Some(vec!["A".into()]),
                slot_candidates: Vec::new(),
            },
            TeacherSpec {
                name: "Jane".into(),
                subjects: vec!["Physics".into()],
                availability: slots(&["Tuesday_1PM", "Thursday_10AM"]),
                rooms: Some(vec!["B".into()]),
                slot_candidates: Vec::new(),
            },
        ],
        rooms: vec![
            RoomSpec {
                name: "A".into(),
                capacity: 40,
                features: vec!["Projector".into()],
                availability: slots(&["Monday_10AM", "Wednesday_2PM", "Friday_3PM"]),
                slot_candidates: Vec::new(),
            },
            RoomSpec {
                name: "B".into(),
                capacity: 30,
                features: vec!["Lab".into()],
                availability: slots(&["Tuesday_1PM", "Thursday_10AM", "Friday_3PM"]),
                slot_candidates: Vec::new(),
            },
        ],
        solver: None,
    }
}

/// [`sample_spec`] with Jane and room B also available on Wednesday 2PM.
///
/// Solvable: Math gets John in room A, Physics gets Jane in room B.
pub fn feasible_sample_spec() -> ProblemSpec {
    let mut spec = sample_spec();
    let wednesday = Timeslot::new("Wednesday", "2PM");
    for teacher in spec.teachers.iter_mut().filter(|t| t.name == "Jane") {
        teacher.availability.push(wednesday.clone());
    }
    for room in spec.rooms.iter_mut().filter(|r| r.name == "B") {
        room.availability.push(wednesday.clone());
    }
    spec
}
