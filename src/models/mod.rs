//! Timetabling domain models.
//!
//! Entities (units, teachers, rooms, timeslots), the variables and values
//! that range over them, the constraint graph tying the two together, and
//! the solution types.
//!
//! # Variable / value kinds
//!
//! | Variable | May take |
//! |----------|----------|
//! | Unit | Teacher, Room, Timeslot |
//! | Teacher | Room, Timeslot |
//! | Room | Timeslot |

mod assignment;
mod graph;
mod resource;
mod timeslot;
mod timetable;
mod unit;
mod variable;

pub use assignment::Assignment;
pub use graph::{ConstraintGraph, GraphBuilder, VariableEntry};
pub use resource::{Resource, Room, Teacher};
pub use timeslot::Timeslot;
pub use timetable::{Timetable, TimetableRow};
pub use unit::ScheduleUnit;
pub use variable::{Entity, RoomId, TeacherId, UnitId, Value, Variable};
