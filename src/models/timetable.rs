//! Rendered timetable.
//!
//! One row per schedule unit, in graph order: the unit's first timeslot,
//! its teacher and the room it ends up in (direct or through the teacher).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Assignment, ConstraintGraph, UnitId};

const NOT_ASSIGNED: &str = "Not Assigned";

/// One line of a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    /// Timeslot key of the unit's first slot.
    pub timeslot: Option<String>,
    /// Unit name.
    pub unit: String,
    /// Assigned teacher name.
    pub teacher: Option<String>,
    /// Assigned room name.
    pub room: Option<String>,
}

/// Timetable view of an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Rows in graph unit order.
    pub rows: Vec<TimetableRow>,
}

impl Timetable {
    /// Builds the timetable of `assignment`. With `None` every teacher and
    /// room cell is empty.
    pub fn new(graph: &ConstraintGraph, assignment: Option<&Assignment>) -> Self {
        let rows = graph
            .units()
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                let id = UnitId(i);
                TimetableRow {
                    timeslot: unit.primary_timeslot().map(|s| s.key()),
                    unit: unit.name.clone(),
                    teacher: assignment
                        .and_then(|a| a.teacher_of(id))
                        .map(|t| graph.teacher(t).name.clone()),
                    room: assignment
                        .and_then(|a| a.room_of(id))
                        .map(|r| graph.room(r).name.clone()),
                }
            })
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the timetable has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose unit has no room.
    pub fn unplaced(&self) -> impl Iterator<Item = &TimetableRow> {
        self.rows.iter().filter(|r| r.room.is_none())
    }
}

impl fmt::Display for Timetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {:<15} | {:<15} | {:<15} | {:<15} |",
            "Timeslot", "Assigned Class", "Assigned Teacher", "Assigned Room"
        )?;
        writeln!(f, "|{}|", "-".repeat(69))?;
        for row in &self.rows {
            writeln!(
                f,
                "| {:<15} | {:<15} | {:<15} | {:<15} |",
                row.timeslot.as_deref().unwrap_or(NOT_ASSIGNED),
                row.unit,
                row.teacher.as_deref().unwrap_or(NOT_ASSIGNED),
                row.room.as_deref().unwrap_or(NOT_ASSIGNED)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphBuilder, Room, ScheduleUnit, Teacher, Timeslot, Value, Variable};

    fn graph() -> ConstraintGraph {
        let slot = Timeslot::new("Monday", "10AM");
        let mut b = GraphBuilder::new();
        let math = b.add_unit(ScheduleUnit::new("Math", 30).with_timeslot(slot.clone()));
        let john = b.add_teacher(Teacher::new("John").with_subject("Math"));
        let room = b.add_room(Room::new("RoomA", 40).with_availability(slot));
        b.add_variable(Variable::Unit(math), vec![Value::Teacher(john)]);
        b.add_variable(Variable::Teacher(john), vec![Value::Room(room)]);
        b.build().unwrap()
    }

    #[test]
    fn test_rows_follow_teacher_room() {
        let g = graph();
        let a: Assignment = g
            .entries()
            .iter()
            .map(|e| (e.variable, e.domain[0].clone()))
            .collect();
        let t = Timetable::new(&g, Some(&a));
        assert_eq!(t.len(), 1);
        assert_eq!(
            t.rows[0],
            TimetableRow {
                timeslot: Some("Monday_10AM".into()),
                unit: "Math".into(),
                teacher: Some("John".into()),
                room: Some("RoomA".into()),
            }
        );
        assert_eq!(t.unplaced().count(), 0);
    }

    #[test]
    fn test_display_without_solution() {
        let g = graph();
        let text = Timetable::new(&g, None).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| Timeslot        | Assigned Class "));
        assert_eq!(lines[1].len(), 71);
        assert_eq!(
            lines[2],
            "| Monday_10AM     | Math            | Not Assigned    | Not Assigned    |"
        );
    }
}
