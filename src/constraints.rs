//! Constraint evaluator.
//!
//! Decides whether `variable = value` is compatible with the current
//! assignment and occupancy ledger. Three layers are checked:
//!
//! 1. **Direct**: the variable's own entity against the candidate value
//!    ([`Entity::pairwise_compatible`]), plus the ledger when a unit takes
//!    a teacher or room directly.
//! 2. **Linked**: each assigned neighbor that completes a unit-room pair.
//!    A unit taking teacher `t` whose variable already holds room `r` must
//!    fit `r`; a teacher taking room `r` must seat every unit already
//!    paired with it. Unassigned neighbors do not constrain.
//! 3. **Global**: a room value may be held by at most one variable.
//!
//! Everything here is side-effect free. Bookings implied by an accepted
//! assignment are described by [`booking_effects`] and applied by the
//! search engine through the ledger.

use log::trace;
use std::collections::BTreeMap;

use crate::ledger::{OccupancyLedger, ResourceKey};
use crate::models::{
    Assignment, ConstraintGraph, Entity, RoomId, TeacherId, Timeslot, UnitId, Value, Variable,
};

/// Whether `variable = value` is consistent with `assignment` and `ledger`.
///
/// `variable` is expected to be unassigned.
pub fn is_consistent(
    graph: &ConstraintGraph,
    assignment: &Assignment,
    ledger: &OccupancyLedger,
    variable: Variable,
    value: &Value,
) -> bool {
    if !direct_consistent(graph, ledger, variable, value) {
        trace!(
            "{} = {} rejected: incompatible pair",
            graph.describe_variable(variable),
            graph.describe_value(value)
        );
        return false;
    }

    for neighbor in graph.neighbors(variable) {
        let Some(neighbor_value) = assignment.get(neighbor) else {
            continue;
        };
        if !linked_consistent(graph, ledger, variable, value, neighbor, neighbor_value) {
            trace!(
                "{} = {} rejected: inconsistent with {}",
                graph.describe_variable(variable),
                graph.describe_value(value),
                graph.describe_variable(neighbor)
            );
            return false;
        }
    }

    if let Some(holder) = value.room().and_then(|r| assignment.room_holder(r, variable)) {
        trace!(
            "{} = {} rejected: room already held by {}",
            graph.describe_variable(variable),
            graph.describe_value(value),
            graph.describe_variable(holder)
        );
        return false;
    }

    true
}

/// Direct check of a variable against a candidate value.
pub fn direct_consistent(
    graph: &ConstraintGraph,
    ledger: &OccupancyLedger,
    variable: Variable,
    value: &Value,
) -> bool {
    match (variable, value) {
        (Variable::Unit(u), Value::Teacher(t)) => unit_fits_teacher(graph, ledger, u, *t),
        (Variable::Unit(u), Value::Room(r)) => unit_fits_room(graph, ledger, u, *r),
        _ => graph
            .variable_entity(variable)
            .pairwise_compatible(&graph.value_entity(value)),
    }
}

/// Check between `variable = value` and one assigned neighbor.
///
/// Only pairs that complete a unit-room placement constrain each other;
/// every other combination is vacuously consistent.
pub fn linked_consistent(
    graph: &ConstraintGraph,
    ledger: &OccupancyLedger,
    variable: Variable,
    value: &Value,
    neighbor: Variable,
    neighbor_value: &Value,
) -> bool {
    match (variable, value, neighbor, neighbor_value) {
        (Variable::Unit(u), Value::Teacher(t), Variable::Teacher(nt), Value::Room(r))
            if *t == nt =>
        {
            unit_fits_room(graph, ledger, u, *r)
        }
        (Variable::Teacher(t), Value::Room(r), Variable::Unit(u), Value::Teacher(nt))
            if t == *nt =>
        {
            unit_fits_room(graph, ledger, u, *r)
        }
        _ => true,
    }
}

/// Whether the room with id `room` can take `unit` right now.
pub fn unit_fits_room(
    graph: &ConstraintGraph,
    ledger: &OccupancyLedger,
    unit: UnitId,
    room: RoomId,
) -> bool {
    let u = graph.unit(unit);
    Entity::Unit(u).pairwise_compatible(&Entity::Room(graph.room(room)))
        && !ledger.any_booked(ResourceKey::Room(room), &u.timeslots)
}

/// Whether the teacher with id `teacher` can take `unit` right now.
pub fn unit_fits_teacher(
    graph: &ConstraintGraph,
    ledger: &OccupancyLedger,
    unit: UnitId,
    teacher: TeacherId,
) -> bool {
    let u = graph.unit(unit);
    Entity::Unit(u).pairwise_compatible(&Entity::Teacher(graph.teacher(teacher)))
        && !ledger.any_booked(ResourceKey::Teacher(teacher), &u.timeslots)
}

/// Bookings implied by `variable = value` given the rest of `assignment`.
///
/// - unit takes teacher `t`: the unit's slots on `t`, and on `t`'s room
///   if `t` already holds one
/// - unit takes room `r`: the unit's slots on `r`
/// - teacher `t` takes room `r`: the slots of every unit paired with `t`
///   on `r`
/// - timeslot values book nothing
pub fn booking_effects<'g>(
    graph: &'g ConstraintGraph,
    assignment: &Assignment,
    variable: Variable,
    value: &Value,
) -> Vec<(ResourceKey, &'g [Timeslot])> {
    let slots = move |u: UnitId| graph.unit(u).timeslots.as_slice();
    match (variable, value) {
        (Variable::Unit(u), Value::Teacher(t)) => {
            let mut effects = vec![(ResourceKey::Teacher(*t), slots(u))];
            if let Some(r) = assignment.get(Variable::Teacher(*t)).and_then(Value::room) {
                effects.push((ResourceKey::Room(r), slots(u)));
            }
            effects
        }
        (Variable::Unit(u), Value::Room(r)) => vec![(ResourceKey::Room(*r), slots(u))],
        (Variable::Teacher(t), Value::Room(r)) => assignment
            .units_of(t)
            .map(|u| (ResourceKey::Room(*r), slots(u)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Checks a complete assignment from scratch.
///
/// Returns one message per violated constraint; empty means the
/// assignment is a valid solution of `graph`.
pub fn verify_assignment(graph: &ConstraintGraph, assignment: &Assignment) -> Vec<String> {
    let mut violations = Vec::new();

    for (variable, _) in assignment.iter() {
        if !graph.contains(variable) {
            violations.push(format!("{variable:?} is not a variable of the graph"));
        }
    }

    for entry in graph.entries() {
        let variable = entry.variable;
        let label = graph.describe_variable(variable);
        let Some(value) = assignment.get(variable) else {
            violations.push(format!("{label} is unassigned"));
            continue;
        };
        if !entry.domain.contains(value) {
            violations.push(format!("{label} = {value:?} is outside its domain"));
            continue;
        }
        let pair_ok = graph
            .variable_entity(variable)
            .pairwise_compatible(&graph.value_entity(value));
        if !pair_ok {
            violations.push(format!("{label} is incompatible with {}", graph.describe_value(value)));
        }
        if let (Variable::Unit(u), Value::Teacher(t)) = (variable, value) {
            if let Some(r) = assignment.get(Variable::Teacher(*t)).and_then(Value::room) {
                let fits = Entity::Unit(graph.unit(u)).pairwise_compatible(&Entity::Room(graph.room(r)));
                if !fits {
                    violations.push(format!(
                        "{label} does not fit room {} held by its teacher",
                        graph.room(r).name
                    ));
                }
            }
        }
    }

    let mut holders: BTreeMap<RoomId, Vec<Variable>> = BTreeMap::new();
    for (variable, value) in assignment.iter() {
        if let Some(r) = value.room() {
            holders.entry(r).or_default().push(variable);
        }
    }
    for (room, vars) in holders {
        if vars.len() > 1 {
            violations.push(format!(
                "room {} is held by {} variables",
                graph.room(room).name,
                vars.len()
            ));
        }
    }

    let mut occupants: BTreeMap<ResourceKey, Vec<UnitId>> = BTreeMap::new();
    for (variable, value) in assignment.iter() {
        let Variable::Unit(u) = variable else {
            continue;
        };
        if let Value::Teacher(t) = value {
            occupants.entry(ResourceKey::Teacher(*t)).or_default().push(u);
        }
        if let Some(r) = assignment.room_of(u) {
            occupants.entry(ResourceKey::Room(r)).or_default().push(u);
        }
    }
    for (resource, units) in occupants {
        for (i, a) in units.iter().enumerate() {
            for b in &units[i + 1..] {
                let clash = graph
                    .unit(*a)
                    .timeslots
                    .iter()
                    .find(|s| graph.unit(*b).occupies(s));
                if let Some(slot) = clash {
                    violations.push(format!(
                        "{resource:?} is double-booked at {slot} by {} and {}",
                        graph.unit(*a).name,
                        graph.unit(*b).name
                    ));
                }
            }
        }
    }

    violations
}
