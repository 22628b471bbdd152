//! Built-in search policies.
//!
//! # Variable selection
//! - **STATIC**: first unassigned variable in graph order (baseline)
//! - **MRV**: fewest remaining consistent values
//!
//! # Value ordering
//! - **DECLARED**: domain order (baseline)
//! - **LCV**: fewest other unassigned variables competing for the value

use super::{SearchContext, ValueOrderer, VariableSelector};
use crate::constraints::is_consistent;
use crate::models::Value;

/// First unassigned variable in graph order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOrder;

impl VariableSelector for StaticOrder {
    fn name(&self) -> &'static str {
        "STATIC"
    }

    fn select(&self, context: &SearchContext<'_>) -> Option<usize> {
        context.unassigned().next()
    }
}

/// Minimum Remaining Values.
///
/// Counts, for each unassigned variable, the domain values that pass the
/// constraint evaluator against the current assignment and ledger: the
/// true remaining values, not the static domain size. Picks the smallest
/// count; ties go to the earliest variable in graph order. A variable
/// with no remaining value is returned immediately so the search fails
/// fast on it.
///
/// # Reference
/// Haralick & Elliott (1980), "fail-first" principle.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumRemainingValues;

impl MinimumRemainingValues {
    /// Remaining consistent values of the variable at `position`.
    pub fn remaining_values(position: usize, context: &SearchContext<'_>) -> usize {
        let entry = context.graph.entry(position);
        entry
            .domain
            .iter()
            .filter(|value| {
                is_consistent(
                    context.graph,
                    context.assignment,
                    context.ledger,
                    entry.variable,
                    value,
                )
            })
            .count()
    }
}

impl VariableSelector for MinimumRemainingValues {
    fn name(&self) -> &'static str {
        "MRV"
    }

    fn select(&self, context: &SearchContext<'_>) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for position in context.unassigned() {
            let remaining = Self::remaining_values(position, context);
            if remaining == 0 {
                return Some(position);
            }
            let better = match best {
                None => true,
                Some((_, count)) => remaining < count,
            };
            if better {
                best = Some((position, remaining));
            }
        }
        best.map(|(position, _)| position)
    }
}

/// Domain order as declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOrder;

impl ValueOrderer for DeclaredOrder {
    fn name(&self) -> &'static str {
        "DECLARED"
    }

    fn order(&self, position: usize, context: &SearchContext<'_>) -> Vec<Value> {
        context.graph.entry(position).domain.clone()
    }
}

/// Least Constraining Value.
///
/// Scores each candidate by how many other unassigned variables also
/// list it in their domain, and tries the least contested first. The
/// sort is stable, so equal scores keep domain order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastConstrainingValue;

impl LeastConstrainingValue {
    /// Number of other unassigned variables whose domain contains `value`.
    pub fn contention(position: usize, value: &Value, context: &SearchContext<'_>) -> usize {
        context
            .unassigned()
            .filter(|&other| other != position)
            .filter(|&other| context.graph.entry(other).domain.contains(value))
            .count()
    }
}

impl ValueOrderer for LeastConstrainingValue {
    fn name(&self) -> &'static str {
        "LCV"
    }

    fn order(&self, position: usize, context: &SearchContext<'_>) -> Vec<Value> {
        let mut scored: Vec<(usize, Value)> = context
            .graph
            .entry(position)
            .domain
            .iter()
            .map(|value| (Self::contention(position, value, context), value.clone()))
            .collect();
        scored.sort_by_key(|(score, _)| *score);
        scored.into_iter().map(|(_, value)| value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::OccupancyLedger;
    use crate::models::{
        Assignment, ConstraintGraph, GraphBuilder, Room, RoomId, ScheduleUnit, Teacher, Timeslot,
        Variable,
    };

    fn slot() -> Timeslot {
        Timeslot::new("Monday", "10AM")
    }

    /// Three units; Art can only take room C, Math and Music compete for A and B.
    fn graph() -> ConstraintGraph {
        let mut b = GraphBuilder::new();
        let math = b.add_unit(ScheduleUnit::new("Math", 30).with_timeslot(slot()));
        let music = b.add_unit(
            ScheduleUnit::new("Music", 20).with_timeslot(Timeslot::new("Tuesday", "9AM")),
        );
        let art = b.add_unit(ScheduleUnit::new("Art", 10).with_timeslot(slot()));
        b.add_teacher(Teacher::new("John"));
        let a = b.add_room(
            Room::new("A", 40)
                .with_availability(slot())
                .with_availability(Timeslot::new("Tuesday", "9AM")),
        );
        let rb = b.add_room(
            Room::new("B", 40)
                .with_availability(slot())
                .with_availability(Timeslot::new("Tuesday", "9AM")),
        );
        let c = b.add_room(Room::new("C", 40).with_availability(slot()));
        b.add_variable(Variable::Unit(math), vec![Value::Room(a), Value::Room(rb), Value::Room(c)]);
        b.add_variable(Variable::Unit(music), vec![Value::Room(a), Value::Room(rb)]);
        b.add_variable(Variable::Unit(art), vec![Value::Room(c)]);
        b.build().unwrap()
    }

    #[test]
    fn test_static_order_picks_first_unassigned() {
        let g = graph();
        let mut a = Assignment::new();
        let l = OccupancyLedger::new();
        assert_eq!(StaticOrder.select(&SearchContext::new(&g, &a, &l)), Some(0));
        a.assign(g.entry(0).variable, Value::Room(RoomId(0)));
        assert_eq!(StaticOrder.select(&SearchContext::new(&g, &a, &l)), Some(1));
    }

    #[test]
    fn test_mrv_prefers_most_constrained() {
        let g = graph();
        let a = Assignment::new();
        let l = OccupancyLedger::new();
        let ctx = SearchContext::new(&g, &a, &l);
        assert_eq!(MinimumRemainingValues::remaining_values(0, &ctx), 3);
        assert_eq!(MinimumRemainingValues::remaining_values(2, &ctx), 1);
        assert_eq!(MinimumRemainingValues.select(&ctx), Some(2));
    }

    #[test]
    fn test_mrv_counts_true_remaining_values() {
        let g = graph();
        let mut a = Assignment::new();
        let l = OccupancyLedger::new();
        // Art holds C: Math is left with A and B, same as Music
        a.assign(g.entry(2).variable, Value::Room(RoomId(2)));
        let ctx = SearchContext::new(&g, &a, &l);
        assert_eq!(MinimumRemainingValues::remaining_values(0, &ctx), 2);
        // tie between Math (0) and Music (1): graph order wins
        assert_eq!(MinimumRemainingValues.select(&ctx), Some(0));
    }

    #[test]
    fn test_mrv_none_when_complete() {
        let g = graph();
        let a: Assignment = g
            .entries()
            .iter()
            .map(|e| (e.variable, e.domain[0].clone()))
            .collect();
        let l = OccupancyLedger::new();
        assert_eq!(MinimumRemainingValues.select(&SearchContext::new(&g, &a, &l)), None);
        assert_eq!(StaticOrder.select(&SearchContext::new(&g, &a, &l)), None);
    }

    #[test]
    fn test_lcv_orders_by_contention() {
        let g = graph();
        let a = Assignment::new();
        let l = OccupancyLedger::new();
        let ctx = SearchContext::new(&g, &a, &l);

        // For Math: A and B are wanted by Music, C by Art. All tie at 1.
        assert_eq!(
            LeastConstrainingValue.order(0, &ctx),
            vec![Value::Room(RoomId(0)), Value::Room(RoomId(1)), Value::Room(RoomId(2))]
        );
        assert_eq!(LeastConstrainingValue::contention(0, &Value::Room(RoomId(0)), &ctx), 1);

        // Once Art is assigned, C is uncontested and goes first
        let mut a = Assignment::new();
        a.assign(g.entry(2).variable, Value::Room(RoomId(2)));
        let ctx = SearchContext::new(&g, &a, &l);
        assert_eq!(LeastConstrainingValue.order(0, &ctx)[0], Value::Room(RoomId(2)));
    }

    #[test]
    fn test_declared_order() {
        let g = graph();
        let a = Assignment::new();
        let l = OccupancyLedger::new();
        let ctx = SearchContext::new(&g, &a, &l);
        assert_eq!(DeclaredOrder.order(1, &ctx), g.entry(1).domain.clone());
    }
}
