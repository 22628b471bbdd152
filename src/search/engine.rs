//! Chronological backtracking.
//!
//! # Algorithm
//!
//! 1. If every variable is assigned, succeed.
//! 2. Let the selector pick an unassigned variable.
//! 3. For each candidate in orderer order: if the evaluator accepts it,
//!    assign it, book its effects in a fresh ledger frame and descend.
//! 4. When a subtree fails, pop the frame and unassign, then try the
//!    next candidate. When none is left, report failure to the caller.
//!
//! Two drivers implement these steps: plain recursion and an explicit
//! frame stack. They visit the same nodes in the same order, so their
//! results and statistics are identical.
//!
//! # Complexity
//! O(d^n) worst case for n variables with domains of size d.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3: Backtracking Search for CSPs

use log::{debug, info, trace};

use super::{SearchOutcome, SearchStats, SearchStatus, SearchStrategy, SolverConfig};
use crate::constraints::{booking_effects, is_consistent};
use crate::heuristics::{Heuristics, SearchContext};
use crate::ledger::OccupancyLedger;
use crate::models::{Assignment, ConstraintGraph, Value, Variable};

/// Backtracking solver.
///
/// # Example
///
/// ```
/// use u_timetable::models::{GraphBuilder, Room, ScheduleUnit, Timeslot, Value, Variable};
/// use u_timetable::search::{BacktrackingSolver, SolverConfig};
///
/// let slot = Timeslot::new("Monday", "10AM");
/// let mut b = GraphBuilder::new();
/// let math = b.add_unit(ScheduleUnit::new("Math", 30).with_timeslot(slot.clone()));
/// let room = b.add_room(Room::new("A", 40).with_availability(slot));
/// b.add_variable(Variable::Unit(math), vec![Value::Room(room)]);
/// let graph = b.build().unwrap();
///
/// let outcome = BacktrackingSolver::new(SolverConfig::default()).solve(&graph);
/// assert!(outcome.is_solved());
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackingSolver {
    config: SolverConfig,
    heuristics: Heuristics,
}

impl BacktrackingSolver {
    /// Creates a solver; heuristics follow `config.use_heuristics`.
    pub fn new(config: SolverConfig) -> Self {
        let heuristics = Heuristics::from_flag(config.use_heuristics);
        Self { config, heuristics }
    }

    /// Replaces the selector/orderer pair.
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The selector/orderer pair.
    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Searches for a complete consistent assignment of `graph`.
    pub fn solve(&self, graph: &ConstraintGraph) -> SearchOutcome {
        let strategy = self.config.resolve_strategy(graph.variable_count());
        info!(
            "Starting search over {} variables ({}/{}, {:?})",
            graph.variable_count(),
            self.heuristics.selector().name(),
            self.heuristics.orderer().name(),
            strategy
        );

        let mut run = Run::new(graph, &self.heuristics, self.config.node_limit);
        let step = match strategy {
            SearchStrategy::Iterative => run.iterative(),
            _ => run.recursive(),
        };

        let Run {
            assignment,
            mut ledger,
            stats,
            ..
        } = run;

        let (status, assignment) = match step {
            Step::Solved => {
                debug_assert!(assignment.is_complete(graph));
                debug_assert_eq!(ledger.depth(), assignment.len());
                ledger.commit();
                (SearchStatus::Solved, Some(assignment))
            }
            Step::Exhausted | Step::Aborted => {
                debug_assert!(assignment.is_empty());
                debug_assert!(ledger.is_empty() && ledger.depth() == 0);
                let status = if step == Step::Aborted {
                    SearchStatus::BudgetExhausted
                } else {
                    SearchStatus::Infeasible
                };
                (status, None)
            }
        };

        info!(
            "Search finished: {:?} after {} nodes, {} backtracks",
            status, stats.nodes, stats.backtracks
        );

        SearchOutcome {
            status,
            assignment,
            ledger,
            stats,
        }
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Solved,
    Exhausted,
    Aborted,
}

enum Attempt {
    Accepted,
    Rejected,
    Aborted,
}

/// Candidates of one branching variable on the explicit stack.
struct Frame {
    variable: Variable,
    candidates: Vec<Value>,
    next: usize,
    assigned: bool,
}

/// Mutable state of one search.
struct Run<'g> {
    graph: &'g ConstraintGraph,
    heuristics: &'g Heuristics,
    node_limit: Option<u64>,
    assignment: Assignment,
    ledger: OccupancyLedger,
    stats: SearchStats,
}

impl<'g> Run<'g> {
    fn new(graph: &'g ConstraintGraph, heuristics: &'g Heuristics, node_limit: Option<u64>) -> Self {
        Self {
            graph,
            heuristics,
            node_limit,
            assignment: Assignment::new(),
            ledger: OccupancyLedger::new(),
            stats: SearchStats::default(),
        }
    }

    fn recursive(&mut self) -> Step {
        let Some((variable, candidates)) = self.branch() else {
            return Step::Solved;
        };

        for value in candidates {
            match self.attempt(variable, &value) {
                Attempt::Rejected => continue,
                Attempt::Aborted => return Step::Aborted,
                Attempt::Accepted => {}
            }
            match self.recursive() {
                Step::Solved => return Step::Solved,
                Step::Aborted => {
                    self.retract(variable);
                    return Step::Aborted;
                }
                Step::Exhausted => self.backtrack(variable),
            }
        }

        debug!(
            "No valid assignment for {}",
            self.graph.describe_variable(variable)
        );
        Step::Exhausted
    }

    fn iterative(&mut self) -> Step {
        let mut stack: Vec<Frame> = Vec::new();
        match self.branch() {
            None => return Step::Solved,
            Some((variable, candidates)) => stack.push(Frame::new(variable, candidates)),
        }

        while let Some(frame) = stack.last_mut() {
            if frame.assigned {
                frame.assigned = false;
                self.backtrack(frame.variable);
            }

            let mut accepted = false;
            while frame.next < frame.candidates.len() {
                let value = frame.candidates[frame.next].clone();
                frame.next += 1;
                match self.attempt(frame.variable, &value) {
                    Attempt::Rejected => continue,
                    Attempt::Aborted => {
                        self.unwind(&mut stack);
                        return Step::Aborted;
                    }
                    Attempt::Accepted => {
                        frame.assigned = true;
                        accepted = true;
                        break;
                    }
                }
            }

            if !accepted {
                debug!(
                    "No valid assignment for {}",
                    self.graph.describe_variable(frame.variable)
                );
                stack.pop();
                continue;
            }

            match self.branch() {
                None => return Step::Solved,
                Some((variable, candidates)) => stack.push(Frame::new(variable, candidates)),
            }
        }

        Step::Exhausted
    }

    /// Next variable and its ordered candidates, or `None` when complete.
    fn branch(&self) -> Option<(Variable, Vec<Value>)> {
        let context = SearchContext::new(self.graph, &self.assignment, &self.ledger);
        let position = self.heuristics.selector().select(&context)?;
        let candidates = self.heuristics.orderer().order(position, &context);
        let variable = self.graph.entry(position).variable;
        trace!(
            "Branching on {} with {} candidates",
            self.graph.describe_variable(variable),
            candidates.len()
        );
        Some((variable, candidates))
    }

    fn attempt(&mut self, variable: Variable, value: &Value) -> Attempt {
        self.stats.consistency_checks += 1;
        if !is_consistent(self.graph, &self.assignment, &self.ledger, variable, value) {
            return Attempt::Rejected;
        }
        if self.node_limit.is_some_and(|limit| self.stats.nodes >= limit) {
            debug!("Node budget of {} exhausted", self.stats.nodes);
            return Attempt::Aborted;
        }

        self.ledger.push_frame();
        for (resource, slots) in booking_effects(self.graph, &self.assignment, variable, value) {
            self.ledger.book_in_frame(resource, slots);
        }
        self.assignment.assign(variable, value.clone());

        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.assignment.len());
        debug_assert!(self.rooms_held_once());
        trace!(
            "{} = {}",
            self.graph.describe_variable(variable),
            self.graph.describe_value(value)
        );
        Attempt::Accepted
    }

    fn retract(&mut self, variable: Variable) {
        self.ledger.pop_frame();
        self.assignment.unassign(variable);
    }

    fn backtrack(&mut self, variable: Variable) {
        self.retract(variable);
        self.stats.backtracks += 1;
        debug!("Backtracking on {}", self.graph.describe_variable(variable));
    }

    fn unwind(&mut self, stack: &mut Vec<Frame>) {
        while let Some(frame) = stack.pop() {
            if frame.assigned {
                self.retract(frame.variable);
            }
        }
    }

    fn rooms_held_once(&self) -> bool {
        let mut seen = std::collections::BTreeSet::new();
        self.assignment
            .iter()
            .filter_map(|(_, value)| value.room())
            .all(|room| seen.insert(room))
    }
}

impl Frame {
    fn new(variable: Variable, candidates: Vec<Value>) -> Self {
        Self {
            variable,
            candidates,
            next: 0,
            assigned: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::verify_assignment;
    use crate::models::{GraphBuilder, Room, ScheduleUnit, Teacher, Timeslot};

    fn slot(day: &str) -> Timeslot {
        Timeslot::new(day, "10AM")
    }

    /// Three units on Monday, three rooms; only C seats Big.
    fn rooms_graph() -> ConstraintGraph {
        let mut b = GraphBuilder::new();
        let small = b.add_unit(ScheduleUnit::new("Small", 10).with_timeslot(slot("Monday")));
        let mid = b.add_unit(ScheduleUnit::new("Mid", 25).with_timeslot(slot("Monday")));
        let big = b.add_unit(ScheduleUnit::new("Big", 50).with_timeslot(slot("Monday")));
        let rooms: Vec<Value> = [("A", 20), ("B", 30), ("C", 60)]
            .into_iter()
            .map(|(n, c)| Value::Room(b.add_room(Room::new(n, c).with_availability(slot("Monday")))))
            .collect();
        for unit in [small, mid, big] {
            b.add_variable(Variable::Unit(unit), rooms.clone());
        }
        b.build().unwrap()
    }

    /// Two units competing for a single room.
    fn infeasible_graph() -> ConstraintGraph {
        let mut b = GraphBuilder::new();
        let x = b.add_unit(ScheduleUnit::new("X", 10).with_timeslot(slot("Monday")));
        let y = b.add_unit(ScheduleUnit::new("Y", 10).with_timeslot(slot("Monday")));
        let r = b.add_room(Room::new("A", 20).with_availability(slot("Monday")));
        b.add_variable(Variable::Unit(x), vec![Value::Room(r)]);
        b.add_variable(Variable::Unit(y), vec![Value::Room(r)]);
        b.build().unwrap()
    }

    fn solver(use_heuristics: bool, strategy: SearchStrategy) -> BacktrackingSolver {
        BacktrackingSolver::new(
            SolverConfig::default()
                .with_heuristics(use_heuristics)
                .with_strategy(strategy),
        )
    }

    #[test]
    fn test_solves_room_packing() {
        let g = rooms_graph();
        for flag in [false, true] {
            let outcome = solver(flag, SearchStrategy::Recursive).solve(&g);
            assert_eq!(outcome.status, SearchStatus::Solved);
            let assignment = outcome.assignment.as_ref().unwrap();
            assert!(verify_assignment(&g, assignment).is_empty());
            assert!(outcome
                .ledger
                .same_bookings(&OccupancyLedger::from_assignment(&g, assignment)));
            assert_eq!(outcome.ledger.depth(), 0);
        }
    }

    #[test]
    fn test_room_packing_without_backtracks() {
        let g = rooms_graph();
        let baseline = solver(false, SearchStrategy::Recursive).solve(&g);
        let guided = solver(true, SearchStrategy::Recursive).solve(&g);
        // Small takes A, Mid B, Big C in declared order
        assert_eq!(baseline.stats.backtracks, 0);
        assert_eq!(baseline.stats.nodes, 3);
        // MRV picks Big first (only C fits it)
        assert_eq!(guided.stats.backtracks, 0);
        assert_eq!(guided.stats.max_depth, 3);
    }

    #[test]
    fn test_baseline_backtracks_where_mrv_does_not() {
        // Small is declared first and room C first: the baseline hands C
        // to Small, strands Big, and has to undo it.
        let mut b = GraphBuilder::new();
        let small = b.add_unit(ScheduleUnit::new("Small", 10).with_timeslot(slot("Monday")));
        let big = b.add_unit(ScheduleUnit::new("Big", 50).with_timeslot(slot("Monday")));
        let c = b.add_room(Room::new("C", 60).with_availability(slot("Monday")));
        let a = b.add_room(Room::new("A", 20).with_availability(slot("Monday")));
        let rooms = vec![Value::Room(c), Value::Room(a)];
        b.add_variable(Variable::Unit(small), rooms.clone());
        b.add_variable(Variable::Unit(big), rooms);
        let g = b.build().unwrap();

        let baseline = solver(false, SearchStrategy::Recursive).solve(&g);
        let guided = solver(true, SearchStrategy::Recursive).solve(&g);
        assert_eq!(baseline.stats.backtracks, 1);
        assert_eq!(guided.stats.backtracks, 0);
        assert!(baseline.stats.backtracks > guided.stats.backtracks);
        assert_eq!(baseline.assignment, guided.assignment);
        assert_eq!(
            guided.assignment.unwrap().get(Variable::Unit(small)),
            Some(&Value::Room(a))
        );
    }

    #[test]
    fn test_infeasible_leaves_no_trace() {
        let g = infeasible_graph();
        for strategy in [SearchStrategy::Recursive, SearchStrategy::Iterative] {
            let outcome = solver(true, strategy).solve(&g);
            assert_eq!(outcome.status, SearchStatus::Infeasible);
            assert!(outcome.assignment.is_none());
            assert!(outcome.ledger.is_empty());
            assert_eq!(outcome.ledger.depth(), 0);
        }
    }

    #[test]
    fn test_drivers_agree() {
        for g in [rooms_graph(), infeasible_graph()] {
            for flag in [false, true] {
                let r = solver(flag, SearchStrategy::Recursive).solve(&g);
                let i = solver(flag, SearchStrategy::Iterative).solve(&g);
                assert_eq!(r.status, i.status);
                assert_eq!(r.assignment, i.assignment);
                assert_eq!(r.stats, i.stats);
            }
        }
    }

    #[test]
    fn test_empty_graph_is_trivially_solved() {
        let g = GraphBuilder::new().build().unwrap();
        for strategy in [SearchStrategy::Recursive, SearchStrategy::Iterative] {
            let outcome = solver(true, strategy).solve(&g);
            assert!(outcome.is_solved());
            assert_eq!(outcome.assignment.unwrap().len(), 0);
            assert_eq!(outcome.stats.nodes, 0);
        }
    }

    #[test]
    fn test_node_limit() {
        let g = rooms_graph();
        let config = SolverConfig::baseline().with_node_limit(1);
        let outcome = BacktrackingSolver::new(config).solve(&g);
        assert_eq!(outcome.status, SearchStatus::BudgetExhausted);
        assert!(outcome.assignment.is_none());
        assert!(outcome.ledger.is_empty());
        assert_eq!(outcome.stats.nodes, 1);
    }

    #[test]
    fn test_teacher_chain() {
        let mut b = GraphBuilder::new();
        let math = b.add_unit(ScheduleUnit::new("Math", 30).with_timeslot(slot("Monday")));
        let john = b.add_teacher(
            Teacher::new("John")
                .with_subject("Math")
                .with_availability(slot("Monday")),
        );
        let small = b.add_room(Room::new("Small", 10).with_availability(slot("Monday")));
        let large = b.add_room(Room::new("Large", 40).with_availability(slot("Monday")));
        b.add_variable(Variable::Unit(math), vec![Value::Teacher(john)]);
        b.add_variable(
            Variable::Teacher(john),
            vec![Value::Room(small), Value::Room(large)],
        );
        let g = b.build().unwrap();

        let outcome = solver(false, SearchStrategy::Iterative).solve(&g);
        let assignment = outcome.assignment.unwrap();
        assert_eq!(assignment.room_of(math), Some(large));
        assert_eq!(outcome.stats.consistency_checks, 3);
    }

    #[test]
    fn test_custom_heuristics() {
        use crate::heuristics::rules::{DeclaredOrder, MinimumRemainingValues};
        let g = rooms_graph();
        let s = BacktrackingSolver::default()
            .with_heuristics(Heuristics::new(MinimumRemainingValues, DeclaredOrder));
        assert_eq!(s.heuristics().orderer().name(), "DECLARED");
        assert!(s.solve(&g).is_solved());
    }
}
