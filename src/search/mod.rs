//! Backtracking search over a [`ConstraintGraph`].
//!
//! - [`SolverConfig`]: heuristics flag, driver and node budget
//! - [`BacktrackingSolver`]: the search engine
//! - [`SearchOutcome`]: status, solution, final ledger and counters
//! - [`solve`]: one-call entry point returning only the solution

mod config;
mod engine;
mod outcome;

pub use config::{SearchStrategy, SolverConfig};
pub use engine::BacktrackingSolver;
pub use outcome::{SearchOutcome, SearchStats, SearchStatus};

use crate::models::{Assignment, ConstraintGraph};

/// Solves `graph`, with MRV + LCV when `use_heuristics`, else the static
/// baseline. Returns `None` when no consistent complete assignment exists.
///
/// # Example
///
/// ```
/// use u_timetable::problem::feasible_sample_spec;
/// use u_timetable::search::solve;
///
/// let graph = feasible_sample_spec().to_graph().unwrap();
/// assert_eq!(solve(&graph, true), solve(&graph, false));
/// ```
pub fn solve(graph: &ConstraintGraph, use_heuristics: bool) -> Option<Assignment> {
    BacktrackingSolver::new(SolverConfig::default().with_heuristics(use_heuristics))
        .solve(graph)
        .into_assignment()
}
