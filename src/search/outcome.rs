//! Search results and counters.

use serde::{Deserialize, Serialize};

use crate::ledger::OccupancyLedger;
use crate::models::Assignment;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// A complete consistent assignment was found.
    Solved,
    /// Every branch was explored; no solution exists under the domains.
    Infeasible,
    /// The node budget ran out before the search concluded.
    BudgetExhausted,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Accepted assignments (search tree nodes below the root).
    pub nodes: u64,
    /// Assignments undone after their subtree failed.
    pub backtracks: u64,
    /// Candidate values evaluated by the engine loop.
    pub consistency_checks: u64,
    /// Largest assignment size reached.
    pub max_depth: usize,
}

/// Result of [`crate::search::BacktrackingSolver::solve`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Final status.
    pub status: SearchStatus,
    /// The solution, present iff `status` is `Solved`.
    pub assignment: Option<Assignment>,
    /// Final occupancy: the bookings implied by the solution, or empty.
    pub ledger: OccupancyLedger,
    /// Search counters.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }

    /// Consumes the outcome, returning the solution if any.
    pub fn into_assignment(self) -> Option<Assignment> {
        self.assignment
    }
}
