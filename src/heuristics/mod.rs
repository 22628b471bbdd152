//! Variable-selection and value-ordering policies for backtracking search.
//!
//! Two seams, each a small trait:
//!
//! - [`VariableSelector`]: which unassigned variable to branch on next
//! - [`ValueOrderer`]: in which order to try that variable's candidates
//!
//! Built-in policies live in [`rules`]: the static baseline
//! ([`rules::StaticOrder`], [`rules::DeclaredOrder`]) and the classic pair
//! MRV + LCV ([`rules::MinimumRemainingValues`],
//! [`rules::LeastConstrainingValue`]). Every policy is deterministic and
//! breaks ties by graph order, so a fixed graph always produces the same
//! search tree.
//!
//! # Usage
//!
//! ```
//! use u_timetable::heuristics::Heuristics;
//!
//! let baseline = Heuristics::baseline();
//! let guided = Heuristics::mrv_lcv();
//! assert_eq!(baseline.selector().name(), "STATIC");
//! assert_eq!(guided.orderer().name(), "LCV");
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6.3
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

pub mod rules;

use std::fmt::Debug;
use std::sync::Arc;

use crate::ledger::OccupancyLedger;
use crate::models::{Assignment, ConstraintGraph, Value};

/// Read-only view of the search state handed to policies.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// Problem instance.
    pub graph: &'a ConstraintGraph,
    /// Current partial assignment.
    pub assignment: &'a Assignment,
    /// Current occupancy.
    pub ledger: &'a OccupancyLedger,
}

impl<'a> SearchContext<'a> {
    /// Creates a context.
    pub fn new(
        graph: &'a ConstraintGraph,
        assignment: &'a Assignment,
        ledger: &'a OccupancyLedger,
    ) -> Self {
        Self {
            graph,
            assignment,
            ledger,
        }
    }

    /// Graph positions of unassigned variables, in graph order.
    pub fn unassigned(&self) -> impl Iterator<Item = usize> + 'a {
        let graph = self.graph;
        let assignment = self.assignment;
        graph
            .entries()
            .iter()
            .enumerate()
            .filter(move |(_, e)| !assignment.is_assigned(e.variable))
            .map(|(i, _)| i)
    }
}

/// Picks the next variable to branch on.
pub trait VariableSelector: Send + Sync + Debug {
    /// Policy name (e.g. "MRV").
    fn name(&self) -> &'static str;

    /// Graph position of the chosen unassigned variable, or `None` when
    /// every variable is assigned.
    fn select(&self, context: &SearchContext<'_>) -> Option<usize>;
}

/// Orders the candidates of a variable.
pub trait ValueOrderer: Send + Sync + Debug {
    /// Policy name (e.g. "LCV").
    fn name(&self) -> &'static str;

    /// Candidates of the variable at `position`, in the order to try them.
    ///
    /// Must return a permutation of the variable's domain.
    fn order(&self, position: usize, context: &SearchContext<'_>) -> Vec<Value>;
}

/// A selector/orderer pair.
#[derive(Debug, Clone)]
pub struct Heuristics {
    selector: Arc<dyn VariableSelector>,
    orderer: Arc<dyn ValueOrderer>,
}

impl Heuristics {
    /// Combines two policies.
    pub fn new<S, O>(selector: S, orderer: O) -> Self
    where
        S: VariableSelector + 'static,
        O: ValueOrderer + 'static,
    {
        Self {
            selector: Arc::new(selector),
            orderer: Arc::new(orderer),
        }
    }

    /// Static variable order, declared value order.
    pub fn baseline() -> Self {
        Self::new(rules::StaticOrder, rules::DeclaredOrder)
    }

    /// Minimum remaining values + least constraining value.
    pub fn mrv_lcv() -> Self {
        Self::new(rules::MinimumRemainingValues, rules::LeastConstrainingValue)
    }

    /// [`mrv_lcv`](Self::mrv_lcv) when `use_heuristics`, else
    /// [`baseline`](Self::baseline).
    pub fn from_flag(use_heuristics: bool) -> Self {
        if use_heuristics {
            Self::mrv_lcv()
        } else {
            Self::baseline()
        }
    }

    /// The variable selector.
    pub fn selector(&self) -> &dyn VariableSelector {
        self.selector.as_ref()
    }

    /// The value orderer.
    pub fn orderer(&self) -> &dyn ValueOrderer {
        self.orderer.as_ref()
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::mrv_lcv()
    }
}
