//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Which driver runs the backtracking search.
///
/// Both drivers explore the same tree in the same order and return the
/// same result; the iterative one keeps its frames on the heap instead of
/// the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Recursive below `recursion_limit` variables, iterative above.
    #[default]
    Auto,
    /// Always recurse.
    Recursive,
    /// Always use an explicit stack.
    Iterative,
}

/// Backtracking solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// MRV + LCV when `true`, static order + declared order otherwise.
    pub use_heuristics: bool,
    /// Search driver.
    pub strategy: SearchStrategy,
    /// Variable count above which `Auto` switches to the iterative driver.
    pub recursion_limit: usize,
    /// Maximum number of accepted assignments before giving up.
    /// `None` = unlimited.
    pub node_limit: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            use_heuristics: true,
            strategy: SearchStrategy::Auto,
            recursion_limit: 256,
            node_limit: None,
        }
    }
}

impl SolverConfig {
    /// Static order, declared value order.
    pub fn baseline() -> Self {
        Self {
            use_heuristics: false,
            ..Default::default()
        }
    }

    /// MRV + LCV.
    pub fn heuristic() -> Self {
        Self::default()
    }

    /// Sets the heuristics flag.
    pub fn with_heuristics(mut self, use_heuristics: bool) -> Self {
        self.use_heuristics = use_heuristics;
        self
    }

    /// Sets the driver.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the `Auto` threshold.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Sets the node budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Concrete driver for a graph with `variable_count` variables.
    ///
    /// Never returns `Auto`.
    pub fn resolve_strategy(&self, variable_count: usize) -> SearchStrategy {
        match self.strategy {
            SearchStrategy::Auto if variable_count > self.recursion_limit => {
                SearchStrategy::Iterative
            }
            SearchStrategy::Auto => SearchStrategy::Recursive,
            other => other,
        }
    }
}
