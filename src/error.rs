//! Crate error type.
//!
//! Only configuration problems are errors. A search that finds no complete
//! assignment is a normal negative result, reported as `None` by
//! [`crate::search::solve`] and as [`crate::search::SearchStatus::Infeasible`]
//! by the solver.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before any search state exists.
#[derive(Debug, Error)]
pub enum Error {
    /// The constraint graph failed validation. Carries every detected issue.
    #[error("invalid constraint graph: {}", summarize(.0))]
    InvalidGraph(Vec<ValidationError>),

    /// A timeslot key could not be split into day and time.
    #[error("invalid timeslot key '{0}': expected DAY_TIME")]
    InvalidTimeslot(String),

    /// A problem description references an entity that was never declared.
    #[error("problem references unknown {kind} '{name}'")]
    UnknownName {
        /// Entity kind ("teacher", "room").
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// Reading a problem file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A problem file is not valid JSON for [`crate::problem::ProblemSpec`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_graph_message() {
        let err = Error::InvalidGraph(vec![
            ValidationError::new(ValidationErrorKind::EmptyDomain, "Variable unit:Math has an empty domain"),
            ValidationError::new(ValidationErrorKind::UnknownNeighbor, "x"),
        ]);
        let text = err.to_string();
        assert!(text.contains("unit:Math has an empty domain"));
        assert!(text.contains("1 more"));
    }

    #[test]
    fn test_invalid_timeslot_message() {
        let err = Error::InvalidTimeslot("Monday".into());
        assert_eq!(err.to_string(), "invalid timeslot key 'Monday': expected DAY_TIME");
    }
}
