//! Input validation for constraint graphs.
//!
//! Checks structural integrity of a graph before any search state is
//! created. Detects:
//! - Duplicate entity names and duplicate variables
//! - Variables and domain values referring to missing entities
//! - Values of a kind the variable cannot take
//! - Empty domains
//! - Neighbor links to variables absent from the graph
//! - Timeslots whose key does not parse back to the same slot
//!
//! Every issue is reported, not just the first one. A graph that passes
//! validation can still be infeasible; that is a search result, not an
//! error.

use std::collections::HashSet;

use crate::models::{GraphBuilder, Value, Variable};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share a name.
    DuplicateName,
    /// A variable is declared twice.
    DuplicateVariable,
    /// A variable refers to an entity that was never registered.
    UnknownEntity,
    /// A domain value refers to an entity that was never registered.
    UnknownValue,
    /// A domain value has a kind the variable cannot take.
    InvalidValueKind,
    /// A variable has no candidate values.
    EmptyDomain,
    /// A neighbor link references a variable absent from the graph.
    UnknownNeighbor,
    /// A timeslot has an empty label or a `_` in its day.
    InvalidTimeslot,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a graph under construction.
///
/// Checks:
/// 1. Unit, teacher and room names are unique within their kind
/// 2. Every variable refers to a registered entity and is declared once
/// 3. Every domain is non-empty
/// 4. Every domain value refers to a registered entity
/// 5. Every domain value has a kind the variable accepts
/// 6. Every explicit neighbor link joins two declared variables
/// 7. Every timeslot (unit slots, availability, domain values) is canonical
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_graph(builder: &GraphBuilder) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique_names("unit", builder.units.iter().map(|u| u.name.as_str()), &mut errors);
    check_unique_names(
        "teacher",
        builder.teachers.iter().map(|t| t.name.as_str()),
        &mut errors,
    );
    check_unique_names("room", builder.rooms.iter().map(|r| r.name.as_str()), &mut errors);

    check_timeslots(builder, &mut errors);

    let mut declared = HashSet::new();
    for (variable, domain) in &builder.variables {
        let label = label(builder, *variable);

        if !variable_exists(builder, *variable) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEntity,
                format!("Variable {label} refers to an unregistered entity"),
            ));
        }

        if !declared.insert(*variable) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateVariable,
                format!("Variable {label} is declared more than once"),
            ));
        }

        if domain.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyDomain,
                format!("Variable {label} has an empty domain"),
            ));
        }

        for value in domain {
            if !value_exists(builder, value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownValue,
                    format!("Variable {label} lists an unregistered value {value:?}"),
                ));
            }
            if !variable.accepts(value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValueKind,
                    format!("Variable {label} cannot take value {value:?}"),
                ));
            }
        }
    }

    for (a, b) in &builder.links {
        for end in [a, b] {
            if !declared.contains(end) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownNeighbor,
                    format!(
                        "Neighbor link {} - {} references undeclared variable {}",
                        label(builder, *a),
                        label(builder, *b),
                        label(builder, *end)
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique_names<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate {kind} name: {name}"),
            ));
        }
    }
}

fn check_timeslots(builder: &GraphBuilder, errors: &mut Vec<ValidationError>) {
    let owned = builder
        .units
        .iter()
        .flat_map(|u| u.timeslots.iter().map(move |s| (format!("unit:{}", u.name), s)))
        .chain(builder.teachers.iter().flat_map(|t| {
            t.available_timeslots
                .iter()
                .map(move |s| (format!("teacher:{}", t.name), s))
        }))
        .chain(builder.rooms.iter().flat_map(|r| {
            r.available_timeslots
                .iter()
                .map(move |s| (format!("room:{}", r.name), s))
        }));
    let values = builder.variables.iter().flat_map(|(variable, domain)| {
        domain.iter().filter_map(move |value| match value {
            Value::Timeslot(s) => Some((label(builder, *variable), s)),
            _ => None,
        })
    });

    for (owner, slot) in owned.chain(values) {
        if !slot.is_canonical() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeslot,
                format!(
                    "{owner} uses timeslot {slot:?} whose key '{}' is ambiguous",
                    slot.key()
                ),
            ));
        }
    }
}

fn variable_exists(builder: &GraphBuilder, variable: Variable) -> bool {
    match variable {
        Variable::Unit(id) => id.0 < builder.units.len(),
        Variable::Teacher(id) => id.0 < builder.teachers.len(),
        Variable::Room(id) => id.0 < builder.rooms.len(),
    }
}

fn value_exists(builder: &GraphBuilder, value: &Value) -> bool {
    match value {
        Value::Teacher(id) => id.0 < builder.teachers.len(),
        Value::Room(id) => id.0 < builder.rooms.len(),
        Value::Timeslot(_) => true,
    }
}

/// Labels a variable by name when it resolves, by index otherwise.
fn label(builder: &GraphBuilder, variable: Variable) -> String {
    let name = match variable {
        Variable::Unit(id) => builder.units.get(id.0).map(|u| u.name.as_str()),
        Variable::Teacher(id) => builder.teachers.get(id.0).map(|t| t.name.as_str()),
        Variable::Room(id) => builder.rooms.get(id.0).map(|r| r.name.as_str()),
    };
    match name {
        Some(name) => format!("{}:{}", variable.kind(), name),
        None => match variable {
            Variable::Unit(id) => format!("unit#{}", id.0),
            Variable::Teacher(id) => format!("teacher#{}", id.0),
            Variable::Room(id) => format!("room#{}", id.0),
        },
    }
}
