//! Class timetabling as a constraint satisfaction problem.
//!
//! Schedule units (classes) are paired with teachers and rooms through a
//! constraint graph; a backtracking search finds a complete assignment
//! that respects availability, qualification, capacity, room features and
//! room/teacher occupancy.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Timeslot`, `ScheduleUnit`, `Teacher`,
//!   `Room`, `Variable`, `Value`, `ConstraintGraph`, `Assignment`, `Timetable`
//! - **`validation`**: Input integrity checks (duplicate names, domain kinds,
//!   dangling references)
//! - **`constraints`**: Consistency of one candidate assignment, and a
//!   from-scratch solution checker
//! - **`ledger`**: Which resource is booked at which timeslot, with
//!   frame-based undo
//! - **`heuristics`**: Variable selection (static, MRV) and value ordering
//!   (declared, LCV)
//! - **`search`**: The backtracking solver
//! - **`problem`**: Name-based JSON problem descriptions and built-in samples
//! - **`generator`**: Seeded random instances
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Timetable, UnitId};
//! use u_timetable::problem::feasible_sample_spec;
//! use u_timetable::search::solve;
//!
//! let graph = feasible_sample_spec().to_graph().unwrap();
//! let assignment = solve(&graph, true).unwrap();
//! let physics = UnitId(1);
//! assert_eq!(graph.room(assignment.room_of(physics).unwrap()).name, "B");
//! println!("{}", Timetable::new(&graph, Some(&assignment)));
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod constraints;
pub mod error;
pub mod generator;
pub mod heuristics;
pub mod ledger;
pub mod models;
pub mod problem;
pub mod search;
pub mod validation;

pub use error::{Error, Result};
