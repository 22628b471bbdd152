//! Search properties on generated instances.

use proptest::prelude::*;

use u_timetable::constraints::verify_assignment;
use u_timetable::generator::{GeneratorConfig, InstanceGenerator};
use u_timetable::ledger::OccupancyLedger;
use u_timetable::models::{Assignment, ConstraintGraph, RoomId, TeacherId, Timeslot, Value, Variable};
use u_timetable::problem::ProblemSpec;
use u_timetable::search::{solve, BacktrackingSolver, SearchStatus, SearchStrategy, SolverConfig};

fn generate(config: GeneratorConfig, seed: u64) -> ConstraintGraph {
    InstanceGenerator::new(config, seed).generate_graph().unwrap()
}

/// Whether any complete assignment passes the checker.
fn brute_force_solvable(graph: &ConstraintGraph) -> bool {
    fn extend(graph: &ConstraintGraph, position: usize, assignment: &mut Assignment) -> bool {
        if position == graph.variable_count() {
            return verify_assignment(graph, assignment).is_empty();
        }
        let entry = graph.entry(position);
        for value in &entry.domain {
            assignment.assign(entry.variable, value.clone());
            if extend(graph, position + 1, assignment) {
                return true;
            }
        }
        assignment.unassign(entry.variable);
        false
    }
    extend(graph, 0, &mut Assignment::new())
}

fn tiny(availability: f64) -> GeneratorConfig {
    GeneratorConfig {
        availability,
        ..GeneratorConfig::tiny()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_solutions_pass_checker(seed in any::<u64>(), availability in 0.4..1.0f64) {
        let config = GeneratorConfig { availability, ..GeneratorConfig::small() };
        let graph = generate(config, seed);
        for flag in [false, true] {
            if let Some(assignment) = solve(&graph, flag) {
                prop_assert!(assignment.is_complete(&graph));
                let violations = verify_assignment(&graph, &assignment);
                prop_assert!(violations.is_empty(), "{:?}", violations);
            }
        }
    }

    #[test]
    fn prop_complete_on_tiny_instances(seed in any::<u64>(), availability in 0.3..1.0f64) {
        let graph = generate(tiny(availability), seed);
        prop_assert!(graph.variable_count() <= 4);
        let expected = brute_force_solvable(&graph);
        prop_assert_eq!(solve(&graph, true).is_some(), expected);
        prop_assert_eq!(solve(&graph, false).is_some(), expected);
    }

    #[test]
    fn prop_complete_on_mixed_instances(seed in any::<u64>(), availability in 0.2..1.0f64) {
        let config = GeneratorConfig { availability, ..GeneratorConfig::tiny_mixed() };
        let graph = generate(config, seed);
        prop_assert_eq!(graph.variable_count(), 4);
        let expected = brute_force_solvable(&graph);
        for flag in [false, true] {
            let found = solve(&graph, flag);
            prop_assert_eq!(found.is_some(), expected);
            if let Some(assignment) = found {
                prop_assert!(verify_assignment(&graph, &assignment).is_empty());
            }
        }
    }

    #[test]
    fn prop_ledger_matches_outcome(seed in any::<u64>(), availability in 0.4..1.0f64) {
        let config = GeneratorConfig { availability, ..GeneratorConfig::small() };
        let graph = generate(config, seed);
        let outcome = BacktrackingSolver::default().solve(&graph);
        prop_assert_eq!(outcome.ledger.depth(), 0);
        match &outcome.assignment {
            Some(assignment) => {
                let implied = OccupancyLedger::from_assignment(&graph, assignment);
                prop_assert!(outcome.ledger.same_bookings(&implied));
            }
            None => prop_assert!(outcome.ledger.is_empty()),
        }
    }

    #[test]
    fn prop_drivers_agree(seed in any::<u64>(), flag in any::<bool>()) {
        let graph = generate(GeneratorConfig::small(), seed);
        let config = SolverConfig::default().with_heuristics(flag);
        let recursive = BacktrackingSolver::new(config.clone().with_strategy(SearchStrategy::Recursive))
            .solve(&graph);
        let iterative = BacktrackingSolver::new(config.with_strategy(SearchStrategy::Iterative))
            .solve(&graph);
        prop_assert_eq!(recursive.status, iterative.status);
        prop_assert_eq!(recursive.assignment, iterative.assignment);
        prop_assert_eq!(recursive.stats, iterative.stats);
    }

    #[test]
    fn prop_deterministic(seed in any::<u64>()) {
        let graph = generate(GeneratorConfig::small(), seed);
        prop_assert_eq!(solve(&graph, true), solve(&graph, true));
        prop_assert_eq!(solve(&graph, false), solve(&graph, false));
    }

    #[test]
    fn prop_budget_is_respected(seed in any::<u64>(), limit in 0u64..6) {
        let graph = generate(GeneratorConfig::small(), seed);
        let outcome = BacktrackingSolver::new(SolverConfig::default().with_node_limit(limit))
            .solve(&graph);
        prop_assert!(outcome.stats.nodes <= limit);
        if outcome.status == SearchStatus::BudgetExhausted {
            prop_assert!(outcome.assignment.is_none());
            prop_assert!(outcome.ledger.is_empty());
        }
    }
}

#[test]
fn test_medium_instances_are_sound() {
    for seed in 0..3 {
        let graph = generate(GeneratorConfig::medium(), seed);
        let outcome = BacktrackingSolver::new(SolverConfig::default().with_node_limit(20_000))
            .solve(&graph);
        if let Some(assignment) = &outcome.assignment {
            assert!(verify_assignment(&graph, assignment).is_empty());
        }
    }
}

fn mixed_spec(room_a_slots: &str) -> ProblemSpec {
    let json = format!(
        r#"{{
            "units": [{{ "name": "Art", "subject": "Art", "capacity": 10, "timeslots": ["Monday_9AM"],
                        "teachers": ["Kim"], "slot_candidates": ["Monday_10AM", "Monday_9AM"] }}],
            "teachers": [{{ "name": "Kim", "subjects": ["Art"], "availability": ["Monday_9AM"], "rooms": [],
                           "slot_candidates": ["Monday_10AM", "Monday_9AM"] }}],
            "rooms": [{{ "name": "A", "capacity": 20, "availability": ["Monday_9AM"],
                        "slot_candidates": {room_a_slots} }},
                      {{ "name": "B", "capacity": 20, "availability": ["Monday_9AM"],
                        "slot_candidates": ["Monday_10AM", "Monday_9AM"] }}]
        }}"#
    );
    ProblemSpec::from_json(&json).unwrap()
}

#[test]
fn test_teacher_and_room_variables_take_available_slots() {
    let graph = mixed_spec(r#"["Monday_9AM"]"#).to_graph().unwrap();
    assert!(brute_force_solvable(&graph));
    let nine = Value::Timeslot(Timeslot::new("Monday", "9AM"));
    for flag in [false, true] {
        let assignment = solve(&graph, flag).unwrap();
        assert!(verify_assignment(&graph, &assignment).is_empty());
        assert_eq!(assignment.get(Variable::Teacher(TeacherId(0))), Some(&nine));
        assert_eq!(assignment.get(Variable::Room(RoomId(0))), Some(&nine));
        assert_eq!(assignment.get(Variable::Room(RoomId(1))), Some(&nine));
    }
}

#[test]
fn test_room_variable_without_available_slot_is_infeasible() {
    let graph = mixed_spec(r#"["Monday_10AM"]"#).to_graph().unwrap();
    assert!(!brute_force_solvable(&graph));
    assert_eq!(solve(&graph, false), None);
    assert_eq!(solve(&graph, true), None);
}
