use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use serde::Serialize;

use u_timetable::constraints::verify_assignment;
use u_timetable::models::{ConstraintGraph, Timetable};
use u_timetable::problem::{sample_spec, ProblemSpec};
use u_timetable::search::{BacktrackingSolver, SearchOutcome, SearchStats, SearchStatus, SolverConfig};

#[derive(Parser, Debug)]
#[command(name = "u-timetable")]
#[command(about = "Solve a class timetabling problem with backtracking search")]
struct Args {
    /// Problem file (JSON). Defaults to the built-in Math/Physics sample
    #[arg(long, value_name = "FILE")]
    problem: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Skip the run without heuristics
    #[arg(long)]
    no_baseline: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct RunReport {
    heuristics: bool,
    status: SearchStatus,
    elapsed_ms: f64,
    stats: SearchStats,
}

#[derive(Serialize)]
struct Report {
    runs: Vec<RunReport>,
    timetable: Timetable,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(args: &Args) -> Result<ProblemSpec> {
    match &args.problem {
        Some(path) => ProblemSpec::from_file(path)
            .with_context(|| format!("failed to load problem {}", path.display())),
        None => Ok(sample_spec()),
    }
}

fn timed(graph: &ConstraintGraph, config: SolverConfig) -> (SearchOutcome, Duration) {
    let start = Instant::now();
    let outcome = BacktrackingSolver::new(config).solve(graph);
    (outcome, start.elapsed())
}

/// Returns whether a solution was found.
fn run(args: &Args) -> Result<bool> {
    let spec = load(args)?;
    let graph = spec.to_graph().context("failed to build constraint graph")?;
    let base = spec.solver_config();
    info!(
        "Loaded {} units, {} teachers, {} rooms",
        graph.units().len(),
        graph.teachers().len(),
        graph.rooms().len()
    );

    let mut runs = Vec::new();
    if !args.no_baseline {
        let (outcome, elapsed) = timed(&graph, base.clone().with_heuristics(false));
        runs.push(report(false, &outcome, elapsed));
    }
    let (outcome, elapsed) = timed(&graph, base.with_heuristics(true));
    runs.push(report(true, &outcome, elapsed));

    if let Some(assignment) = &outcome.assignment {
        for violation in verify_assignment(&graph, assignment) {
            warn!("Solution check failed: {violation}");
        }
    }

    let timetable = Timetable::new(&graph, outcome.assignment.as_ref());
    if args.json {
        let report = Report { runs, timetable };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Results");
        println!("Schedule Visualization");
        println!();
        print!("{timetable}");
        println!();
        for run in &runs {
            println!(
                "{:<20} {:>10.3} ms  {:?}  nodes={} backtracks={}",
                if run.heuristics { "With heuristics" } else { "Without heuristics" },
                run.elapsed_ms,
                run.status,
                run.stats.nodes,
                run.stats.backtracks
            );
        }
    }

    Ok(outcome.is_solved())
}

fn report(heuristics: bool, outcome: &SearchOutcome, elapsed: Duration) -> RunReport {
    RunReport {
        heuristics,
        status: outcome.status,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        stats: outcome.stats,
    }
}
