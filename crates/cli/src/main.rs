//! wmv: bounded weak-memory verification of ring-buffer traces.
//!
//! Usage:
//!   wmv verify <scenario>|all    run built-in scenarios
//!   wmv list                     list built-in scenarios
//!
//! Environment:
//!   WMV_SOLVER=z3|cvc5    pick the solver backend (default: auto-detect)
//!   WMV_TIMEOUT_MS=N      per-call solver timeout (default: 30000)
//!   RUST_LOG=wmv=debug    encoding and solving diagnostics

mod output;
mod scenarios;

use std::process::ExitCode;

use colored::Colorize;
use wmv_model::Verdict;
use wmv_solver::{CliSolver, SolverConfig, SolverKind};

use crate::output::{ScenarioResult, ScenarioStatus};
use crate::scenarios::{Expected, Scenario};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wmv=info".parse().expect("static directive parses")),
        )
        .with_target(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("list") => {
            list_scenarios();
            ExitCode::SUCCESS
        }
        Some("verify") => {
            let selection = args.get(1).map(String::as_str).unwrap_or("all");
            run_verify(selection)
        }
        _ => {
            eprintln!("usage: wmv verify <scenario>|all");
            eprintln!("       wmv list");
            ExitCode::FAILURE
        }
    }
}

fn list_scenarios() {
    println!("Built-in scenarios:");
    for s in scenarios::all() {
        let expected = match s.expected {
            Expected::Verified => "verified",
            Expected::Counterexample => "counterexample",
        };
        println!("  {:<14} {:<50} expect: {}", s.id, s.summary, expected);
    }
}

fn make_solver() -> Result<CliSolver, wmv_solver::SolverError> {
    let config = match std::env::var("WMV_SOLVER") {
        Ok(name) => {
            let kind: SolverKind = name
                .parse()
                .map_err(wmv_solver::SolverError::Process)?;
            SolverConfig::auto_detect_for(kind)?
        }
        Err(_) => SolverConfig::auto_detect()?,
    };
    let timeout_ms = std::env::var("WMV_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    Ok(CliSolver::new(config.with_timeout(timeout_ms)))
}

fn run_verify(selection: &str) -> ExitCode {
    let solver = match make_solver() {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::from(2);
        }
    };

    let selected: Vec<Scenario> = if selection == "all" {
        scenarios::all()
    } else {
        match scenarios::find(selection) {
            Some(s) => vec![s],
            None => {
                eprintln!(
                    "{} unknown scenario '{selection}' (try `wmv list`)",
                    "error:".red().bold()
                );
                return ExitCode::FAILURE;
            }
        }
    };

    println!(
        "{}",
        format!(
            "Checking {} scenario(s) with {}",
            selected.len(),
            solver.config().kind
        )
        .bold()
    );
    println!();

    let mut results = Vec::new();
    for scenario in &selected {
        let result = run_scenario(scenario, &solver);
        output::print_result(&result);
        results.push(result);
    }

    ExitCode::from(output::print_summary(&results))
}

fn run_scenario(scenario: &Scenario, solver: &CliSolver) -> ScenarioResult {
    match scenario.run(solver) {
        Ok(Verdict::Unsat) => ScenarioResult {
            id: scenario.id.to_string(),
            status: if scenario.expected == Expected::Verified {
                ScenarioStatus::Ok
            } else {
                ScenarioStatus::Mismatch
            },
            verdict_line: "verified (no admissible execution)".to_string(),
            witness: None,
        },
        Ok(Verdict::Sat(witness)) => ScenarioResult {
            id: scenario.id.to_string(),
            status: if scenario.expected == Expected::Counterexample {
                ScenarioStatus::Ok
            } else {
                ScenarioStatus::Mismatch
            },
            verdict_line: "counterexample".to_string(),
            witness: Some(witness.render()),
        },
        Ok(Verdict::Unknown(reason)) => ScenarioResult {
            id: scenario.id.to_string(),
            status: ScenarioStatus::Unknown,
            verdict_line: format!("solver gave up ({reason})"),
            witness: None,
        },
        Err(e) => ScenarioResult {
            id: scenario.id.to_string(),
            status: ScenarioStatus::Unknown,
            verdict_line: format!("solver gave up ({e})"),
            witness: None,
        },
    }
}
