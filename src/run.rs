//! CLI entry points: batch solving with a comparison report, and a dry-run
//! model check.

use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use prettytable::*;

use crate::{
    load_scenarios,
    lp::default_solver,
    model,
    runner::{ScenarioOutcome, run_scenarios},
};

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario batch file (JSON, keyed by scenario name)
    input: PathBuf,

    /// Write the full outcomes as JSON to this file
    #[clap(long)]
    json: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Scenario batch file (JSON, keyed by scenario name)
    input: PathBuf,
}

fn total_backlog(outcome: &ScenarioOutcome) -> Option<f64> {
    let results = outcome.results.as_ref()?;
    Some(results.inventory.iter().map(|r| r.backlog).sum())
}

fn total_production(outcome: &ScenarioOutcome) -> Option<f64> {
    let results = outcome.results.as_ref()?;
    Some(results.production.iter().map(|r| r.quantity).sum())
}

fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

pub fn run_main(args: RunArgs) -> Result<()> {
    let RunArgs { input, json } = args;

    let scenarios = load_scenarios(&input)?;
    let solver = default_solver()?;
    let outcomes = run_scenarios(&scenarios, solver.as_ref())?;

    let mut table = Table::new();
    table.set_titles(row![
        "Scenario",
        "Status",
        "Total cost",
        "Total production",
        "Total backlog",
    ]);
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    for (name, outcome) in &outcomes {
        table.add_row(row![
            name,
            format!("{}", outcome.status),
            format_opt(outcome.objective),
            format_opt(total_production(outcome)),
            format_opt(total_backlog(outcome)),
        ]);
    }
    table.printstd();

    for (name, outcome) in &outcomes {
        if let Some(message) = &outcome.message {
            eprintln!("{name}: {message}");
        }
    }

    if let Some(filename) = json {
        fs::write(filename, serde_json::to_string_pretty(&outcomes)?)?;
    }

    Ok(())
}

pub fn check_main(args: CheckArgs) -> Result<()> {
    let CheckArgs { input } = args;

    let scenarios = load_scenarios(&input)?;

    let mut table = Table::new();
    table.set_titles(row!["Scenario", "Variables", "Binaries", "Constraints"]);
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let mut failures = Vec::new();
    for (name, config) in &scenarios {
        match model::build(config) {
            Ok(model) => {
                table.add_row(row![
                    name,
                    model.milp.num_variables(),
                    model.milp.num_binary_variables(),
                    model.milp.num_constraints(),
                ]);
            }
            Err(error) => {
                table.add_row(row![name, "-", "-", "-"]);
                failures.push((name, error));
            }
        }
    }
    table.printstd();

    for (name, error) in failures {
        eprintln!("{name}: {error}");
    }

    Ok(())
}
