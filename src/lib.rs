//! Multi-period, multi-facility supply-planning MILP formulation engine.
//!
//! This library formulates production, inventory, distribution and workforce
//! planning problems as mixed-integer linear programs and runs them across
//! named scenarios for comparison.
//!
//! # Pipeline
//!
//! Every scenario rebuilds the whole pipeline from its own config; nothing
//! is shared between entries of a batch:
//!
//! 1. **[`catalog`]**: registries of facilities, products and ordered periods
//! 2. **[`model::VariableRegistry`]**: the decision-variable space
//!    (production, setup, inventory, backlog, transport, workforce,
//!    overtime, hire/fire), with typed domains
//! 3. **[`model::ConstraintBuilder`]** and **[`model::ObjectiveAssembler`]**:
//!    the coupled constraint system and the minimized total-cost expression
//! 4. **[`lp::MilpSolver`]**: the solver boundary (CBC bundled behind the
//!    `coin_cbc` feature)
//! 5. **[`extract`]**: projection of a valuation into per-domain records
//! 6. **[`runner`]**: parallel batch execution keyed by scenario name
//!
//! # Usage Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use std::path::Path;
//! use supplyplan::{load_scenarios, lp::default_solver, run_scenarios};
//!
//! let scenarios = load_scenarios(Path::new("scenarios.json"))?;
//! let solver = default_solver()?;
//! let outcomes = run_scenarios(&scenarios, solver.as_ref())?;
//!
//! for (name, outcome) in &outcomes {
//!     println!("{}: {}", name, outcome.status);
//! }
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use std::{error::Error, fmt};

pub mod catalog;
pub mod extract;
pub mod lp;
pub mod model;
pub mod run;
pub mod runner;
pub mod scenario;

pub use catalog::{Catalog, Period, SkillClass};
pub use extract::{PlanResults, extract_results};
pub use model::PlanModel;
pub use run::{CheckArgs, RunArgs, check_main, run_main};
pub use runner::{ScenarioOutcome, run_scenario, run_scenarios};
pub use scenario::{ScenarioConfig, load_scenarios};

/// Engine errors whose kind matters beyond the message text.
///
/// Build-time failures (`UndeclaredVariable`, `MissingParameter`) are fatal
/// to the scenario being built but leave the rest of a batch untouched;
/// `SolverUnavailable` aborts the whole batch.
#[derive(Debug, PartialEq, Eq)]
pub enum PlanError {
    /// A variable key was looked up that was never declared.
    UndeclaredVariable(String),
    /// A required scenario input is absent for a declared dimension.
    MissingParameter(String),
    /// No usable solver backend could be constructed.
    SolverUnavailable(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::UndeclaredVariable(key) => write!(f, "undeclared variable: {key}"),
            PlanError::MissingParameter(key) => write!(f, "missing required parameter: {key}"),
            PlanError::SolverUnavailable(reason) => write!(f, "solver unavailable: {reason}"),
        }
    }
}

impl Error for PlanError {}

/// Command-line interface arguments for the supply-planning tools.
#[derive(Debug, Parser)]
#[clap(
    name = "supplyplan",
    about = "Multi-scenario supply-planning MILP formulation and comparison"
)]
pub enum CLIArguments {
    /// Solve every scenario in a batch file and compare the outcomes.
    Run(RunArgs),
    /// Build the scenario models without solving and report their sizes.
    Check(CheckArgs),
}
