//! Multi-scenario orchestration.
//!
//! Each named scenario gets a freshly built pipeline: catalog, variable
//! registry, constraints and objective are reconstructed from its config
//! alone, so no state can leak between entries of a batch. Scenarios are
//! independent and run in parallel on rayon's pool, which also bounds how
//! many concurrent solves hit the shared solver backend.
//!
//! A scenario whose build fails is reported with status `error` and the
//! failure message; the rest of the batch continues. Failure to invoke the
//! solver at all (e.g. [`PlanError::SolverUnavailable`](crate::PlanError))
//! aborts the whole batch.

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::extract::{PlanResults, extract_results};
use crate::lp::{MilpSolver, SolveStatus};
use crate::model;
use crate::scenario::ScenarioConfig;

/// Per-scenario outcome: the solve status is always preserved; results exist
/// only for optimal solves and must not be assumed otherwise.
#[derive(Debug, Serialize)]
pub struct ScenarioOutcome {
    pub status: SolveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<PlanResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScenarioOutcome {
    fn build_failed(error: anyhow::Error) -> Self {
        Self {
            status: SolveStatus::Error,
            objective: None,
            results: None,
            message: Some(error.to_string()),
        }
    }

    fn not_optimal(status: SolveStatus) -> Self {
        Self {
            status,
            objective: None,
            results: None,
            message: None,
        }
    }
}

/// Build, solve and extract one scenario through a fresh pipeline.
pub fn run_scenario(config: &ScenarioConfig, solver: &dyn MilpSolver) -> Result<ScenarioOutcome> {
    let model = match model::build(config) {
        Ok(model) => model,
        Err(error) => return Ok(ScenarioOutcome::build_failed(error)),
    };

    let solution = solver.solve(&model.milp)?;
    if solution.status != SolveStatus::Optimal {
        return Ok(ScenarioOutcome::not_optimal(solution.status));
    }

    let results = extract_results(&model, &solution)?;
    Ok(ScenarioOutcome {
        status: SolveStatus::Optimal,
        objective: Some(solution.objective_value),
        results: Some(results),
        message: None,
    })
}

/// Run every scenario in the batch, keyed by scenario name.
pub fn run_scenarios(
    scenarios: &BTreeMap<String, ScenarioConfig>,
    solver: &dyn MilpSolver,
) -> Result<BTreeMap<String, ScenarioOutcome>> {
    scenarios
        .par_iter()
        .map(|(name, config)| Ok((name.clone(), run_scenario(config, solver)?)))
        .collect()
}
