//! COIN-OR CBC backend for [`MilpSolver`].

use ::coin_cbc::{Model, Sense};
use anyhow::Result;

use super::quiet::Silencer;
use super::{
    ConstraintSense, MilpModel, MilpSolution, MilpSolver, ObjectiveSense, SolveStatus, VariableType,
};

/// Round to a number of significant digits, masking CBC's floating-point
/// noise so that identical models keep producing identical valuations.
fn round_to_sig_digits(value: f64, digits: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(digits - magnitude - 1);
    (value * scale).round() / scale
}

/// Solver backed by the bundled COIN-OR CBC library.
pub struct CbcSolver;

impl MilpSolver for CbcSolver {
    fn name(&self) -> &'static str {
        "coin_cbc"
    }

    fn solve(&self, model: &MilpModel) -> Result<MilpSolution> {
        // CBC logs to stdout regardless of settings; keep it quiet. Failure
        // to grab the gag only costs us noise.
        let _quiet = Silencer::stdout().ok();

        let mut cbc = Model::default();

        let cols: Vec<_> = model
            .variables
            .iter()
            .map(|bounds| match bounds.var_type {
                VariableType::Continuous => {
                    let col = cbc.add_col();
                    cbc.set_col_lower(col, bounds.lower);
                    if bounds.upper.is_finite() {
                        cbc.set_col_upper(col, bounds.upper);
                    }
                    col
                }
                VariableType::Binary => cbc.add_binary(),
            })
            .collect();

        for constraint in &model.constraints {
            let row = cbc.add_row();
            for term in &constraint.expression.terms {
                cbc.set_weight(row, cols[term.variable.index()], term.coefficient);
            }

            // Constant offsets fold into the right-hand side.
            let rhs = constraint.rhs - constraint.expression.constant;
            match constraint.sense {
                ConstraintSense::LessEqual => cbc.set_row_upper(row, rhs),
                ConstraintSense::Equal => cbc.set_row_equal(row, rhs),
                ConstraintSense::GreaterEqual => cbc.set_row_lower(row, rhs),
            }
        }

        if let Some(objective) = &model.objective {
            for term in &objective.expression.terms {
                cbc.set_obj_coeff(cols[term.variable.index()], term.coefficient);
            }
            cbc.set_obj_sense(match objective.sense {
                ObjectiveSense::Minimize => Sense::Minimize,
                ObjectiveSense::Maximize => Sense::Maximize,
            });
        }

        let solution = cbc.solve();

        if !solution.raw().is_proven_optimal() {
            let status = if solution.raw().is_proven_infeasible() {
                SolveStatus::Infeasible
            } else if solution.raw().is_continuous_unbounded() {
                SolveStatus::Unbounded
            } else {
                SolveStatus::NotSolved
            };
            return Ok(MilpSolution::without_values(status));
        }

        let values: Vec<f64> = cols
            .iter()
            .map(|&col| round_to_sig_digits(solution.col(col), 8))
            .collect();

        let objective_value = model
            .objective
            .as_ref()
            .map(|objective| {
                let total = objective.expression.constant
                    + objective
                        .expression
                        .terms
                        .iter()
                        .map(|term| term.coefficient * values[term.variable.index()])
                        .sum::<f64>();
                round_to_sig_digits(total, 8)
            })
            .unwrap_or(0.0);

        Ok(MilpSolution::new(
            SolveStatus::Optimal,
            objective_value,
            values,
        ))
    }
}
