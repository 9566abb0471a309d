//! MILP model building and solver abstraction.
//!
//! The formulation engine assembles a [`MilpModel`] (variables, linear
//! constraints, objective) without committing to any particular solver.
//! Solving is delegated through the [`MilpSolver`] trait; the bundled backend
//! wraps COIN-OR CBC behind the `coin_cbc` cargo feature, and tests use stub
//! implementations returning canned valuations.
//!
//! # Building a model
//!
//! ```rust
//! use supplyplan::constraint;
//! use supplyplan::lp::{MilpModel, ObjectiveSense, VariableType};
//!
//! let mut model = MilpModel::new();
//! let x = model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY);
//! let y = model.add_variable(VariableType::Binary, 0.0, 1.0);
//!
//! model.add_constraint(constraint!((x - 100.0 * y) <= 0.0));
//! model.set_objective(2.0 * x + 5.0 * y, ObjectiveSense::Minimize);
//! ```
//!
//! # Backend selection
//!
//! [`default_solver`] honours the `SUPPLYPLAN_SOLVER` environment variable
//! (`"cbc"` / `"coin_cbc"`); when unset it picks the first compiled-in
//! backend, and with no backend feature it reports
//! [`PlanError::SolverUnavailable`](crate::PlanError::SolverUnavailable).

use anyhow::Result;
use serde::Serialize;
use std::env;
use std::fmt;

use crate::PlanError;

pub mod macros;
pub mod ops;

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc;
#[cfg(feature = "coin_cbc")]
mod quiet;

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous variable, bounded below (and optionally above).
    Continuous,
    /// Binary variable taking only 0 or 1.
    Binary,
}

/// Comparison sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// `expression <= rhs`
    LessEqual,
    /// `expression == rhs`
    Equal,
    /// `expression >= rhs`
    GreaterEqual,
}

/// Direction of the objective function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// Outcome of a solve attempt, preserved verbatim in scenario results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal solution.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// The objective can be improved without bound.
    Unbounded,
    /// The solver terminated without reaching a conclusion.
    NotSolved,
    /// The solver failed, or the model could not be built.
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not_solved",
            SolveStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Handle to a variable within the [`MilpModel`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Index of this variable in the model's column order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One `coefficient * variable` term of a linear expression.
#[derive(Debug, Clone, Copy)]
pub struct Term {
    pub coefficient: f64,
    pub variable: VarId,
}

/// A linear expression: sum of terms plus a constant offset.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    pub terms: Vec<Term>,
    pub constant: f64,
}

impl LinearExpr {
    /// An expression holding only a constant.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// Append a `coefficient * variable` term.
    pub fn add_term(&mut self, coefficient: f64, variable: VarId) {
        self.terms.push(Term {
            coefficient,
            variable,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<VarId> for LinearExpr {
    fn from(variable: VarId) -> Self {
        Self {
            terms: vec![Term {
                coefficient: 1.0,
                variable,
            }],
            constant: 0.0,
        }
    }
}

/// A linear constraint `expression <sense> rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub expression: LinearExpr,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(expression: impl Into<LinearExpr>, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            expression: expression.into(),
            sense,
            rhs,
        }
    }

    /// `expression == rhs`
    pub fn eq(expression: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::Equal, rhs)
    }

    /// `expression <= rhs`
    pub fn le(expression: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::LessEqual, rhs)
    }

    /// `expression >= rhs`
    pub fn ge(expression: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::GreaterEqual, rhs)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VarBounds {
    pub var_type: VariableType,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Objective {
    pub expression: LinearExpr,
    pub sense: ObjectiveSense,
}

/// An assembled mixed-integer linear program.
#[derive(Debug, Clone, Default)]
pub struct MilpModel {
    pub(crate) variables: Vec<VarBounds>,
    pub(crate) constraints: Vec<LinearConstraint>,
    pub(crate) objective: Option<Objective>,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable with the given domain and bounds, returning its handle.
    pub fn add_variable(&mut self, var_type: VariableType, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VarBounds {
            var_type,
            lower,
            upper,
        });
        id
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, expression: impl Into<LinearExpr>, sense: ObjectiveSense) {
        self.objective = Some(Objective {
            expression: expression.into(),
            sense,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.var_type == VariableType::Binary)
            .count()
    }

    /// Iterate the constraints, mainly for diagnostics and tests.
    pub fn constraints(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter()
    }
}

/// Valuation returned by a solver run.
///
/// When `status` is [`SolveStatus::Optimal`] every declared variable has a
/// value; otherwise the valuation is empty and must not be read.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    pub status: SolveStatus,
    pub objective_value: f64,
    values: Vec<f64>,
}

impl MilpSolution {
    /// Build a solution from a raw column valuation.
    pub fn new(status: SolveStatus, objective_value: f64, values: Vec<f64>) -> Self {
        Self {
            status,
            objective_value,
            values,
        }
    }

    /// A terminal, valueless outcome (infeasible, unbounded, error).
    pub fn without_values(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: 0.0,
            values: Vec::new(),
        }
    }

    /// Value of a variable, if the solve produced one.
    pub fn value(&self, variable: VarId) -> Option<f64> {
        self.values.get(variable.0).copied()
    }
}

/// External MILP solver boundary.
///
/// Implementations receive the fully assembled model and return a status plus
/// a per-variable valuation. A non-optimal status is data for the caller, not
/// an error; `Err` is reserved for failures to invoke the solver at all and
/// aborts the surrounding scenario batch.
pub trait MilpSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &MilpModel) -> Result<MilpSolution>;
}

/// Pick a solver backend from `SUPPLYPLAN_SOLVER` or the compiled-in default.
pub fn default_solver() -> Result<Box<dyn MilpSolver>> {
    if let Ok(name) = env::var("SUPPLYPLAN_SOLVER") {
        return match name.to_lowercase().as_str() {
            "cbc" | "coin_cbc" | "coin-cbc" => {
                #[cfg(feature = "coin_cbc")]
                {
                    Ok(Box::new(coin_cbc::CbcSolver))
                }
                #[cfg(not(feature = "coin_cbc"))]
                {
                    Err(PlanError::SolverUnavailable(format!(
                        "'{}' requested via SUPPLYPLAN_SOLVER but the coin_cbc feature is not enabled",
                        name
                    ))
                    .into())
                }
            }
            _ => Err(PlanError::SolverUnavailable(format!(
                "unknown solver '{}' in SUPPLYPLAN_SOLVER (valid: cbc)",
                name
            ))
            .into()),
        };
    }

    #[cfg(feature = "coin_cbc")]
    {
        Ok(Box::new(coin_cbc::CbcSolver))
    }

    #[cfg(not(feature = "coin_cbc"))]
    {
        Err(PlanError::SolverUnavailable(
            "no MILP backend compiled in (enable the coin_cbc feature)".to_string(),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint;

    #[test]
    fn constraint_macro_senses() {
        let mut model = MilpModel::new();
        let x = model.add_variable(VariableType::Continuous, 0.0, 10.0);
        let y = model.add_variable(VariableType::Continuous, 0.0, 10.0);

        let c = constraint!((x + y) == 10.0);
        assert_eq!(c.sense, ConstraintSense::Equal);
        assert_eq!(c.rhs, 10.0);

        let c = constraint!((2.0 * x) <= 5.0);
        assert_eq!(c.sense, ConstraintSense::LessEqual);
        assert_eq!(c.expression.terms[0].coefficient, 2.0);

        let c = constraint!((x - y) >= 0.0);
        assert_eq!(c.sense, ConstraintSense::GreaterEqual);
        assert_eq!(c.expression.terms.len(), 2);
    }

    #[test]
    fn expression_arithmetic_preserves_terms_and_constant() {
        let mut model = MilpModel::new();
        let x = model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY);
        let y = model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY);

        let expr = 2.0 * x + 5.0;
        assert_eq!(expr.terms.len(), 1);
        assert_eq!(expr.constant, 5.0);

        let expr = expr + y - 1.0;
        assert_eq!(expr.terms.len(), 2);
        assert_eq!(expr.constant, 4.0);
        assert_eq!(expr.terms[1].coefficient, 1.0);
        assert_eq!(expr.terms[1].variable, y);
    }

    #[test]
    fn model_counts_binary_variables() {
        let mut model = MilpModel::new();
        model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY);
        model.add_variable(VariableType::Binary, 0.0, 1.0);
        model.add_variable(VariableType::Binary, 0.0, 1.0);

        assert_eq!(model.num_variables(), 3);
        assert_eq!(model.num_binary_variables(), 2);
    }

    #[test]
    fn empty_solution_yields_no_values() {
        let solution = MilpSolution::without_values(SolveStatus::Infeasible);
        assert_eq!(solution.value(VarId(0)), None);
    }
}
