//! Constraint construction macro.

/// Create a [`LinearConstraint`](crate::lp::LinearConstraint) with natural
/// comparison syntax. The left-hand side must be parenthesised.
///
/// ```rust
/// use supplyplan::constraint;
/// use supplyplan::lp::{MilpModel, VariableType};
///
/// let mut model = MilpModel::new();
/// let x = model.add_variable(VariableType::Continuous, 0.0, 10.0);
/// let y = model.add_variable(VariableType::Continuous, 0.0, 10.0);
///
/// model.add_constraint(constraint!((x + y) == 10.0));
/// model.add_constraint(constraint!((2.0 * x - y) <= 5.0));
/// model.add_constraint(constraint!((y) >= 1.0));
/// ```
#[macro_export]
macro_rules! constraint {
    (($lhs:expr) == $rhs:expr) => {
        $crate::lp::LinearConstraint::new(
            $lhs,
            $crate::lp::ConstraintSense::Equal,
            $rhs as f64,
        )
    };
    (($lhs:expr) <= $rhs:expr) => {
        $crate::lp::LinearConstraint::new(
            $lhs,
            $crate::lp::ConstraintSense::LessEqual,
            $rhs as f64,
        )
    };
    (($lhs:expr) >= $rhs:expr) => {
        $crate::lp::LinearConstraint::new(
            $lhs,
            $crate::lp::ConstraintSense::GreaterEqual,
            $rhs as f64,
        )
    };
}
