//! Operator overloading for linear expressions.
//!
//! Lets constraint code read like the algebra it encodes:
//!
//! ```rust
//! use supplyplan::lp::{MilpModel, VariableType};
//!
//! let mut model = MilpModel::new();
//! let x = model.add_variable(VariableType::Continuous, 0.0, 10.0);
//! let y = model.add_variable(VariableType::Continuous, 0.0, 10.0);
//!
//! let _ = x + y;
//! let _ = 2.0 * x - y + 5.0;
//! let _ = -(x + y) * 0.5;
//! ```

use std::ops::{Add, Mul, Neg, Sub};

use super::{LinearExpr, Term, VarId};

impl Add<VarId> for VarId {
    type Output = LinearExpr;

    fn add(self, rhs: VarId) -> LinearExpr {
        LinearExpr::from(self) + rhs
    }
}

impl Sub<VarId> for VarId {
    type Output = LinearExpr;

    fn sub(self, rhs: VarId) -> LinearExpr {
        LinearExpr::from(self) - rhs
    }
}

impl Add<LinearExpr> for VarId {
    type Output = LinearExpr;

    fn add(self, rhs: LinearExpr) -> LinearExpr {
        LinearExpr::from(self) + rhs
    }
}

impl Sub<LinearExpr> for VarId {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        LinearExpr::from(self) - rhs
    }
}

impl Add<f64> for VarId {
    type Output = LinearExpr;

    fn add(self, rhs: f64) -> LinearExpr {
        LinearExpr::from(self) + rhs
    }
}

impl Sub<f64> for VarId {
    type Output = LinearExpr;

    fn sub(self, rhs: f64) -> LinearExpr {
        LinearExpr::from(self) - rhs
    }
}

impl Mul<f64> for VarId {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> LinearExpr {
        LinearExpr {
            terms: vec![Term {
                coefficient: rhs,
                variable: self,
            }],
            constant: 0.0,
        }
    }
}

impl Mul<VarId> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: VarId) -> LinearExpr {
        rhs * self
    }
}

impl Neg for VarId {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}

impl Add<VarId> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: VarId) -> LinearExpr {
        self.add_term(1.0, rhs);
        self
    }
}

impl Sub<VarId> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: VarId) -> LinearExpr {
        self.add_term(-1.0, rhs);
        self
    }
}

impl Add<LinearExpr> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl Sub<LinearExpr> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self + (-rhs)
    }
}

impl Add<f64> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: f64) -> LinearExpr {
        self.constant += rhs;
        self
    }
}

impl Sub<f64> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: f64) -> LinearExpr {
        self.constant -= rhs;
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, rhs: f64) -> LinearExpr {
        for term in &mut self.terms {
            term.coefficient *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl Mul<LinearExpr> for f64 {
    type Output = LinearExpr;

    fn mul(self, rhs: LinearExpr) -> LinearExpr {
        rhs * self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}
