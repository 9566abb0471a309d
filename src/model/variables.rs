//! Decision-variable space for one scenario.
//!
//! The registry declares one solver column per element of the cartesian
//! product of the relevant catalog dimensions for each variable family, and
//! resolves exact key tuples back to column handles. Looking up a key that
//! was never declared (including any self-transport lane) is an
//! [`UndeclaredVariable`](crate::PlanError::UndeclaredVariable) error.

use anyhow::Result;
use itertools::iproduct;
use std::collections::HashMap;
use std::fmt;

use crate::PlanError;
use crate::catalog::{Catalog, Period, SkillClass};
use crate::lp::{MilpModel, VarId, VariableType};

/// Composite key identifying one decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarKey {
    /// Units produced. Continuous ≥ 0.
    Production {
        facility: String,
        product: String,
        period: Period,
    },
    /// Whether a production run is set up. Binary.
    Setup {
        facility: String,
        product: String,
        period: Period,
    },
    /// Closing stock. Continuous ≥ 0.
    Inventory {
        facility: String,
        product: String,
        period: Period,
    },
    /// Unmet demand carried forward. Continuous ≥ 0.
    Backlog {
        facility: String,
        product: String,
        period: Period,
    },
    /// Units shipped between two distinct facilities. Continuous ≥ 0.
    Transport {
        from: String,
        to: String,
        product: String,
        period: Period,
    },
    /// Headcount of one skill class. Continuous ≥ 0.
    Workforce {
        facility: String,
        skill: SkillClass,
        period: Period,
    },
    /// Overtime hours worked. Continuous ≥ 0.
    Overtime { facility: String, period: Period },
    /// Workers hired this period. Continuous ≥ 0.
    Hire { facility: String, period: Period },
    /// Workers let go this period. Continuous ≥ 0.
    Fire { facility: String, period: Period },
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Production {
                facility,
                product,
                period,
            } => write!(f, "production[{},{},{}]", facility, product, period),
            VarKey::Setup {
                facility,
                product,
                period,
            } => write!(f, "setup[{},{},{}]", facility, product, period),
            VarKey::Inventory {
                facility,
                product,
                period,
            } => write!(f, "inventory[{},{},{}]", facility, product, period),
            VarKey::Backlog {
                facility,
                product,
                period,
            } => write!(f, "backlog[{},{},{}]", facility, product, period),
            VarKey::Transport {
                from,
                to,
                product,
                period,
            } => write!(f, "transport[{}->{},{},{}]", from, to, product, period),
            VarKey::Workforce {
                facility,
                skill,
                period,
            } => write!(f, "workforce[{},{},{}]", facility, skill.as_str(), period),
            VarKey::Overtime { facility, period } => {
                write!(f, "overtime[{},{}]", facility, period)
            }
            VarKey::Hire { facility, period } => write!(f, "hire[{},{}]", facility, period),
            VarKey::Fire { facility, period } => write!(f, "fire[{},{}]", facility, period),
        }
    }
}

/// Registry mapping [`VarKey`]s to the solver columns declared for them.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    vars: HashMap<VarKey, VarId>,
}

impl VariableRegistry {
    /// Declare the full variable space for `catalog` into `model`.
    ///
    /// Transport lanes exist only for ordered pairs of distinct facilities,
    /// and only when more than one facility is declared.
    pub fn declare(catalog: &Catalog, model: &mut MilpModel) -> Self {
        let mut registry = Self::default();

        for (facility, product, &period) in
            iproduct!(catalog.facilities(), catalog.products(), catalog.periods())
        {
            registry.insert(
                VarKey::Production {
                    facility: facility.clone(),
                    product: product.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
            registry.insert(
                VarKey::Setup {
                    facility: facility.clone(),
                    product: product.clone(),
                    period,
                },
                model.add_variable(VariableType::Binary, 0.0, 1.0),
            );
            registry.insert(
                VarKey::Inventory {
                    facility: facility.clone(),
                    product: product.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
            registry.insert(
                VarKey::Backlog {
                    facility: facility.clone(),
                    product: product.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
        }

        if catalog.is_multi_facility() {
            for (from, to, product, &period) in iproduct!(
                catalog.facilities(),
                catalog.facilities(),
                catalog.products(),
                catalog.periods()
            ) {
                if from == to {
                    continue;
                }
                registry.insert(
                    VarKey::Transport {
                        from: from.clone(),
                        to: to.clone(),
                        product: product.clone(),
                        period,
                    },
                    model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
                );
            }
        }

        for (facility, &period) in iproduct!(catalog.facilities(), catalog.periods()) {
            for skill in SkillClass::ALL {
                registry.insert(
                    VarKey::Workforce {
                        facility: facility.clone(),
                        skill,
                        period,
                    },
                    model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
                );
            }
            registry.insert(
                VarKey::Overtime {
                    facility: facility.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
            registry.insert(
                VarKey::Hire {
                    facility: facility.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
            registry.insert(
                VarKey::Fire {
                    facility: facility.clone(),
                    period,
                },
                model.add_variable(VariableType::Continuous, 0.0, f64::INFINITY),
            );
        }

        registry
    }

    fn insert(&mut self, key: VarKey, var: VarId) {
        self.vars.insert(key, var);
    }

    /// Resolve an exact key tuple.
    pub fn lookup(&self, key: &VarKey) -> Result<VarId> {
        self.vars
            .get(key)
            .copied()
            .ok_or_else(|| PlanError::UndeclaredVariable(key.to_string()).into())
    }

    pub fn production(&self, facility: &str, product: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Production {
            facility: facility.to_string(),
            product: product.to_string(),
            period,
        })
    }

    pub fn setup(&self, facility: &str, product: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Setup {
            facility: facility.to_string(),
            product: product.to_string(),
            period,
        })
    }

    pub fn inventory(&self, facility: &str, product: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Inventory {
            facility: facility.to_string(),
            product: product.to_string(),
            period,
        })
    }

    pub fn backlog(&self, facility: &str, product: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Backlog {
            facility: facility.to_string(),
            product: product.to_string(),
            period,
        })
    }

    pub fn transport(&self, from: &str, to: &str, product: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Transport {
            from: from.to_string(),
            to: to.to_string(),
            product: product.to_string(),
            period,
        })
    }

    pub fn workforce(&self, facility: &str, skill: SkillClass, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Workforce {
            facility: facility.to_string(),
            skill,
            period,
        })
    }

    pub fn overtime(&self, facility: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Overtime {
            facility: facility.to_string(),
            period,
        })
    }

    pub fn hire(&self, facility: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Hire {
            facility: facility.to_string(),
            period,
        })
    }

    pub fn fire(&self, facility: &str, period: Period) -> Result<VarId> {
        self.lookup(&VarKey::Fire {
            facility: facility.to_string(),
            period,
        })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
