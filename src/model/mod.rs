//! Model formulation: catalog + variable space + constraints + objective.
//!
//! [`build`] turns one [`ScenarioConfig`] into a complete [`PlanModel`]
//! holding the assembled MILP alongside the catalog and variable registry
//! needed to interpret a solution. Each call constructs everything from
//! scratch; nothing is shared between scenarios.

use anyhow::{Result, ensure};

use crate::catalog::Catalog;
use crate::lp::MilpModel;
use crate::scenario::ScenarioConfig;

pub mod constraints;
pub mod objective;
pub mod variables;


pub use constraints::ConstraintBuilder;
pub use objective::ObjectiveAssembler;
pub use variables::{VarKey, VariableRegistry};

/// A fully formulated scenario model, ready for a solver.
#[derive(Debug)]
pub struct PlanModel {
    pub catalog: Catalog,
    pub registry: VariableRegistry,
    pub milp: MilpModel,
}

/// Formulate the MILP for one scenario.
///
/// Fails with [`MissingParameter`](crate::PlanError::MissingParameter) when a
/// required table entry is absent for a declared dimension, before any solver
/// is involved.
pub fn build(config: &ScenarioConfig) -> Result<PlanModel> {
    ensure!(
        !config.facilities.is_empty(),
        "scenario declares no facilities"
    );
    ensure!(!config.products.is_empty(), "scenario declares no products");
    ensure!(!config.periods.is_empty(), "scenario declares no periods");
    ensure!(
        config.periods.windows(2).all(|pair| pair[0] < pair[1]),
        "periods must be strictly ascending"
    );

    let mut catalog = Catalog::new();
    catalog.add_facilities(config.facilities.clone());
    catalog.add_products(config.products.clone());
    catalog.add_periods(config.periods.clone());

    let mut milp = MilpModel::new();
    let registry = VariableRegistry::declare(&catalog, &mut milp);

    ConstraintBuilder::new(&catalog, config, &registry).emit(&mut milp)?;
    ObjectiveAssembler::new(&catalog, config, &registry).assemble(&mut milp)?;

    Ok(PlanModel {
        catalog,
        registry,
        milp,
    })
}
