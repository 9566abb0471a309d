//! Projection of a solved valuation into per-domain result records.
//!
//! Pure read-out: walks the catalog dimensions in declaration order, resolves
//! each variable through the registry, and emits typed records. Transport
//! records are only emitted for strictly positive flows; idle lanes are
//! omitted rather than listed as zero.

use anyhow::{Result, anyhow};
use itertools::iproduct;
use serde::Serialize;

use crate::catalog::{Period, SkillClass};
use crate::lp::{MilpSolution, VarId};
use crate::model::PlanModel;

/// Flows below this are CBC float noise, not shipments.
const FLOW_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Serialize)]
pub struct ProductionRecord {
    pub facility: String,
    pub product: String,
    pub period: Period,
    pub quantity: f64,
    pub setup: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryRecord {
    pub facility: String,
    pub product: String,
    pub period: Period,
    pub inventory: f64,
    pub backlog: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportRecord {
    pub from_facility: String,
    pub to_facility: String,
    pub product: String,
    pub period: Period,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkforceRecord {
    pub facility: String,
    pub period: Period,
    pub skilled_workforce: f64,
    pub unskilled_workforce: f64,
    pub overtime: f64,
    pub hired: f64,
    pub fired: f64,
}

/// Structured results for one solved scenario.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanResults {
    pub production: Vec<ProductionRecord>,
    pub inventory: Vec<InventoryRecord>,
    pub transportation: Vec<TransportRecord>,
    pub workforce: Vec<WorkforceRecord>,
}

fn value_of(solution: &MilpSolution, variable: VarId) -> Result<f64> {
    solution
        .value(variable)
        .ok_or_else(|| anyhow!("solution carries no value for a declared variable"))
}

/// Project `solution` onto the model's variable space.
///
/// Expects an optimal solution; every declared variable must have a value.
pub fn extract_results(model: &PlanModel, solution: &MilpSolution) -> Result<PlanResults> {
    let catalog = &model.catalog;
    let registry = &model.registry;
    let mut results = PlanResults::default();

    for (facility, product, &period) in
        iproduct!(catalog.facilities(), catalog.products(), catalog.periods())
    {
        let quantity = value_of(solution, registry.production(facility, product, period)?)?;
        let setup = value_of(solution, registry.setup(facility, product, period)?)?;
        results.production.push(ProductionRecord {
            facility: facility.clone(),
            product: product.clone(),
            period,
            quantity,
            setup: setup > 0.5,
        });

        let inventory = value_of(solution, registry.inventory(facility, product, period)?)?;
        let backlog = value_of(solution, registry.backlog(facility, product, period)?)?;
        results.inventory.push(InventoryRecord {
            facility: facility.clone(),
            product: product.clone(),
            period,
            inventory,
            backlog,
        });
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
            let quantity = value_of(solution, registry.transport(from, to, product, period)?)?;
            if quantity > FLOW_EPSILON {
                results.transportation.push(TransportRecord {
                    from_facility: from.clone(),
                    to_facility: to.clone(),
                    product: product.clone(),
                    period,
                    quantity,
                });
            }
        }
    }

    for (facility, &period) in iproduct!(catalog.facilities(), catalog.periods()) {
        results.workforce.push(WorkforceRecord {
            facility: facility.clone(),
            period,
            skilled_workforce: value_of(
                solution,
                registry.workforce(facility, SkillClass::Skilled, period)?,
            )?,
            unskilled_workforce: value_of(
                solution,
                registry.workforce(facility, SkillClass::Unskilled, period)?,
            )?,
            overtime: value_of(solution, registry.overtime(facility, period)?)?,
            hired: value_of(solution, registry.hire(facility, period)?)?,
            fired: value_of(solution, registry.fire(facility, period)?)?,
        });
    }

    Ok(results)
}
