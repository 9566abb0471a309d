//! Objective assembly: one minimized linear cost expression.
//!
//! Sums production, setup, inventory holding, backlog penalty, transport,
//! wage, overtime and hire/fire costs over the declared variable space.
//! Cost tables must be total: a declared (facility, product) pair or
//! transport lane without a cost entry fails the build.

use anyhow::Result;
use itertools::iproduct;

use crate::catalog::{Catalog, SkillClass};
use crate::lp::{LinearExpr, MilpModel, ObjectiveSense};
use crate::scenario::ScenarioConfig;

use super::variables::VariableRegistry;

pub struct ObjectiveAssembler<'a> {
    catalog: &'a Catalog,
    config: &'a ScenarioConfig,
    registry: &'a VariableRegistry,
}

impl<'a> ObjectiveAssembler<'a> {
    pub fn new(
        catalog: &'a Catalog,
        config: &'a ScenarioConfig,
        registry: &'a VariableRegistry,
    ) -> Self {
        Self {
            catalog,
            config,
            registry,
        }
    }

    /// Build the total-cost expression and install it as the minimization
    /// objective.
    pub fn assemble(&self, model: &mut MilpModel) -> Result<()> {
        let costs = &self.config.cost_parameters;
        let mut total = LinearExpr::default();

        for (facility, product, &period) in iproduct!(
            self.catalog.facilities(),
            self.catalog.products(),
            self.catalog.periods()
        ) {
            total.add_term(
                costs.production(facility, product)?,
                self.registry.production(facility, product, period)?,
            );
            total.add_term(
                costs.setup(facility, product)?,
                self.registry.setup(facility, product, period)?,
            );
            total.add_term(
                costs.inventory(facility, product)?,
                self.registry.inventory(facility, product, period)?,
            );
            total.add_term(
                costs.backlog(facility, product)?,
                self.registry.backlog(facility, product, period)?,
            );
        }

        if self.catalog.is_multi_facility() {
            for (from, to, product, &period) in iproduct!(
                self.catalog.facilities(),
                self.catalog.facilities(),
                self.catalog.products(),
                self.catalog.periods()
            ) {
                if from == to {
                    continue;
                }
                total.add_term(
                    costs.transport(from, to)?,
                    self.registry.transport(from, to, product, period)?,
                );
            }
        }

        for (facility, &period) in iproduct!(self.catalog.facilities(), self.catalog.periods()) {
            for skill in SkillClass::ALL {
                total.add_term(
                    costs.wage(facility, skill)?,
                    self.registry.workforce(facility, skill, period)?,
                );
            }
            total.add_term(costs.overtime_cost, self.registry.overtime(facility, period)?);
            total.add_term(costs.hire_cost, self.registry.hire(facility, period)?);
            total.add_term(costs.fire_cost, self.registry.fire(facility, period)?);
        }

        model.set_objective(total, ObjectiveSense::Minimize);
        Ok(())
    }
}
