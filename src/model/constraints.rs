//! Constraint generation for one scenario.
//!
//! Emits the full linear constraint system over the registry's variables:
//! demand balance, capacity with overtime, big-M lot-sizing linkage,
//! inventory ceilings, workforce sizing and raw-material limits. Every
//! required parameter lookup is checked; a missing key fails the build with
//! [`MissingParameter`](crate::PlanError::MissingParameter) before anything
//! reaches a solver.

use anyhow::Result;
use itertools::iproduct;

use crate::catalog::{Catalog, SkillClass};
use crate::constraint;
use crate::lp::{LinearExpr, MilpModel};
use crate::scenario::ScenarioConfig;

use super::variables::VariableRegistry;

pub struct ConstraintBuilder<'a> {
    catalog: &'a Catalog,
    config: &'a ScenarioConfig,
    registry: &'a VariableRegistry,
}

impl<'a> ConstraintBuilder<'a> {
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

    /// Emit every constraint family into `model`.
    pub fn emit(&self, model: &mut MilpModel) -> Result<()> {
        self.demand_balance(model)?;
        self.capacity(model)?;
        self.lot_sizing(model)?;
        self.inventory_ceilings(model)?;
        self.workforce(model)?;
        self.material_limits(model)?;
        Ok(())
    }

    /// Flow conservation per (facility, product, period):
    /// opening stock + production + net inbound transport − closing stock
    /// + backlog − previous backlog == demand.
    ///
    /// The horizon's first period opens with the configured initial
    /// inventory; later periods chain positionally from their predecessor.
    fn demand_balance(&self, model: &mut MilpModel) -> Result<()> {
        for (facility, product, &period) in iproduct!(
            self.catalog.facilities(),
            self.catalog.products(),
            self.catalog.periods()
        ) {
            let mut flow = LinearExpr::default();
            flow.add_term(1.0, self.registry.production(facility, product, period)?);
            flow.add_term(-1.0, self.registry.inventory(facility, product, period)?);
            flow.add_term(1.0, self.registry.backlog(facility, product, period)?);

            match self.catalog.previous_period(period) {
                Some(prev) => {
                    flow.add_term(1.0, self.registry.inventory(facility, product, prev)?);
                    flow.add_term(-1.0, self.registry.backlog(facility, product, prev)?);
                }
                None => {
                    flow.constant += self.config.initial_inventory(facility, product);
                }
            }

            if self.catalog.is_multi_facility() {
                for other in self.catalog.facilities() {
                    if other == facility {
                        continue;
                    }
                    flow.add_term(1.0, self.registry.transport(other, facility, product, period)?);
                    flow.add_term(
                        -1.0,
                        self.registry.transport(facility, other, product, period)?,
                    );
                }
            }

            let demand = self.config.demand(product, period)?;
            model.add_constraint(constraint!((flow) == demand));
        }
        Ok(())
    }

    /// Per (facility, period): production and setup hours fit into regular
    /// capacity plus overtime, and overtime stays under its ceiling.
    fn capacity(&self, model: &mut MilpModel) -> Result<()> {
        let params = &self.config.production_params;
        for (facility, &period) in iproduct!(self.catalog.facilities(), self.catalog.periods()) {
            let mut hours = LinearExpr::default();
            for product in self.catalog.products() {
                hours.add_term(
                    params.production_time(product)?,
                    self.registry.production(facility, product, period)?,
                );
                hours.add_term(
                    params.setup_time,
                    self.registry.setup(facility, product, period)?,
                );
            }

            let overtime = self.registry.overtime(facility, period)?;
            model.add_constraint(constraint!((hours - overtime) <= params.regular_capacity));
            model.add_constraint(constraint!((overtime) <= params.max_overtime));
        }
        Ok(())
    }

    /// Big-M constant linking production to its setup indicator.
    ///
    /// Starts from the minimum-lot heuristic (Σ min_production × |periods|
    /// × 2) and is floored by twice the system-wide demand over the horizon.
    /// The demand table applies per facility, so the floor scales by the
    /// facility count: one facility may cover every sibling's demand through
    /// transport, and the upper linkage must not cut off that consolidated
    /// production level.
    pub fn big_m(&self) -> Result<f64> {
        let mut min_lots = 0.0;
        for product in self.catalog.products() {
            min_lots += self.config.production_params.min_production(product)?;
        }
        let mut total_demand = 0.0;
        for (product, &period) in iproduct!(self.catalog.products(), self.catalog.periods()) {
            total_demand += self.config.demand(product, period)?;
        }
        let heuristic = min_lots * self.catalog.periods().len() as f64 * 2.0;
        let system_demand = total_demand * self.catalog.facilities().len() as f64;
        Ok(heuristic.max(2.0 * system_demand))
    }

    /// Per (facility, product, period): production is zero without a setup,
    /// and at least the minimum lot with one.
    fn lot_sizing(&self, model: &mut MilpModel) -> Result<()> {
        let big_m = self.big_m()?;
        for (facility, product, &period) in iproduct!(
            self.catalog.facilities(),
            self.catalog.products(),
            self.catalog.periods()
        ) {
            let production = self.registry.production(facility, product, period)?;
            let setup = self.registry.setup(facility, product, period)?;
            let min_lot = self.config.production_params.min_production(product)?;

            model.add_constraint(constraint!((production - min_lot * setup) >= 0.0));
            model.add_constraint(constraint!((production - big_m * setup) <= 0.0));
        }
        Ok(())
    }

    fn inventory_ceilings(&self, model: &mut MilpModel) -> Result<()> {
        for (facility, product, &period) in iproduct!(
            self.catalog.facilities(),
            self.catalog.products(),
            self.catalog.periods()
        ) {
            let inventory = self.registry.inventory(facility, product, period)?;
            let ceiling = self.config.production_params.max_inventory(product)?;
            model.add_constraint(constraint!((inventory) <= ceiling));
        }
        Ok(())
    }

    /// Per (facility, period): minimum skilled headcount, hire ceiling,
    /// skill-mix ratio, and the hire/fire headcount balance. The balance
    /// anchors to `initial_workforce` at the horizon start when configured;
    /// otherwise the first period's headcount is free.
    fn workforce(&self, model: &mut MilpModel) -> Result<()> {
        let params = &self.config.workforce_params;
        for (facility, &period) in iproduct!(self.catalog.facilities(), self.catalog.periods()) {
            let skilled = self
                .registry
                .workforce(facility, SkillClass::Skilled, period)?;
            let unskilled = self
                .registry
                .workforce(facility, SkillClass::Unskilled, period)?;
            let hired = self.registry.hire(facility, period)?;
            let fired = self.registry.fire(facility, period)?;

            model.add_constraint(constraint!((skilled) >= params.min_skilled));
            model.add_constraint(constraint!((hired) <= params.max_hire));

            // skilled >= ratio * (skilled + unskilled)
            let ratio = params.skill_mix_ratio;
            model.add_constraint(constraint!(
                ((1.0 - ratio) * skilled - ratio * unskilled) >= 0.0
            ));

            match self.catalog.previous_period(period) {
                Some(prev) => {
                    let prev_skilled =
                        self.registry.workforce(facility, SkillClass::Skilled, prev)?;
                    let prev_unskilled =
                        self.registry
                            .workforce(facility, SkillClass::Unskilled, prev)?;
                    model.add_constraint(constraint!(
                        (skilled + unskilled - prev_skilled - prev_unskilled - hired + fired)
                            == 0.0
                    ));
                }
                None => {
                    if let Some(initial) = params.initial_workforce.get(facility) {
                        model.add_constraint(constraint!(
                            (skilled + unskilled - hired + fired) == initial.total()
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Per (material, period): total consumption across facilities and
    /// products stays within the material's capacity.
    fn material_limits(&self, model: &mut MilpModel) -> Result<()> {
        let mut materials: Vec<&String> = self.config.material_requirements.keys().collect();
        materials.sort();

        for material in materials {
            let capacity = self.config.material_capacity(material)?;
            for &period in self.catalog.periods() {
                let mut usage = LinearExpr::default();
                for (facility, product) in
                    iproduct!(self.catalog.facilities(), self.catalog.products())
                {
                    let rate = self.config.material_usage(material, product);
                    if rate != 0.0 {
                        usage.add_term(rate, self.registry.production(facility, product, period)?);
                    }
                }
                if !usage.is_empty() {
                    model.add_constraint(constraint!((usage) <= capacity));
                }
            }
        }
        Ok(())
    }
}
