//! Scenario configuration: the self-contained parameter bundle from which one
//! model instance is built.
//!
//! Scenario files are JSON maps of scenario name to [`ScenarioConfig`]. Each
//! config carries its own dimension lists, demand and cost tables, so a batch
//! entry can be rebuilt and solved in complete isolation from its siblings.
//!
//! Required lookups go through checked accessors that turn an absent key into
//! [`PlanError::MissingParameter`] naming the full parameter path; the only
//! sanctioned default is initial inventory, which is zero when omitted.

use anyhow::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::PlanError;
use crate::catalog::{Period, SkillClass};

/// Look up `map[a][b]`, reporting the full path on a miss.
fn nested(
    map: &HashMap<String, HashMap<String, f64>>,
    a: &str,
    b: &str,
    table: &str,
) -> Result<f64> {
    map.get(a)
        .and_then(|inner| inner.get(b))
        .copied()
        .ok_or_else(|| PlanError::MissingParameter(format!("{}[{}][{}]", table, a, b)).into())
}

/// One fully self-contained planning scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub facilities: Vec<String>,
    pub products: Vec<String>,
    /// Ascending planning order; the first element is the horizon start.
    pub periods: Vec<Period>,
    /// Opening stock per facility and product; zero when omitted.
    #[serde(default)]
    pub initial_inventory: HashMap<String, HashMap<String, f64>>,
    /// Demand per product and period (JSON map keys, so periods are strings).
    /// Required for every declared product × period.
    pub demand: HashMap<String, HashMap<String, f64>>,
    pub workforce_params: WorkforceParams,
    pub production_params: ProductionParams,
    /// Raw-material usage tables; each maps product → units consumed per unit
    /// produced, plus a `capacity` entry for the per-period availability.
    #[serde(default)]
    pub material_requirements: HashMap<String, HashMap<String, f64>>,
    pub cost_parameters: CostParameters,
}

impl ScenarioConfig {
    pub fn demand(&self, product: &str, period: Period) -> Result<f64> {
        self.demand
            .get(product)
            .and_then(|by_period| by_period.get(&period.to_string()))
            .copied()
            .ok_or_else(|| {
                PlanError::MissingParameter(format!("demand[{}][{}]", product, period)).into()
            })
    }

    pub fn initial_inventory(&self, facility: &str, product: &str) -> f64 {
        self.initial_inventory
            .get(facility)
            .and_then(|by_product| by_product.get(product))
            .copied()
            .unwrap_or(0.0)
    }

    /// Units of `material` consumed per unit of `product`; products absent
    /// from the table consume none.
    pub fn material_usage(&self, material: &str, product: &str) -> f64 {
        self.material_requirements
            .get(material)
            .and_then(|table| table.get(product))
            .copied()
            .unwrap_or(0.0)
    }

    /// Per-period availability of `material`.
    pub fn material_capacity(&self, material: &str) -> Result<f64> {
        self.material_requirements
            .get(material)
            .and_then(|table| table.get("capacity"))
            .copied()
            .ok_or_else(|| {
                PlanError::MissingParameter(format!(
                    "material_requirements[{}][capacity]",
                    material
                ))
                .into()
            })
    }
}

/// Workforce sizing parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkforceParams {
    /// Minimum skilled headcount per facility and period.
    pub min_skilled: f64,
    /// Maximum hires per facility and period.
    pub max_hire: f64,
    /// Minimum proportion of skilled workers in the total headcount, in [0,1].
    pub skill_mix_ratio: f64,
    /// Headcount anchoring the first period's hiring balance. Facilities
    /// without an entry start the horizon with a free headcount.
    #[serde(default)]
    pub initial_workforce: HashMap<String, InitialWorkforce>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InitialWorkforce {
    pub skilled: f64,
    pub unskilled: f64,
}

impl InitialWorkforce {
    pub fn total(&self) -> f64 {
        self.skilled + self.unskilled
    }
}

/// Capacity, lot-sizing and inventory-bound parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionParams {
    /// Regular working hours available per facility and period.
    pub regular_capacity: f64,
    /// Overtime-hour ceiling per facility and period.
    pub max_overtime: f64,
    /// Hours consumed by one setup.
    pub setup_time: f64,
    /// Hours per unit, per product.
    pub production_time: HashMap<String, f64>,
    /// Smallest lot worth producing, per product.
    pub min_production: HashMap<String, f64>,
    /// Inventory ceiling, per product.
    pub max_inventory: HashMap<String, f64>,
}

impl ProductionParams {
    fn per_product(map: &HashMap<String, f64>, product: &str, table: &str) -> Result<f64> {
        map.get(product).copied().ok_or_else(|| {
            PlanError::MissingParameter(format!("production_params.{}[{}]", table, product)).into()
        })
    }

    pub fn production_time(&self, product: &str) -> Result<f64> {
        Self::per_product(&self.production_time, product, "production_time")
    }

    pub fn min_production(&self, product: &str) -> Result<f64> {
        Self::per_product(&self.min_production, product, "min_production")
    }

    pub fn max_inventory(&self, product: &str) -> Result<f64> {
        Self::per_product(&self.max_inventory, product, "max_inventory")
    }
}

/// Wage rates by skill class for one facility.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WageRates {
    pub skilled: f64,
    pub unskilled: f64,
}

/// Per-unit cost tables. Costs must be total: every declared
/// (facility, product) pair and every ordered facility pair needs an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CostParameters {
    pub production_cost: HashMap<String, HashMap<String, f64>>,
    pub setup_cost: HashMap<String, HashMap<String, f64>>,
    pub inventory_cost: HashMap<String, HashMap<String, f64>>,
    pub backlog_cost: HashMap<String, HashMap<String, f64>>,
    /// Lane cost per unit, keyed source facility → destination facility.
    /// Only consulted for multi-facility scenarios.
    #[serde(default)]
    pub transport_cost: HashMap<String, HashMap<String, f64>>,
    pub workforce_cost: HashMap<String, WageRates>,
    pub hire_cost: f64,
    pub fire_cost: f64,
    pub overtime_cost: f64,
}

impl CostParameters {
    pub fn production(&self, facility: &str, product: &str) -> Result<f64> {
        nested(
            &self.production_cost,
            facility,
            product,
            "cost_parameters.production_cost",
        )
    }

    pub fn setup(&self, facility: &str, product: &str) -> Result<f64> {
        nested(
            &self.setup_cost,
            facility,
            product,
            "cost_parameters.setup_cost",
        )
    }

    pub fn inventory(&self, facility: &str, product: &str) -> Result<f64> {
        nested(
            &self.inventory_cost,
            facility,
            product,
            "cost_parameters.inventory_cost",
        )
    }

    pub fn backlog(&self, facility: &str, product: &str) -> Result<f64> {
        nested(
            &self.backlog_cost,
            facility,
            product,
            "cost_parameters.backlog_cost",
        )
    }

    pub fn transport(&self, from: &str, to: &str) -> Result<f64> {
        nested(
            &self.transport_cost,
            from,
            to,
            "cost_parameters.transport_cost",
        )
    }

    pub fn wage(&self, facility: &str, skill: SkillClass) -> Result<f64> {
        let rates = self.workforce_cost.get(facility).ok_or_else(|| {
            PlanError::MissingParameter(format!("cost_parameters.workforce_cost[{}]", facility))
        })?;
        Ok(match skill {
            SkillClass::Skilled => rates.skilled,
            SkillClass::Unskilled => rates.unskilled,
        })
    }
}

/// Load a scenario batch file: a JSON map of scenario name → config.
pub fn load_scenarios(path: &Path) -> Result<BTreeMap<String, ScenarioConfig>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_FACILITY_JSON: &str = r#"{
        "facilities": ["Factory1"],
        "products": ["ProductA"],
        "periods": [0, 1, 2, 3],
        "initial_inventory": {"Factory1": {"ProductA": 100}},
        "demand": {"ProductA": {"0": 120, "1": 140, "2": 160, "3": 130}},
        "workforce_params": {"min_skilled": 2, "max_hire": 5, "skill_mix_ratio": 0.4},
        "production_params": {
            "regular_capacity": 160,
            "max_overtime": 40,
            "setup_time": 4,
            "production_time": {"ProductA": 2},
            "min_production": {"ProductA": 30},
            "max_inventory": {"ProductA": 200}
        },
        "cost_parameters": {
            "production_cost": {"Factory1": {"ProductA": 10}},
            "setup_cost": {"Factory1": {"ProductA": 500}},
            "inventory_cost": {"Factory1": {"ProductA": 2}},
            "backlog_cost": {"Factory1": {"ProductA": 20}},
            "workforce_cost": {"Factory1": {"skilled": 50, "unskilled": 30}},
            "hire_cost": 1000,
            "fire_cost": 1500,
            "overtime_cost": 50
        }
    }"#;

    #[test]
    fn parses_a_single_facility_config() {
        let config: ScenarioConfig = serde_json::from_str(SINGLE_FACILITY_JSON).unwrap();
        assert_eq!(config.facilities, ["Factory1"]);
        assert_eq!(config.periods, [0, 1, 2, 3]);
        assert_eq!(config.demand("ProductA", 2).unwrap(), 160.0);
        assert_eq!(config.initial_inventory("Factory1", "ProductA"), 100.0);
        assert!(config.material_requirements.is_empty());
    }

    #[test]
    fn missing_demand_names_the_key() {
        let config: ScenarioConfig = serde_json::from_str(SINGLE_FACILITY_JSON).unwrap();
        let err = config.demand("ProductA", 9).unwrap_err();
        let plan_err = err.downcast_ref::<PlanError>().expect("typed error");
        assert!(matches!(plan_err, PlanError::MissingParameter(key) if key == "demand[ProductA][9]"));
    }

    #[test]
    fn initial_inventory_defaults_to_zero() {
        let config: ScenarioConfig = serde_json::from_str(SINGLE_FACILITY_JSON).unwrap();
        assert_eq!(config.initial_inventory("Factory1", "ProductB"), 0.0);
        assert_eq!(config.initial_inventory("Factory9", "ProductA"), 0.0);
    }

    #[test]
    fn missing_cost_entry_is_a_typed_error() {
        let config: ScenarioConfig = serde_json::from_str(SINGLE_FACILITY_JSON).unwrap();
        let err = config
            .cost_parameters
            .production("Factory1", "ProductB")
            .unwrap_err();
        assert!(
            err.downcast_ref::<PlanError>()
                .map(|e| matches!(e, PlanError::MissingParameter(_)))
                .unwrap_or(false)
        );
    }

    #[test]
    fn material_capacity_is_required_when_table_present() {
        let mut config: ScenarioConfig = serde_json::from_str(SINGLE_FACILITY_JSON).unwrap();
        config.material_requirements.insert(
            "Raw_Material_A".to_string(),
            HashMap::from([("ProductA".to_string(), 2.0)]),
        );
        assert_eq!(config.material_usage("Raw_Material_A", "ProductA"), 2.0);
        assert_eq!(config.material_usage("Raw_Material_A", "ProductB"), 0.0);
        assert!(config.material_capacity("Raw_Material_A").is_err());
    }
}
