#![cfg(feature = "coin_cbc")]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use supplyplan::lp::{SolveStatus, default_solver};
use supplyplan::runner::{run_scenario, run_scenarios};
use supplyplan::scenario::ScenarioConfig;
use tempfile::TempDir;

const TOLERANCE: f64 = 1e-4;

fn single_facility_config() -> ScenarioConfig {
    serde_json::from_value(serde_json::json!({
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
    }))
    .expect("valid config")
}

fn two_facility_config() -> ScenarioConfig {
    serde_json::from_value(serde_json::json!({
        "facilities": ["Factory1", "Warehouse1"],
        "products": ["ProductA"],
        "periods": [0, 1],
        "demand": {"ProductA": {"0": 50, "1": 60}},
        "workforce_params": {"min_skilled": 1, "max_hire": 3, "skill_mix_ratio": 0.3},
        "production_params": {
            "regular_capacity": 400,
            "max_overtime": 40,
            "setup_time": 2,
            "production_time": {"ProductA": 1},
            "min_production": {"ProductA": 10},
            "max_inventory": {"ProductA": 300}
        },
        "cost_parameters": {
            "production_cost": {"Factory1": {"ProductA": 10}, "Warehouse1": {"ProductA": 1000}},
            "setup_cost": {"Factory1": {"ProductA": 100}, "Warehouse1": {"ProductA": 100}},
            "inventory_cost": {"Factory1": {"ProductA": 2}, "Warehouse1": {"ProductA": 1}},
            "backlog_cost": {"Factory1": {"ProductA": 250}, "Warehouse1": {"ProductA": 250}},
            "transport_cost": {
                "Factory1": {"Warehouse1": 1},
                "Warehouse1": {"Factory1": 1}
            },
            "workforce_cost": {
                "Factory1": {"skilled": 50, "unskilled": 30},
                "Warehouse1": {"skilled": 45, "unskilled": 25}
            },
            "hire_cost": 800,
            "fire_cost": 1200,
            "overtime_cost": 40
        }
    }))
    .expect("valid config")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

#[test]
fn single_facility_plan_balances_every_period() {
    let config = single_facility_config();
    let solver = default_solver().expect("cbc backend compiled in");
    let outcome = run_scenario(&config, solver.as_ref()).expect("solver invocation");

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let results = outcome.results.expect("optimal outcome has results");

    // Flow conservation: opening stock + production - closing stock
    // + backlog delta must equal demand in every period.
    let mut opening_inventory = 100.0;
    let mut previous_backlog = 0.0;
    for (record, stock) in results.production.iter().zip(&results.inventory) {
        let demand = config.demand("ProductA", record.period).unwrap();
        let flow =
            record.quantity + opening_inventory - stock.inventory + stock.backlog - previous_backlog;
        assert!(
            approx(flow, demand),
            "period {}: flow {} != demand {}",
            record.period,
            flow,
            demand
        );
        opening_inventory = stock.inventory;
        previous_backlog = stock.backlog;
    }
}

#[test]
fn production_implies_setup_and_minimum_lot() {
    let config = single_facility_config();
    let solver = default_solver().unwrap();
    let outcome = run_scenario(&config, solver.as_ref()).unwrap();

    let results = outcome.results.expect("optimal outcome has results");
    for record in &results.production {
        if record.quantity > TOLERANCE {
            assert!(
                record.setup,
                "period {} produced without setup",
                record.period
            );
            assert!(
                record.quantity >= 30.0 - TOLERANCE,
                "period {} lot {} below minimum",
                record.period,
                record.quantity
            );
        }
    }
}

#[test]
fn inventory_stays_under_its_ceiling() {
    let solver = default_solver().unwrap();
    let outcome = run_scenario(&single_facility_config(), solver.as_ref()).unwrap();

    let results = outcome.results.unwrap();
    for record in &results.inventory {
        assert!(record.inventory <= 200.0 + TOLERANCE);
        assert!(record.inventory >= -TOLERANCE);
        assert!(record.backlog >= -TOLERANCE);
    }
}

#[test]
fn repeated_solves_are_deterministic() {
    let config = single_facility_config();
    let solver = default_solver().unwrap();

    let first = run_scenario(&config, solver.as_ref()).unwrap();
    let second = run_scenario(&config, solver.as_ref()).unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.objective, second.objective);

    let a = first.results.unwrap();
    let b = second.results.unwrap();
    for (x, y) in a.production.iter().zip(&b.production) {
        assert_eq!(x.quantity, y.quantity);
        assert_eq!(x.setup, y.setup);
    }
}

#[test]
fn expensive_local_production_is_replaced_by_transport() {
    let config = two_facility_config();
    let solver = default_solver().unwrap();
    let outcome = run_scenario(&config, solver.as_ref()).unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let results = outcome.results.unwrap();

    // Warehouse production costs 100x the lane cost, so its demand should be
    // served by shipments from the factory.
    assert!(!results.transportation.is_empty());
    for record in &results.transportation {
        assert_eq!(record.from_facility, "Factory1");
        assert_eq!(record.to_facility, "Warehouse1");
        assert!(record.quantity > 0.0);
    }
}

#[test]
fn impossible_staffing_reports_infeasible() {
    let mut config = single_facility_config();
    config.workforce_params.max_hire = 0.0;
    config.workforce_params.initial_workforce.insert(
        "Factory1".to_string(),
        serde_json::from_value(serde_json::json!({"skilled": 0, "unskilled": 0})).unwrap(),
    );

    let solver = default_solver().unwrap();
    let outcome = run_scenario(&config, solver.as_ref()).unwrap();

    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.results.is_none());
    assert!(outcome.objective.is_none());
}

#[test]
fn batch_solves_every_scenario_by_name() {
    let mut batch = BTreeMap::new();
    batch.insert("base".to_string(), single_facility_config());
    batch.insert("two_site".to_string(), two_facility_config());

    let solver = default_solver().unwrap();
    let outcomes = run_scenarios(&batch, solver.as_ref()).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes["base"].status, SolveStatus::Optimal);
    assert_eq!(outcomes["two_site"].status, SolveStatus::Optimal);
}

mod cli {
    use super::*;

    fn write_batch_file(dir: &TempDir) -> PathBuf {
        let raw = r#"{
            "Base_Scenario": {
                "facilities": ["Factory1"],
                "products": ["ProductA"],
                "periods": [0, 1],
                "demand": {"ProductA": {"0": 50, "1": 60}},
                "workforce_params": {"min_skilled": 1, "max_hire": 3, "skill_mix_ratio": 0.3},
                "production_params": {
                    "regular_capacity": 200,
                    "max_overtime": 20,
                    "setup_time": 2,
                    "production_time": {"ProductA": 1},
                    "min_production": {"ProductA": 10},
                    "max_inventory": {"ProductA": 300}
                },
                "cost_parameters": {
                    "production_cost": {"Factory1": {"ProductA": 10}},
                    "setup_cost": {"Factory1": {"ProductA": 100}},
                    "inventory_cost": {"Factory1": {"ProductA": 2}},
                    "backlog_cost": {"Factory1": {"ProductA": 25}},
                    "workforce_cost": {"Factory1": {"skilled": 50, "unskilled": 30}},
                    "hire_cost": 800,
                    "fire_cost": 1200,
                    "overtime_cost": 40
                }
            }
        }"#;
        let path = dir.path().join("scenarios.json");
        fs::write(&path, raw).expect("write batch file");
        path
    }

    #[test]
    fn run_command_writes_json_outcomes() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_batch_file(&dir);
        let json_out = dir.path().join("outcomes.json");

        let output = Command::new("cargo")
            .args(["run", "--quiet", "--", "run"])
            .arg(&input)
            .arg("--json")
            .arg(&json_out)
            .output()
            .expect("run binary");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(
            String::from_utf8_lossy(&output.stdout).contains("Base_Scenario"),
            "comparison table names the scenario"
        );

        let outcomes: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_out).expect("json output"))
                .expect("valid json");
        assert_eq!(outcomes["Base_Scenario"]["status"], "optimal");
        assert!(outcomes["Base_Scenario"]["objective"].is_number());
    }

    #[test]
    fn check_command_reports_model_sizes() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_batch_file(&dir);

        let output = Command::new("cargo")
            .args(["run", "--quiet", "--", "check"])
            .arg(&input)
            .output()
            .expect("run binary");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(String::from_utf8_lossy(&output.stdout).contains("Base_Scenario"));
    }
}
