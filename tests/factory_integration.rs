//! End-to-end FACTORY scenarios (spec §8.2 S4–S6 style cases).

use factory_belts_core::factory::{solve_factory, FactoryRequest, FactoryResponse};
use factory_belts_core::factory::request::{Limits, MachineSpec, ModuleSpec, RecipeEntry, Target};
use std::collections::BTreeMap;

fn machines(entries: &[(&str, f64)]) -> BTreeMap<String, MachineSpec> {
    entries
        .iter()
        .map(|(name, cpm)| (name.to_string(), MachineSpec { crafts_per_min: *cpm }))
        .collect()
}

fn recipe(machine: &str, time_s: f64, inputs: &[(&str, f64)], outputs: &[(&str, f64)]) -> RecipeEntry {
    RecipeEntry {
        machine: machine.to_string(),
        time_s,
        inputs: inputs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        outputs: outputs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

#[test]
fn two_stage_chain_meets_target_with_machine_counts() {
    let req = FactoryRequest {
        machines: machines(&[("furnace", 60.0), ("assembler", 60.0)]),
        recipes: [
            ("smelt".to_string(), recipe("furnace", 2.0, &[("ore", 1.0)], &[("plate", 1.0)])),
            ("assemble".to_string(), recipe("assembler", 3.0, &[("plate", 2.0)], &[("gear", 1.0)])),
        ]
        .into_iter()
        .collect(),
        modules: BTreeMap::new(),
        limits: Limits {
            raw_supply_per_min: [("ore".to_string(), 1000.0)].into_iter().collect(),
            max_machines: BTreeMap::new(),
        },
        target: Target {
            item: "gear".to_string(),
            rate_per_min: 10.0,
        },
    };
    req.validate().expect("request should be well-formed");

    match solve_factory(&req) {
        FactoryResponse::Optimal {
            per_recipe_crafts_per_min,
            per_machine_counts,
            raw_consumption_per_min,
            ..
        } => {
            assert_eq!(per_recipe_crafts_per_min["assemble"], 10.0);
            assert!(per_machine_counts.contains_key("furnace"));
            assert!(per_machine_counts.contains_key("assembler"));
            assert!(raw_consumption_per_min.get("ore").copied().unwrap_or(0.0) > 0.0);
        }
        other => panic!("expected optimal, got {other:?}"),
    }
}

#[test]
fn productivity_bonus_raises_output_per_craft() {
    let req = FactoryRequest {
        machines: machines(&[("furnace", 60.0)]),
        recipes: [("smelt".to_string(), recipe("furnace", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
            .into_iter()
            .collect(),
        modules: [(
            "furnace".to_string(),
            ModuleSpec { speed: 0.0, prod: 1.0 },
        )]
        .into_iter()
        .collect(),
        limits: Limits {
            raw_supply_per_min: [("ore".to_string(), 1000.0)].into_iter().collect(),
            max_machines: BTreeMap::new(),
        },
        target: Target {
            item: "plate".to_string(),
            rate_per_min: 40.0,
        },
    };
    req.validate().expect("request should be well-formed");

    match solve_factory(&req) {
        FactoryResponse::Optimal {
            per_recipe_crafts_per_min,
            raw_consumption_per_min,
            ..
        } => {
            assert_eq!(per_recipe_crafts_per_min["smelt"], 40.0);
            // prod=1.0 doubles output per input unit, so ore consumption is
            // half the plate rate instead of matching it one-for-one.
            assert_eq!(raw_consumption_per_min.get("ore").copied().unwrap(), 20.0);
        }
        other => panic!("expected optimal, got {other:?}"),
    }
}

#[test]
fn machine_cap_below_requirement_triggers_binary_search() {
    let req = FactoryRequest {
        machines: machines(&[("furnace", 1.0)]),
        recipes: [("smelt".to_string(), recipe("furnace", 2.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
            .into_iter()
            .collect(),
        modules: BTreeMap::new(),
        limits: Limits {
            raw_supply_per_min: [("ore".to_string(), 1000.0)].into_iter().collect(),
            max_machines: [("furnace".to_string(), 1.0)].into_iter().collect(),
        },
        target: Target {
            item: "plate".to_string(),
            rate_per_min: 1000.0,
        },
    };
    req.validate().expect("request should be well-formed");

    match solve_factory(&req) {
        FactoryResponse::Infeasible {
            max_feasible_target_per_min,
            bottleneck_hint,
        } => {
            // eff() = 1.0 * (1+0) * 60 / 2.0 = 30 crafts/min with one machine.
            assert!((max_feasible_target_per_min - 30.0).abs() < 0.1);
            assert!(bottleneck_hint.contains(&"furnace cap".to_string()));
        }
        other => panic!("expected infeasible, got {other:?}"),
    }
}

#[test]
fn malformed_request_rejects_non_positive_time() {
    let req = FactoryRequest {
        machines: machines(&[("furnace", 1.0)]),
        recipes: [("smelt".to_string(), recipe("furnace", 0.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
            .into_iter()
            .collect(),
        modules: BTreeMap::new(),
        limits: Limits::default(),
        target: Target {
            item: "plate".to_string(),
            rate_per_min: 1.0,
        },
    };
    assert!(req.validate().is_err());
}
</content>
</invoke>
