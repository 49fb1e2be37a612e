//! FACTORY solve driver: solve at `target.rate_per_min`, or binary-search
//! down to whatever rate is achievable (spec §4.6/F3).

use crate::factory::lp::{self, LpOutcome};
use crate::factory::model::{classify, ItemClass};
use crate::factory::request::{FactoryRequest, FactoryResponse, HintList};
use crate::types::{round2, BINARY_SEARCH_MAX_ITERS, BINARY_SEARCH_MIN_INTERVAL};
use std::collections::BTreeMap;

/// Solve a validated FACTORY request.
pub fn solve_factory(req: &FactoryRequest) -> FactoryResponse {
    tracing::debug!(recipes = req.recipes.len(), "LP formulation built");
    match lp::build(req, req.target.rate_per_min).solve() {
        LpOutcome::Optimal(activities) => optimal_response(req, &activities),
        LpOutcome::Infeasible => {
            tracing::debug!("LP infeasible at requested rate, entering binary search");
            binary_search_response(req)
        }
    }
}

fn optimal_response(req: &FactoryRequest, activities: &BTreeMap<String, f64>) -> FactoryResponse {
    let mut per_recipe_crafts_per_min = BTreeMap::new();
    let mut per_machine_counts: BTreeMap<String, f64> = BTreeMap::new();
    let mut net_production: BTreeMap<String, f64> = BTreeMap::new();

    for (name, r) in &req.recipes {
        let x = activities.get(name).copied().unwrap_or(0.0);
        let prod = req.prod(r);
        let eff = req.eff(r);

        if x > 1e-9 {
            per_recipe_crafts_per_min.insert(name.clone(), round2(x * prod));
        }
        *per_machine_counts.entry(r.machine.clone()).or_insert(0.0) += x / eff;

        for (item, qty) in &r.outputs {
            *net_production.entry(item.clone()).or_insert(0.0) += x * qty * prod;
        }
        for (item, qty) in &r.inputs {
            *net_production.entry(item.clone()).or_insert(0.0) -= x * qty;
        }
    }
    per_machine_counts.retain(|_, count| *count > 1e-9);
    for count in per_machine_counts.values_mut() {
        *count = round2(*count);
    }

    let mut raw_consumption_per_min = BTreeMap::new();
    let mut byproduct_surplus_per_min = BTreeMap::new();

    for (item, class) in classify(req) {
        let net = net_production.get(&item).copied().unwrap_or(0.0);
        match class {
            ItemClass::Raw => {
                if net < -1e-9 {
                    raw_consumption_per_min.insert(item, round2(-net));
                }
            }
            ItemClass::Byproduct => {
                if net > 1e-9 {
                    byproduct_surplus_per_min.insert(item, round2(net));
                }
            }
            ItemClass::Target | ItemClass::Intermediate => {}
        }
    }

    FactoryResponse::Optimal {
        per_recipe_crafts_per_min,
        per_machine_counts,
        raw_consumption_per_min,
        byproduct_surplus_per_min,
    }
}

/// Binary-search the highest `target.rate_per_min` that still solves
/// (spec §4.6).
fn binary_search_response(req: &FactoryRequest) -> FactoryResponse {
    let mut lo = 0.0_f64;
    let mut hi = req.target.rate_per_min;

    for iter in 0..BINARY_SEARCH_MAX_ITERS {
        if hi - lo < BINARY_SEARCH_MIN_INTERVAL {
            break;
        }
        let mid = (lo + hi) / 2.0;
        match lp::build(req, mid).solve() {
            LpOutcome::Optimal(_) => lo = mid,
            LpOutcome::Infeasible => hi = mid,
        }
        tracing::debug!(iter, lo, hi, "binary search iteration");
    }

    let max_feasible_target_per_min = round2(lo);
    let bottleneck_hint = bottleneck_hint(req, max_feasible_target_per_min);

    FactoryResponse::Infeasible {
        max_feasible_target_per_min,
        bottleneck_hint,
    }
}

/// Hint at what to relax: every machine class's `"<class> cap"` (sorted),
/// followed by every raw item with a supply entry's `"<item> supply"`
/// (sorted), truncated to two entries. Unconditional — it does not check
/// whether a constraint actually binds in the best achievable solution, only
/// whether the achievable rate fell noticeably short of the request (spec
/// §4.6: below 95% of the target, otherwise `"unknown"`).
fn bottleneck_hint(req: &FactoryRequest, achievable_rate: f64) -> HintList {
    if achievable_rate >= 0.95 * req.target.rate_per_min {
        return HintList::from_iter([String::from("unknown")]);
    }

    let mut hints: Vec<String> = Vec::new();
    for class in req.machines.keys() {
        hints.push(format!("{class} cap"));
    }
    for (item, _) in classify(req)
        .into_iter()
        .filter(|(_, class)| *class == ItemClass::Raw)
    {
        if req.limits.raw_supply_per_min.contains_key(&item) {
            hints.push(format!("{item} supply"));
        }
    }

    hints.truncate(2);
    if hints.is_empty() {
        hints.push("unknown".to_string());
    }
    HintList::from_iter(hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::request::{Limits, MachineSpec, ModuleSpec, RecipeEntry, Target};

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
    fn simple_chain_hits_target_exactly() {
        let req = FactoryRequest {
            machines: machines(&[("furnace", 60.0)]),
            recipes: [("smelt".to_string(), recipe("furnace", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
                .into_iter()
                .collect(),
            modules: BTreeMap::new(),
            limits: Limits {
                raw_supply_per_min: [("ore".to_string(), 1000.0)].into_iter().collect(),
                max_machines: BTreeMap::new(),
            },
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 30.0,
            },
        };

        match solve_factory(&req) {
            FactoryResponse::Optimal {
                per_recipe_crafts_per_min,
                ..
            } => {
                assert_eq!(per_recipe_crafts_per_min["smelt"], 30.0);
            }
            FactoryResponse::Infeasible { .. } => panic!("expected optimal"),
        }
    }

    #[test]
    fn raw_supply_cap_forces_binary_search() {
        let req = FactoryRequest {
            machines: machines(&[("furnace", 60.0)]),
            recipes: [("smelt".to_string(), recipe("furnace", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
                .into_iter()
                .collect(),
            modules: BTreeMap::new(),
            limits: Limits {
                raw_supply_per_min: [("ore".to_string(), 5.0)].into_iter().collect(),
                max_machines: BTreeMap::new(),
            },
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 30.0,
            },
        };

        match solve_factory(&req) {
            FactoryResponse::Infeasible {
                max_feasible_target_per_min,
                bottleneck_hint,
            } => {
                assert!(max_feasible_target_per_min <= 5.0 + 0.01);
                assert!(bottleneck_hint.contains(&"ore supply".to_string()));
            }
            FactoryResponse::Optimal { .. } => panic!("expected infeasible"),
        }
    }

    #[test]
    fn module_bonus_carries_through_to_activity() {
        let req = FactoryRequest {
            machines: machines(&[("furnace", 30.0)]),
            recipes: [("smelt".to_string(), recipe("furnace", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]))]
                .into_iter()
                .collect(),
            modules: [(
                "furnace".to_string(),
                ModuleSpec { speed: 1.0, prod: 0.0 },
            )]
            .into_iter()
            .collect(),
            limits: Limits {
                raw_supply_per_min: [("ore".to_string(), 1000.0)].into_iter().collect(),
                max_machines: BTreeMap::new(),
            },
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 60.0,
            },
        };

        // eff = 30 * (1+1.0) * 60 / 1 = 3600 crafts/min; one machine easily
        // covers the 60/min target, so one furnace should suffice.
        match solve_factory(&req) {
            FactoryResponse::Optimal { per_machine_counts, .. } => {
                assert!(per_machine_counts["furnace"] < 1.0);
            }
            FactoryResponse::Infeasible { .. } => panic!("expected optimal"),
        }
    }
}
</content>
</invoke>
