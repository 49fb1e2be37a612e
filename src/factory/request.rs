//! FACTORY request/response JSON shapes (spec §6.4/§6.5).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Bottleneck hints cap at two entries, same convention as BELTS'
/// certificate lists (spec §6.5).
pub type HintList = SmallVec<[String; 2]>;

/// A machine class's baseline craft speed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MachineSpec {
    /// Crafts per minute at 1.0x speed with no modules installed.
    pub crafts_per_min: f64,
}

/// One craftable recipe: a fixed ratio of inputs to outputs, consumed and
/// produced once per `time_s` seconds on one machine of `machine`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecipeEntry {
    /// The machine class this recipe runs on.
    pub machine: String,
    /// Seconds a single craft takes at the machine's base speed.
    pub time_s: f64,
    /// Item -> quantity consumed per craft. May be empty.
    #[serde(rename = "in", default)]
    pub inputs: BTreeMap<String, f64>,
    /// Item -> quantity produced per craft (before the productivity bonus).
    #[serde(rename = "out")]
    pub outputs: BTreeMap<String, f64>,
}

/// Fractional speed/productivity bonuses stacked onto a machine class by
/// whatever modules are installed in it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleSpec {
    /// Additive speed bonus (e.g. `0.5` for +50% crafts/min).
    #[serde(default)]
    pub speed: f64,
    /// Additive productivity bonus, applied to output quantities only.
    #[serde(default)]
    pub prod: f64,
}

/// Raw-material intake and machine-count ceilings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Limits {
    /// Item -> maximum intake rate (units/min) for raw materials.
    #[serde(default)]
    pub raw_supply_per_min: BTreeMap<String, f64>,
    /// Machine class -> maximum number of machines of that class available.
    #[serde(default)]
    pub max_machines: BTreeMap<String, f64>,
}

/// The item and rate a plan must produce.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Target {
    /// The item the plan must produce.
    pub item: String,
    /// Desired output rate (units/min) of `item`.
    pub rate_per_min: f64,
}

/// Top-level FACTORY request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FactoryRequest {
    /// Every machine class available to the plan.
    pub machines: BTreeMap<String, MachineSpec>,
    /// Every recipe available to the plan, keyed by name.
    pub recipes: BTreeMap<String, RecipeEntry>,
    /// Per-machine-class module bonuses. Classes absent here run unboosted.
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleSpec>,
    /// Raw-supply and machine-count ceilings.
    #[serde(default)]
    pub limits: Limits,
    /// The demanded item and rate.
    pub target: Target,
}

impl FactoryRequest {
    /// Effective crafts per minute per machine running `recipe` (spec §3.2).
    pub fn eff(&self, recipe: &RecipeEntry) -> f64 {
        let base_speed = self
            .machines
            .get(&recipe.machine)
            .map(|m| m.crafts_per_min)
            .unwrap_or(0.0);
        let speed_mod = self.modules.get(&recipe.machine).map(|m| m.speed).unwrap_or(0.0);
        base_speed * (1.0 + speed_mod) * 60.0 / recipe.time_s
    }

    /// Output multiplier from the productivity bonus on `recipe`'s machine.
    pub fn prod(&self, recipe: &RecipeEntry) -> f64 {
        let prod_mod = self.modules.get(&recipe.machine).map(|m| m.prod).unwrap_or(0.0);
        1.0 + prod_mod
    }

    /// Validate structural invariants the model builder assumes hold.
    pub fn validate(&self) -> Result<()> {
        if self.machines.is_empty() {
            return Err(Error::malformed("machines must not be empty"));
        }
        if self.recipes.is_empty() {
            return Err(Error::malformed("recipes must not be empty"));
        }
        if self.target.item.is_empty() {
            return Err(Error::malformed("target.item must not be empty"));
        }
        if self.target.rate_per_min <= 0.0 {
            return Err(Error::malformed("target.rate_per_min must be positive"));
        }

        for (class, m) in &self.machines {
            if m.crafts_per_min <= 0.0 {
                return Err(Error::malformed(format!(
                    "machine '{class}' has non-positive crafts_per_min"
                )));
            }
        }

        for (name, r) in &self.recipes {
            if !self.machines.contains_key(&r.machine) {
                return Err(Error::malformed(format!(
                    "recipe '{name}' references unknown machine '{}'",
                    r.machine
                )));
            }
            if r.time_s <= 0.0 {
                return Err(Error::malformed(format!("recipe '{name}' has non-positive time_s")));
            }
            if r.outputs.is_empty() {
                return Err(Error::malformed(format!("recipe '{name}' has no outputs")));
            }
        }

        for (class, m) in &self.modules {
            if m.speed < 0.0 {
                return Err(Error::malformed(format!("module bonus for '{class}' has negative speed")));
            }
            if m.prod < 0.0 {
                return Err(Error::malformed(format!("module bonus for '{class}' has negative prod")));
            }
        }

        for (item, cap) in &self.limits.raw_supply_per_min {
            if *cap < 0.0 {
                return Err(Error::malformed(format!("raw supply for '{item}' is negative")));
            }
        }
        for (class, cap) in &self.limits.max_machines {
            if *cap < 0.0 {
                return Err(Error::malformed(format!("machine cap for '{class}' is negative")));
            }
        }

        Ok(())
    }
}

/// FACTORY response (spec §6.5): either an optimal plan, or the best
/// achievable rate with a hint at what's constraining it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FactoryResponse {
    /// The full target rate is achievable; this is the minimum-machine
    /// plan that does it.
    #[serde(rename = "ok")]
    Optimal {
        /// Recipe name -> item output rate (activity times productivity).
        per_recipe_crafts_per_min: BTreeMap<String, f64>,
        /// Machine class -> machines used.
        per_machine_counts: BTreeMap<String, f64>,
        /// Raw item -> consumption rate.
        raw_consumption_per_min: BTreeMap<String, f64>,
        /// Byproduct item -> surplus production rate. Omitted when empty.
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        byproduct_surplus_per_min: BTreeMap<String, f64>,
    },
    /// `target.rate_per_min` is not reachable; this is the highest rate a
    /// binary search found to still be feasible.
    Infeasible {
        /// Highest output rate of `target.item` found to be achievable.
        max_feasible_target_per_min: f64,
        /// Up to two `"<name> cap"` / `"<name> supply"` hints, or
        /// `["unknown"]` when the shortfall couldn't be pinned down.
        bottleneck_hint: HintList,
    },
}
</content>
</invoke>
