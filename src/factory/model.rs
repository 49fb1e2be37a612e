//! Item classification from a recipe set's input/output shape (spec §4.4/F1).

use crate::factory::request::FactoryRequest;
use std::collections::BTreeSet;

/// How an item participates in the balance constraints of the LP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    /// The plan's goal: net production must equal `target_rate` exactly.
    Target,
    /// Consumed by some recipe, produced by none: net production must be
    /// non-positive and bounded by `raw_supply`.
    Raw,
    /// Both produced and consumed internally: net production must be zero.
    Intermediate,
    /// Produced, never consumed, not the target: net production may be
    /// positive (surplus is fine, it's simply discarded).
    Byproduct,
}

/// Classify every item mentioned by `req`'s recipes.
pub fn classify(req: &FactoryRequest) -> Vec<(String, ItemClass)> {
    let mut produced: BTreeSet<&str> = BTreeSet::new();
    let mut consumed: BTreeSet<&str> = BTreeSet::new();

    for r in req.recipes.values() {
        produced.extend(r.outputs.keys().map(String::as_str));
        consumed.extend(r.inputs.keys().map(String::as_str));
    }

    let mut all: BTreeSet<&str> = produced.union(&consumed).copied().collect();
    all.insert(req.target.item.as_str());

    all.into_iter()
        .map(|item| {
            let class = if item == req.target.item {
                ItemClass::Target
            } else if produced.contains(item) && consumed.contains(item) {
                ItemClass::Intermediate
            } else if consumed.contains(item) {
                ItemClass::Raw
            } else {
                ItemClass::Byproduct
            };
            (item.to_string(), class)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::request::{MachineSpec, RecipeEntry, Target};
    use std::collections::BTreeMap;

    fn recipe(inputs: &[(&str, f64)], outputs: &[(&str, f64)]) -> RecipeEntry {
        RecipeEntry {
            machine: "assembler".to_string(),
            time_s: 1.0,
            inputs: inputs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>(),
            outputs: outputs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn classifies_raw_intermediate_byproduct_target() {
        let req = FactoryRequest {
            machines: [(
                "assembler".to_string(),
                MachineSpec { crafts_per_min: 1.0 },
            )]
            .into_iter()
            .collect(),
            recipes: [
                ("smelt".to_string(), recipe(&[("ore", 1.0)], &[("plate", 1.0), ("slag", 0.1)])),
                ("assemble".to_string(), recipe(&[("plate", 2.0)], &[("gear", 1.0)])),
            ]
            .into_iter()
            .collect(),
            modules: BTreeMap::new(),
            limits: Default::default(),
            target: Target {
                item: "gear".to_string(),
                rate_per_min: 10.0,
            },
        };

        let classes: BTreeMap<_, _> = classify(&req).into_iter().collect();
        assert_eq!(classes["ore"], ItemClass::Raw);
        assert_eq!(classes["plate"], ItemClass::Intermediate);
        assert_eq!(classes["slag"], ItemClass::Byproduct);
        assert_eq!(classes["gear"], ItemClass::Target);
    }
}
</content>
</invoke>
