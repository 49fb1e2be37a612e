//! LP formulation and solve for a fixed target rate (spec §4.5/F2).
//!
//! One decision variable per recipe: crafts/min on that recipe's machines,
//! counted *before* the productivity bonus is applied to its outputs. The
//! objective minimizes total machines; item balance and machine-capacity
//! constraints are named so the caller can read back which ones bind.

use crate::factory::model::{classify, ItemClass};
use crate::factory::request::FactoryRequest;
use crate::types::LP_TIME_LIMIT_SECONDS;
use good_lp::solvers::minilp::minilp;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use std::collections::BTreeMap;
use std::time::Instant;

/// An LP built for one target rate, with enough bookkeeping to read back a
/// solution or inspect which constraints are binding.
pub struct RecipeLp {
    /// Recipe name -> its activity variable.
    pub vars: BTreeMap<String, Variable>,
    vars_builder: ProblemVariables,
    objective: Expression,
    item_constraints: Vec<(String, good_lp::Constraint)>,
    machine_constraints: Vec<(String, good_lp::Constraint)>,
}

/// Build the LP for `req` at a given `target_rate`, overriding the
/// request's own `target.rate_per_min` (used by the binary-search
/// fallback).
pub fn build(req: &FactoryRequest, target_rate: f64) -> RecipeLp {
    let mut vars_builder = ProblemVariables::new();
    let mut vars = BTreeMap::new();
    for name in req.recipes.keys() {
        vars.insert(name.clone(), vars_builder.add(variable().min(0.0)));
    }

    let mut objective = Expression::from(0.0);
    for (name, r) in &req.recipes {
        let x = vars[name];
        objective += x * (1.0 / req.eff(r));
    }

    let mut net_production: BTreeMap<String, Expression> = BTreeMap::new();
    for (name, r) in &req.recipes {
        let x = vars[name];
        let prod = req.prod(r);
        for (item, qty) in &r.outputs {
            *net_production.entry(item.clone()).or_insert_with(|| Expression::from(0.0)) +=
                x * (*qty * prod);
        }
        for (item, qty) in &r.inputs {
            *net_production.entry(item.clone()).or_insert_with(|| Expression::from(0.0)) -= x * *qty;
        }
    }

    let classes = classify(req);
    let mut item_constraints = Vec::new();
    for (item, class) in classes {
        let net = net_production
            .remove(&item)
            .unwrap_or_else(|| Expression::from(0.0));
        match class {
            ItemClass::Target => {
                item_constraints.push((item.clone(), constraint!(net.clone() == target_rate)));
            }
            ItemClass::Intermediate => {
                item_constraints.push((item.clone(), constraint!(net.clone() == 0.0)));
            }
            ItemClass::Byproduct => {
                item_constraints.push((item.clone(), constraint!(net.clone() >= 0.0)));
            }
            ItemClass::Raw => {
                let cap = req.limits.raw_supply_per_min.get(&item).copied().unwrap_or(0.0);
                item_constraints.push((format!("{item}#cap"), constraint!(net.clone() <= 0.0)));
                item_constraints.push((item.clone(), constraint!(net >= -cap)));
            }
        }
    }

    let mut by_class: BTreeMap<&str, Expression> = BTreeMap::new();
    for (name, r) in &req.recipes {
        let x = vars[name];
        *by_class
            .entry(r.machine.as_str())
            .or_insert_with(|| Expression::from(0.0)) += x * (1.0 / req.eff(r));
    }
    let mut machine_constraints = Vec::new();
    for (class, cap) in &req.limits.max_machines {
        let usage = by_class
            .get(class.as_str())
            .cloned()
            .unwrap_or_else(|| Expression::from(0.0));
        machine_constraints.push((class.clone(), constraint!(usage <= *cap)));
    }

    RecipeLp {
        vars,
        vars_builder,
        objective,
        item_constraints,
        machine_constraints,
    }
}

/// Outcome of solving a [`RecipeLp`].
pub enum LpOutcome {
    /// Solved to optimality; recipe name -> activity level (crafts/min,
    /// pre-productivity).
    Optimal(BTreeMap<String, f64>),
    /// No feasible activity assignment exists at this target rate.
    Infeasible,
}

impl RecipeLp {
    /// Run the solve with the bundled deterministic, single-threaded
    /// backend (spec §4.8: `minilp`, no FFI, no external time-sharing).
    /// A solve that runs past `LP_TIME_LIMIT_SECONDS` (spec §5) is treated
    /// the same as an infeasible result rather than trusted.
    pub fn solve(self) -> LpOutcome {
        let started = Instant::now();
        let mut model = self.vars_builder.minimise(self.objective).using(minilp);
        for (_, c) in self.item_constraints.iter().chain(self.machine_constraints.iter()) {
            model = model.with(c.clone());
        }

        let result = model.solve();
        if started.elapsed().as_secs_f64() > LP_TIME_LIMIT_SECONDS {
            tracing::warn!("LP solve exceeded time budget, treating as infeasible");
            return LpOutcome::Infeasible;
        }

        match result {
            Ok(solution) => {
                let values = self
                    .vars
                    .iter()
                    .map(|(name, var)| (name.clone(), solution.value(*var)))
                    .collect();
                LpOutcome::Optimal(values)
            }
            Err(_) => LpOutcome::Infeasible,
        }
    }
}
</content>
</invoke>
