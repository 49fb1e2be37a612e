//! BELTS solve driver (spec §4.1–§4.3, B1–B3).
//!
//! Three flow problems run over the same reduced arena:
//!
//! 1. A dummy-source/dummy-sink circulation that checks whether the lower
//!    bounds stripped off edges can be satisfied at all, ignoring imbalance
//!    at source and sink nodes (an intentional asymmetry, see DESIGN.md).
//! 2. A super-source max-flow from the aggregated supply to the sink on the
//!    `hi - lo` reduced capacities.
//! 3. Flow reconstruction: add the stripped-off `lo` back onto whatever the
//!    super-source flow pushed through each reduced edge.

use crate::belts::reduce::{reduce, Reduced};
use crate::belts::request::{BeltsRequest, BeltsResponse, Deficit, FlowEdge, TightEdge, TightEdgeList, TightList};
use crate::graph::{max_flow, reachable};
use crate::types::EPS_EQUALITY;
use std::collections::{BTreeMap, BTreeSet};

/// Solve a validated BELTS request.
///
/// Callers must run [`BeltsRequest::validate`] first; this function assumes
/// the request is structurally sound and only reports *flow* infeasibility.
pub fn solve_belts(req: &BeltsRequest) -> BeltsResponse {
    let reduced = reduce(req);
    tracing::debug!(arena_nodes = reduced.arena_len, "node splitting and lower-bound reduction done");

    if let Some(resp) = check_internal_circulation(&reduced) {
        tracing::debug!("internal-imbalance circulation infeasible");
        return resp;
    }
    tracing::debug!("internal-imbalance circulation satisfied");

    solve_super_source_flow(req, &reduced)
}

/// Step 1: can the excess created by stripping lower bounds off edges be
/// balanced through every node that isn't a source or the sink?
fn check_internal_circulation(reduced: &Reduced) -> Option<BeltsResponse> {
    let dummy_source = reduced.arena_len;
    let dummy_sink = reduced.arena_len + 1;
    let (mut net, edge_idx) = reduced.build_network(reduced.arena_len + 2);

    let excluded: BTreeSet<usize> = reduced
        .source_idx
        .iter()
        .copied()
        .chain(std::iter::once(reduced.sink_idx))
        .collect();

    let mut total_excess_pos = 0.0_f64;
    for (idx, &e) in reduced.excess.iter().enumerate() {
        if excluded.contains(&idx) {
            continue;
        }
        if e > EPS_EQUALITY {
            net.add_edge(dummy_source, idx, e);
            total_excess_pos += e;
        } else if e < -EPS_EQUALITY {
            net.add_edge(idx, dummy_sink, -e);
        }
    }

    let achieved = max_flow(&mut net, dummy_source, dummy_sink);
    if achieved + EPS_EQUALITY >= total_excess_pos {
        return None;
    }

    let reach = reachable(&net, dummy_source);
    let reach_set: BTreeSet<usize> = reach.iter().copied().collect();
    let cut_reachable = names_excluding(reduced, &reach, &[dummy_source, dummy_sink]);
    let (tight_nodes, tight_edges) = saturated_cut(reduced, &net, &edge_idx, &reach_set);

    Some(BeltsResponse::Infeasible {
        cut_reachable,
        deficit: Deficit {
            demand_balance: crate::types::round2(total_excess_pos - achieved),
            tight_nodes,
            tight_edges,
        },
    })
}

/// Step 2/3: push the aggregated supply through the reduced network and
/// reconstruct per-edge flow, or certify the shortfall.
fn solve_super_source_flow(req: &BeltsRequest, reduced: &Reduced) -> BeltsResponse {
    let super_source = reduced.arena_len;
    let (mut net, edge_idx) = reduced.build_network(reduced.arena_len + 1);

    let mut total_adjusted_supply = 0.0_f64;
    for (_, in_idx, adjusted) in &reduced.sources {
        let cap = adjusted.max(0.0);
        net.add_edge(super_source, *in_idx, cap);
        total_adjusted_supply += cap;
    }

    let achieved = max_flow(&mut net, super_source, reduced.sink_idx);
    tracing::debug!(achieved, total_adjusted_supply, "main flow result");

    if achieved + EPS_EQUALITY < total_adjusted_supply {
        let reach = reachable(&net, super_source);
        let reach_set: BTreeSet<usize> = reach.iter().copied().collect();
        let cut_reachable = names_excluding(reduced, &reach, &[super_source]);
        let (tight_nodes, tight_edges) = saturated_cut(reduced, &net, &edge_idx, &reach_set);

        return BeltsResponse::Infeasible {
            cut_reachable,
            deficit: Deficit {
                demand_balance: crate::types::round2(total_adjusted_supply - achieved),
                tight_nodes,
                tight_edges,
            },
        };
    }

    let mut flows = Vec::new();
    for (&pos, (from, to, lo)) in &reduced.edge_origin {
        let edge = edge_idx[pos];
        let total = net.flow(edge) + lo;
        let rounded = crate::types::round2(total);
        if rounded > 1e-9 {
            flows.push(FlowEdge {
                from: from.clone(),
                to: to.clone(),
                flow: rounded,
            });
        }
    }
    flows.sort_by(|a, b| (a.from.as_str(), a.to.as_str()).cmp(&(b.from.as_str(), b.to.as_str())));

    let total_flow = crate::types::round2(
        flows.iter().filter(|f| f.to == req.sink).map(|f| f.flow).sum(),
    );

    BeltsResponse::Feasible { total_flow, flows }
}

/// Arena indices mapped back to original node names, excluding the given
/// virtual indices and de-duplicating split nodes' in/out slots, sorted.
fn names_excluding(reduced: &Reduced, idxs: &[usize], exclude: &[usize]) -> Vec<String> {
    let mut names: BTreeSet<String> = BTreeSet::new();
    for &idx in idxs {
        if exclude.contains(&idx) {
            continue;
        }
        names.insert(reduced.name_of(idx).to_string());
    }
    names.into_iter().collect()
}

/// Find up to two node-cap edges and up to two request edges that cross
/// the reachable/unreachable boundary with zero residual capacity, i.e.
/// the edges actually certifying the cut.
fn saturated_cut(
    reduced: &Reduced,
    net: &crate::graph::FlowNetwork,
    edge_idx: &[usize],
    reachable_set: &BTreeSet<usize>,
) -> (TightList, TightEdgeList) {
    let mut cap_pos_to_name = std::collections::BTreeMap::new();
    for (name, &pos) in &reduced.cap_edge_pos {
        cap_pos_to_name.insert(pos, name.clone());
    }

    let mut tight_nodes: BTreeSet<String> = BTreeSet::new();
    let mut tight_edges: BTreeMap<(String, String), f64> = BTreeMap::new();

    for (pos, &(from, to, cap)) in reduced.base_edges.iter().enumerate() {
        if !reachable_set.contains(&from) || reachable_set.contains(&to) {
            continue;
        }
        let edge = edge_idx[pos];
        if net.residual(edge) > crate::types::EPS_RESIDUAL {
            continue;
        }
        if let Some(name) = cap_pos_to_name.get(&pos) {
            tight_nodes.insert(name.clone());
        } else if let Some((orig_from, orig_to, lo)) = reduced.edge_origin.get(&pos) {
            tight_edges.insert((orig_from.clone(), orig_to.clone()), lo + cap);
        }
    }

    let edges: TightEdgeList = tight_edges
        .into_iter()
        .take(2)
        .map(|((from, to), flow_needed)| TightEdge { from, to, flow_needed })
        .collect();

    (tight_nodes.into_iter().take(2).collect(), edges)
}
