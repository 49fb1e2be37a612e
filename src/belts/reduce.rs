//! Node splitting, lower-bound elimination, and super-source aggregation
//! that turn a BELTS request into a plain max-flow problem (spec §4.1/B1).

use crate::belts::request::BeltsRequest;
use crate::graph::FlowNetwork;
use std::collections::{BTreeMap, BTreeSet};

/// One base edge in the reduced network, before any dummy/super-source
/// wiring: `(from_idx, to_idx, capacity)`.
type BaseEdge = (usize, usize, f64);

/// A request's node-split, lower-bound-eliminated arena, ready to have a
/// super-source (for the real solve) or dummy source/sink (for the
/// feasibility pre-check) wired on top.
pub struct Reduced {
    /// Number of arena nodes used by `base_edges` (not counting any
    /// super-source/dummy nodes a caller adds on top).
    pub arena_len: usize,
    /// Reduced-network edges: `(hi - lo)` capacity edges for every merged
    /// request edge, plus one capacity edge per capped node.
    pub base_edges: Vec<BaseEdge>,
    /// For each position in `base_edges` that came from a request edge
    /// (not a node-cap edge): `(orig_from, orig_to, lo)`.
    pub edge_origin: BTreeMap<usize, (String, String, f64)>,
    /// Position in `base_edges` of each capped node's cap edge, keyed by
    /// node name.
    pub cap_edge_pos: BTreeMap<String, usize>,
    /// Arena index each original node's "in" side maps to (equal to its
    /// single slot when the node isn't split).
    pub in_idx: BTreeMap<String, usize>,
    /// Arena index each original node's "out" side maps to (equal to
    /// `in_idx` when the node isn't split).
    pub out_idx: BTreeMap<String, usize>,
    /// Arena idx -> original node name, for both in- and out-slots.
    pub owner: Vec<String>,
    /// Excess injected (positive) or drained (negative) at each arena node
    /// by the lower bounds stripped off of edges (spec §4.1 step 2).
    pub excess: Vec<f64>,
    /// Sink's arena index.
    pub sink_idx: usize,
    /// Source node names that must be excluded from the internal-excess
    /// circulation check (spec's Open Question on source/sink exclusion).
    pub source_idx: BTreeSet<usize>,
    /// `(source node name, its in-slot arena index, adjusted supply)`.
    pub sources: Vec<(String, usize, f64)>,
}

impl Reduced {
    /// Build a fresh [`FlowNetwork`] containing exactly the reduced base
    /// edges, over `total_nodes` arena slots (`arena_len` plus whatever a
    /// caller plans to add on top). Returns the network and the
    /// `base_edges` position -> edge index mapping.
    pub fn build_network(&self, total_nodes: usize) -> (FlowNetwork, Vec<usize>) {
        let mut net = FlowNetwork::new(total_nodes);
        let mut edge_idx = Vec::with_capacity(self.base_edges.len());
        for &(from, to, cap) in &self.base_edges {
            edge_idx.push(net.add_edge(from, to, cap));
        }
        (net, edge_idx)
    }

    /// Map an arena index back to the original node name it belongs to.
    pub fn name_of(&self, idx: usize) -> &str {
        &self.owner[idx]
    }
}

/// Reduce a validated request into a node-split, lower-bound-free arena
/// (spec §4.1 B1). Assumes [`BeltsRequest::validate`] already passed.
pub fn reduce(req: &BeltsRequest) -> Reduced {
    let mut all_nodes: BTreeSet<String> = BTreeSet::new();
    for e in &req.edges {
        all_nodes.insert(e.from.clone());
        all_nodes.insert(e.to.clone());
    }
    for s in &req.sources {
        all_nodes.insert(s.node.clone());
    }
    all_nodes.insert(req.sink.clone());

    let source_names: BTreeSet<&str> = req.sources.iter().map(|s| s.node.as_str()).collect();

    // A node is split iff it carries a throughput cap and is neither the
    // sink nor a source: caps constrain pass-through, and source/sink
    // volume is already governed by supply and the max-flow value.
    let split_nodes: BTreeSet<&str> = req
        .node_caps
        .keys()
        .map(String::as_str)
        .filter(|n| *n != req.sink && !source_names.contains(n))
        .collect();

    let mut in_idx = BTreeMap::new();
    let mut out_idx = BTreeMap::new();
    let mut owner = Vec::new();
    let mut arena_len = 0usize;

    for name in &all_nodes {
        if split_nodes.contains(name.as_str()) {
            let i = arena_len;
            let o = arena_len + 1;
            arena_len += 2;
            owner.push(name.clone());
            owner.push(name.clone());
            in_idx.insert(name.clone(), i);
            out_idx.insert(name.clone(), o);
        } else {
            let i = arena_len;
            arena_len += 1;
            owner.push(name.clone());
            in_idx.insert(name.clone(), i);
            out_idx.insert(name.clone(), i);
        }
    }

    let mut excess = vec![0.0_f64; arena_len];
    let mut base_edges = Vec::new();
    let mut edge_origin = BTreeMap::new();
    let mut cap_edge_pos = BTreeMap::new();

    for name in &split_nodes {
        let cap = req.node_caps[*name];
        let pos = base_edges.len();
        base_edges.push((in_idx[*name], out_idx[*name], cap));
        cap_edge_pos.insert((*name).to_string(), pos);
    }

    // Parallel edges between the same (from, to) pair merge into one
    // reduced edge; their bounds sum (spec §4.1 edge cases).
    let mut merged: BTreeMap<(String, String), (f64, f64)> = BTreeMap::new();
    for e in &req.edges {
        let key = (e.from.clone(), e.to.clone());
        let entry = merged.entry(key).or_insert((0.0, 0.0));
        entry.0 += e.lo;
        entry.1 += e.hi;
    }

    for ((from, to), (lo, hi)) in merged {
        let u = out_idx[&from];
        let v = in_idx[&to];
        let pos = base_edges.len();
        base_edges.push((u, v, hi - lo));
        edge_origin.insert(pos, (from.clone(), to.clone(), lo));
        excess[v] += lo;
        excess[u] -= lo;
    }

    let sink_idx = in_idx[&req.sink];

    let mut source_idx = BTreeSet::new();
    let sources = req
        .sources
        .iter()
        .map(|s| {
            source_idx.insert(in_idx[&s.node]);
            let lo_out: f64 = req
                .edges
                .iter()
                .filter(|e| e.from == s.node)
                .map(|e| e.lo)
                .sum();
            (s.node.clone(), in_idx[&s.node], s.supply - lo_out)
        })
        .collect();

    Reduced {
        arena_len,
        base_edges,
        edge_origin,
        cap_edge_pos,
        in_idx,
        out_idx,
        owner,
        excess,
        sink_idx,
        source_idx,
        sources,
    }
}
