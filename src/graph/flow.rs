//! Edmonds–Karp maximum flow on a residual graph (spec §4.2 / B2).
//!
//! The network is an index-based arena: nodes are `usize` indices into a flat
//! `Vec`, edges are stored once per direction (forward + reverse) so that
//! residual capacity is always `capacity - flow` on the forward edge, and
//! pushing flow on the forward edge drains the paired reverse edge by the
//! same amount. Capacities are `f64` because BELTS `hi`/`lo`/`supply` values
//! are not required to be integral.

use crate::types::EPS_RESIDUAL;
use bitvec::vec::BitVec;
use std::collections::VecDeque;

/// One direction of a residual edge.
#[derive(Debug, Clone, Copy)]
struct FlowEdge {
    to: usize,
    capacity: f64,
    flow: f64,
    /// Index of the paired edge running the opposite direction.
    rev: usize,
}

/// A capacitated digraph over arena node indices, with reverse edges for
/// residual-graph bookkeeping already wired in.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    num_nodes: usize,
    adj: Vec<Vec<usize>>,
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    /// Create an empty network over `num_nodes` arena indices.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            adj: vec![Vec::new(); num_nodes],
            edges: Vec::new(),
        }
    }

    /// Number of arena nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Add a directed edge `from -> to` with the given capacity, along with
    /// its zero-capacity reverse edge. Returns the forward edge's index.
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: f64) -> usize {
        let fwd = self.edges.len();
        let rev = fwd + 1;
        self.edges.push(FlowEdge { to, capacity, flow: 0.0, rev });
        self.edges.push(FlowEdge { to: from, capacity: 0.0, flow: 0.0, rev: fwd });
        self.adj[from].push(fwd);
        self.adj[to].push(rev);
        fwd
    }

    /// Residual capacity remaining on `edge_idx`.
    pub fn residual(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].capacity - self.edges[edge_idx].flow
    }

    /// The flow currently pushed through `edge_idx` (forward edges only are
    /// meaningful for callers; reverse edges hold the negated flow).
    pub fn flow(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].flow
    }

    /// Target node of `edge_idx`.
    pub fn target(&self, edge_idx: usize) -> usize {
        self.edges[edge_idx].to
    }

    fn push_flow(&mut self, edge_idx: usize, amount: f64) {
        self.edges[edge_idx].flow += amount;
        let rev = self.edges[edge_idx].rev;
        self.edges[rev].flow -= amount;
    }

    /// Node's adjacency, sorted by target node index ascending. BFS
    /// determinism (spec §4.2) depends on this ordering.
    fn sorted_adjacency(&self, node: usize) -> Vec<usize> {
        let mut out = self.adj[node].clone();
        out.sort_by_key(|&e| self.edges[e].to);
        out
    }
}

/// Run Edmonds–Karp from `source` to `sink`, mutating `net`'s residual flows
/// in place. Returns the total flow pushed.
///
/// Neighbors are visited in ascending node-index order during BFS, and each
/// augmenting path pushes the bottleneck residual capacity, per spec §4.2.
pub fn max_flow(net: &mut FlowNetwork, source: usize, sink: usize) -> f64 {
    let mut total = 0.0;

    while let Some(path_edges) = shortest_augmenting_path(net, source, sink) {
        let bottleneck = path_edges
            .iter()
            .fold(f64::INFINITY, |acc, &e| acc.min(net.residual(e)));
        for edge in path_edges {
            net.push_flow(edge, bottleneck);
        }
        total += bottleneck;
    }

    total
}

/// BFS for a shortest (fewest-edges) source-to-sink path with strictly
/// positive residual capacity on every edge. Returns the path as a sequence
/// of edge indices, or `None` if the sink is unreachable.
fn shortest_augmenting_path(net: &FlowNetwork, source: usize, sink: usize) -> Option<Vec<usize>> {
    let n = net.num_nodes();
    let mut visited = BitVec::<usize, bitvec::order::Lsb0>::repeat(false, n);
    let mut parent_edge: Vec<Option<usize>> = vec![None; n];
    visited.set(source, true);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    'bfs: while let Some(u) = queue.pop_front() {
        for edge_idx in net.sorted_adjacency(u) {
            if net.residual(edge_idx) <= EPS_RESIDUAL {
                continue;
            }
            let v = net.target(edge_idx);
            if visited[v] {
                continue;
            }
            visited.set(v, true);
            parent_edge[v] = Some(edge_idx);
            if v == sink {
                break 'bfs;
            }
            queue.push_back(v);
        }
    }

    if !visited[sink] {
        return None;
    }

    let mut path = Vec::new();
    let mut cur = sink;
    while cur != source {
        let edge_idx = parent_edge[cur].expect("visited node has a parent edge");
        path.push(edge_idx);
        cur = net.edges[net.edges[edge_idx].rev].to; // = from(edge_idx)
    }
    path.reverse();
    Some(path)
}

/// All nodes reachable from `from` along edges with residual > ε (spec §4.2
/// cut extraction), in ascending node-index order.
pub fn reachable(net: &FlowNetwork, from: usize) -> Vec<usize> {
    let n = net.num_nodes();
    let mut visited = BitVec::<usize, bitvec::order::Lsb0>::repeat(false, n);
    visited.set(from, true);
    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(u) = queue.pop_front() {
        for edge_idx in net.sorted_adjacency(u) {
            if net.residual(edge_idx) <= EPS_RESIDUAL {
                continue;
            }
            let v = net.target(edge_idx);
            if !visited[v] {
                visited.set(v, true);
                queue.push_back(v);
            }
        }
    }

    visited.iter_ones().collect()
}
