//! BELTS request/response JSON shapes (spec §6.2/§6.3).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Certificate lists cap at two entries (spec §6.3): enough for a reader to
/// spot-check the bottleneck without dumping the whole cut.
pub type TightList = SmallVec<[String; 2]>;

/// Tight edges cap at two entries, same convention as [`TightList`].
pub type TightEdgeList = SmallVec<[TightEdge; 2]>;

/// One directed transport edge with a lower and upper throughput bound.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeSpec {
    /// Tail node name.
    pub from: String,
    /// Head node name.
    pub to: String,
    /// Minimum throughput this edge must carry.
    #[serde(default)]
    pub lo: f64,
    /// Maximum throughput this edge may carry.
    pub hi: f64,
}

/// A supply source and the amount of material it injects into the network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceSpec {
    /// Source node name.
    pub node: String,
    /// Units of material available at this source.
    pub supply: f64,
}

/// Top-level BELTS request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeltsRequest {
    /// All transport edges in the network.
    pub edges: Vec<EdgeSpec>,
    /// Per-node maximum total throughput, keyed by node name. Nodes absent
    /// from this map are uncapped.
    #[serde(default)]
    pub node_caps: BTreeMap<String, f64>,
    /// All supply sources.
    pub sources: Vec<SourceSpec>,
    /// The single sink node that must absorb all supply.
    pub sink: String,
}

impl BeltsRequest {
    /// Validate structural invariants the reducer assumes hold (spec §4.1
    /// edge cases). Returns [`Error::MalformedRequest`] on the first
    /// violation found, in a fixed checking order so the message is stable.
    pub fn validate(&self) -> Result<()> {
        if self.edges.is_empty() {
            return Err(Error::malformed("edges must not be empty"));
        }
        if self.sources.is_empty() {
            return Err(Error::malformed("sources must not be empty"));
        }
        if self.sink.is_empty() {
            return Err(Error::malformed("sink must not be empty"));
        }

        let source_names: BTreeSet<&str> = self.sources.iter().map(|s| s.node.as_str()).collect();
        if source_names.contains(self.sink.as_str()) {
            return Err(Error::malformed("sink must not also be a source"));
        }
        if source_names.len() != self.sources.len() {
            return Err(Error::malformed("sources must not repeat the same node"));
        }

        for s in &self.sources {
            if s.supply < 0.0 {
                return Err(Error::malformed(format!(
                    "source '{}' has negative supply",
                    s.node
                )));
            }
        }

        for e in &self.edges {
            if e.from == e.to {
                return Err(Error::malformed(format!(
                    "edge '{}' -> '{}' is a self-loop",
                    e.from, e.to
                )));
            }
            if e.lo < 0.0 {
                return Err(Error::malformed(format!(
                    "edge '{}' -> '{}' has negative lo",
                    e.from, e.to
                )));
            }
            if e.hi < e.lo {
                return Err(Error::malformed(format!(
                    "edge '{}' -> '{}' has hi < lo",
                    e.from, e.to
                )));
            }
        }

        for (node, cap) in &self.node_caps {
            if *cap <= 0.0 {
                return Err(Error::malformed(format!(
                    "node cap for '{node}' must be positive"
                )));
            }
        }

        Ok(())
    }
}

/// An edge of the reconstructed flow, in the original request's node names.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowEdge {
    /// Tail node name.
    pub from: String,
    /// Head node name.
    pub to: String,
    /// Flow carried on this edge, rounded to two decimals.
    pub flow: f64,
}

/// An original edge crossing an infeasibility cut with zero residual.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TightEdge {
    /// Tail node name.
    pub from: String,
    /// Head node name.
    pub to: String,
    /// This edge's upper bound, already fully saturated at the cut.
    pub flow_needed: f64,
}

/// Infeasibility certificate (spec §4.3 step 1/3, §6.3).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Deficit {
    /// Unmet demand: total required flow minus what was actually achieved.
    /// Positive whenever the certifying cut couldn't carry everything.
    pub demand_balance: f64,
    /// Up to two node names whose throughput cap is fully saturated in the
    /// certifying cut.
    pub tight_nodes: TightList,
    /// Up to two original edges crossing the cut whose residual is zero.
    pub tight_edges: TightEdgeList,
}

/// BELTS response (spec §6.3): either a feasible flow or an infeasibility
/// certificate. Never an [`Error`] — infeasibility is a normal outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BeltsResponse {
    /// A feasible assignment of flow to every edge was found.
    #[serde(rename = "ok")]
    Feasible {
        /// Total flow delivered to the sink.
        #[serde(rename = "max_flow_per_min")]
        total_flow: f64,
        /// Non-zero flow entries, sorted lexicographically by `(from, to)`.
        flows: Vec<FlowEdge>,
    },
    /// No assignment respecting every lower bound, upper bound, and node cap
    /// exists. `cut_reachable` and `deficit` together certify why.
    Infeasible {
        /// Nodes reachable from the super-source in the final residual
        /// graph, sorted ascending, excluding the super-source itself.
        cut_reachable: Vec<String>,
        /// The certificate explaining the shortfall.
        deficit: Deficit,
    },
}
</content>
</invoke>
