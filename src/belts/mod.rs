//! BELTS: lower-bounded max-flow feasibility over a transport network with
//! per-node throughput caps (spec §4.1–§4.3, B1–B3).
//!
//! [`request::BeltsRequest`] comes in as JSON, [`reduce::reduce`] turns it
//! into a plain max-flow problem on [`crate::graph::FlowNetwork`], and
//! [`solve::solve_belts`] runs the two-phase feasibility check and emits a
//! [`request::BeltsResponse`].

pub mod reduce;
pub mod request;
pub mod solve;

pub use request::{BeltsRequest, BeltsResponse, Deficit, EdgeSpec, FlowEdge, SourceSpec};
pub use solve::solve_belts;
