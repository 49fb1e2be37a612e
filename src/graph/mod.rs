//! Shared graph plumbing: the Edmonds–Karp engine (B2) used by BELTS.
//!
//! FACTORY does not use this module — its "graph" is a recipe/item balance
//! problem solved as a linear program (see [`crate::factory::lp`]), not a
//! flow network.

pub mod flow;

pub use flow::{max_flow, reachable, FlowNetwork};
