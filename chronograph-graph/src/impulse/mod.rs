//! Impulse graphs: edges that exist instantaneously at one timestamp.
//!
//! Impulse edges are multi-edges: repeating the same `(u, v, t)` records
//! a distinct event, distinguished by a graph-assigned edge id.

pub mod digraph;
pub mod graph;

pub use digraph::ImpulseDiGraph;
pub use graph::ImpulseGraph;

use serde::{Deserialize, Serialize};

use chronograph_core::EdgeId;

/// Identity of one impulse edge: endpoints, timestamp, and the id that
/// keeps simultaneous duplicates distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpulseEdge<N, T> {
    pub u: N,
    pub v: N,
    pub t: T,
    pub id: EdgeId,
}

impl<N, T> ImpulseEdge<N, T> {
    /// The `(u, v)` endpoint pair.
    pub fn pair(&self) -> (&N, &N) {
        (&self.u, &self.v)
    }
}
