//! Interval graphs: edges valid over a half-open `[begin, end)` range.
//!
//! The 4-tuple `(u, v, begin, end)` is an interval edge's identity:
//! re-adding it merges attributes instead of duplicating the edge, and
//! zero- or negative-duration intervals are rejected outright.

pub mod digraph;
pub mod graph;

pub use digraph::IntervalDiGraph;
pub use graph::IntervalGraph;

use serde::{Deserialize, Serialize};

use chronograph_core::EdgeId;

/// Identity of one interval edge. The `id` is the graph's internal record
/// handle for attribute access; equality of the `(u, v, begin, end)` key
/// is what deduplicates edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalEdge<N, T> {
    pub u: N,
    pub v: N,
    pub begin: T,
    pub end: T,
    pub id: EdgeId,
}

impl<N, T> IntervalEdge<N, T> {
    /// The `(u, v)` endpoint pair.
    pub fn pair(&self) -> (&N, &N) {
        (&self.u, &self.v)
    }
}
