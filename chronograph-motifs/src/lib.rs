//! # chronograph-motifs
//!
//! Temporal motif counting: given an impulse digraph's edge stream, a
//! query motif (an ordered sequence of directed position pairs), and a
//! time window `delta`, count the temporally ordered, connected edge
//! sequences isomorphic to the motif.
//!
//! Only [`ImpulseDiGraph`](chronograph_graph::ImpulseDiGraph) inputs are
//! accepted; the function signature discharges the unsupported-input
//! error statically.

pub mod count;
pub mod motif;

pub use count::{count_temporal_motifs, MotifCounts};
pub use motif::Motif;

pub use chronograph_core::{GraphError, GraphResult};
