//! Snapshot sequences: an ordered map from time ranges to externally
//! typed static graphs.

pub mod graph;
pub mod range;

pub use graph::{SnapshotGraph, SnapshotSelector};
pub use range::SnapshotRange;

use crate::static_graph::{StaticDiGraph, StaticUnGraph};

/// Snapshot sequence of undirected static graphs.
pub type SnapshotUnGraph<T, N> = SnapshotGraph<T, StaticUnGraph<N>>;
/// Snapshot sequence of directed static graphs.
pub type SnapshotDiGraph<T, N> = SnapshotGraph<T, StaticDiGraph<N>>;
