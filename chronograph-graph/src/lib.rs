//! # chronograph-graph
//!
//! Time-varying graphs over the chronograph indexes: impulse graphs
//! (edges that exist at exactly one timestamp), interval graphs (edges
//! valid over a half-open `[begin, end)` range), and snapshot graphs
//! (an ordered sequence of static graphs keyed by time ranges).
//!
//! All graph types are single-threaded synchronous structures: mutation
//! takes `&mut self`, queries take `&self`, and query results are
//! collected fresh per call against the current state.

pub mod impulse;
pub mod interval;
pub mod projection;
pub mod snapshot;
pub mod static_graph;
pub mod window;

pub use impulse::{ImpulseDiGraph, ImpulseEdge, ImpulseGraph};
pub use interval::{IntervalDiGraph, IntervalEdge, IntervalGraph};
pub use projection::{SnapshotSpec, SubgraphOptions};
pub use snapshot::{SnapshotDiGraph, SnapshotGraph, SnapshotRange, SnapshotSelector, SnapshotUnGraph};
pub use static_graph::{GraphPayload, StaticDiGraph, StaticGraph, StaticUnGraph};
pub use window::Window;

// The inclusivity mode travels with every impulse query.
pub use chronograph_core::Inclusive;
