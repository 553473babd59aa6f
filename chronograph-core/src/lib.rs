//! # chronograph-core
//!
//! Foundation crate for the chronograph workspace.
//! Defines the error taxonomy, time-value traits, attribute bags, edge
//! identifiers, and the two temporal edge indexes (`IntervalTree` for
//! half-open interval edges, `TimestampIndex` for instantaneous edges).
//! Every other crate in the workspace depends on this.

pub mod attrs;
pub mod collections;
pub mod errors;
pub mod ids;
pub mod index;
pub mod time;

// Re-export the most commonly used types at the crate root.
pub use attrs::Attributes;
pub use collections::{FxHashMap, FxHashSet};
pub use errors::{GraphError, GraphResult};
pub use ids::{EdgeId, NodeId};
pub use index::interval_tree::IntervalTree;
pub use index::timestamp_index::TimestampIndex;
pub use time::{Inclusive, TimeArith, TimeKey, TimeValue};
