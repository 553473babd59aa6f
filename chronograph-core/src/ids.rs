//! Identifier types and the node identifier bound.

use std::fmt;
use std::hash::Hash;

/// Internal identifier for one stored temporal edge.
///
/// Ids are assigned monotonically per graph and never reused, which keeps
/// multiple impulse edges over the same `(u, v, t)` distinguishable and
/// lets both directions of an adjacency pair reference one edge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Bound for node identifiers: any cloneable, hashable, totally ordered
/// value. `Ord` is required so subgraph enumeration can impose its
/// seed-ordering constraint and so query output is deterministic.
pub trait NodeId: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<N: Clone + Eq + Hash + Ord + fmt::Debug> NodeId for N {}
