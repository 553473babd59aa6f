//! Motif specifications.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use chronograph_core::{FxHashMap, GraphError, GraphResult, NodeId};

/// An ordered sequence of directed position pairs describing a temporal
/// pattern: `[(1, 2), (2, 3), (2, 1)]` means `1 → 2`, then `2 → 3`, then
/// `2 → 1`, in that temporal order.
///
/// Positions are opaque values used only for equality within one motif. A
/// pattern whose edges do not form a connected (direction-ignored) graph
/// is rejected; its matching behavior would be unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motif<P: NodeId> {
    edges: Vec<(P, P)>,
}

impl<P: NodeId> Motif<P> {
    /// Validate and build a motif. Fails with
    /// [`GraphError::DisconnectedMotif`] for empty or disconnected
    /// patterns.
    pub fn new(edges: Vec<(P, P)>) -> GraphResult<Self> {
        if edges.is_empty() || !Self::is_connected(&edges) {
            return Err(GraphError::DisconnectedMotif);
        }
        Ok(Motif { edges })
    }

    /// Number of edges in the pattern.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The directed position pairs, in temporal order.
    pub fn edges(&self) -> &[(P, P)] {
        &self.edges
    }

    /// Number of distinct positions: the size of the node subsets the
    /// counter enumerates.
    pub fn node_count(&self) -> usize {
        self.positions().len()
    }

    /// The distinct positions in sorted order.
    pub fn positions(&self) -> BTreeSet<&P> {
        self.edges
            .iter()
            .flat_map(|(a, b)| [a, b])
            .collect()
    }

    /// The pattern's positions flattened edge by edge, matched in
    /// lockstep against candidate node sequences.
    pub(crate) fn flattened(&self) -> Vec<&P> {
        self.edges
            .iter()
            .flat_map(|(a, b)| [a, b])
            .collect()
    }

    fn is_connected(edges: &[(P, P)]) -> bool {
        let mut nbrs: FxHashMap<&P, Vec<&P>> = FxHashMap::default();
        for (a, b) in edges {
            nbrs.entry(a).or_default().push(b);
            nbrs.entry(b).or_default().push(a);
        }
        let Some(start) = nbrs.keys().next().copied() else {
            return false;
        };
        let mut seen: BTreeSet<&P> = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            if !seen.insert(p) {
                continue;
            }
            if let Some(adjacent) = nbrs.get(p) {
                stack.extend(adjacent.iter().copied());
            }
        }
        seen.len() == nbrs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_motifs_are_accepted() {
        let m = Motif::new(vec![(1, 2), (2, 3), (2, 1)]).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.node_count(), 3);
    }

    #[test]
    fn disconnected_or_empty_motifs_are_rejected() {
        assert!(matches!(
            Motif::new(vec![(1, 2), (3, 4)]),
            Err(GraphError::DisconnectedMotif)
        ));
        assert!(matches!(
            Motif::<i32>::new(vec![]),
            Err(GraphError::DisconnectedMotif)
        ));
    }

    #[test]
    fn self_loop_motif_is_connected() {
        let m = Motif::new(vec![(1, 1)]).unwrap();
        assert_eq!(m.node_count(), 1);
    }
}
