//! The snapshot sequence container.

use serde::{Deserialize, Serialize};

use chronograph_core::{Attributes, GraphResult, NodeId, TimeValue};

use crate::static_graph::GraphPayload;
use crate::window::Window;

use super::SnapshotRange;

/// Which snapshots a query or mutation applies to: every snapshot, a set
/// of ordinal positions into the ordered sequence, or a time window.
///
/// Ordinal and window selection are mutually exclusive by construction.
/// Window bounds are validated when the [`Window`] is built; ordinals
/// outside the sequence are skipped quietly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapshotSelector<T> {
    All,
    Indices(Vec<usize>),
    Window(Window<T>),
}

/// An ordered sequence of static graphs keyed by non-overlapping time
/// ranges.
///
/// Overlapping ranges may be *inserted*; deduplication is not enforced
/// on insert. Non-overlap is an invariant the mutation API maintains
/// going forward: window-scoped mutation with `split_overlaps` splits any
/// partially covered range so that each stored graph keeps describing
/// exactly its own range.
#[derive(Debug, Clone)]
pub struct SnapshotGraph<T: TimeValue, G> {
    entries: Vec<(SnapshotRange<T>, G)>,
    attrs: Attributes,
}

impl<T: TimeValue, G> Default for SnapshotGraph<T, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeValue, G> SnapshotGraph<T, G> {
    /// Create an empty snapshot graph.
    pub fn new() -> Self {
        SnapshotGraph {
            entries: Vec::new(),
            attrs: Attributes::new(),
        }
    }

    /// Create an empty snapshot graph carrying graph-level attributes.
    pub fn with_attrs(attrs: Attributes) -> Self {
        SnapshotGraph {
            entries: Vec::new(),
            attrs,
        }
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a snapshot under a range or point key, keeping the sequence
    /// ordered by `(start, end)`. Overlapping keys are simply added.
    pub fn insert(&mut self, graph: G, range: SnapshotRange<T>) {
        let pos = self.entries.partition_point(|(r, _)| {
            r.start()
                .cmp_time(&range.start())
                .then(r.end().cmp_time(&range.end()))
                .is_le()
        });
        self.entries.insert(pos, (range, graph));
    }

    /// The stored range keys in order.
    pub fn ranges(&self) -> Vec<SnapshotRange<T>> {
        self.entries.iter().map(|(r, _)| *r).collect()
    }

    /// Whether a snapshot with exactly this range key exists.
    pub fn contains_range(&self, range: &SnapshotRange<T>) -> bool {
        self.entries.iter().any(|(r, _)| {
            r.start().same(&range.start()) && r.end().same(&range.end())
        })
    }

    /// Iterate snapshots with their range keys, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&SnapshotRange<T>, &G)> {
        self.entries.iter().map(|(r, g)| (r, g))
    }

    /// The snapshots a selector picks, in range/index order.
    pub fn get(&self, selector: &SnapshotSelector<T>) -> Vec<&G> {
        self.selected_indices(selector)
            .into_iter()
            .map(|i| &self.entries[i].1)
            .collect()
    }

    /// Apply an externally supplied function to every selected snapshot's
    /// graph and collect the results in order. This is the sanctioned way
    /// external static-graph algorithms enter the system.
    pub fn compute_network_statistic<R>(
        &self,
        stat: impl Fn(&G) -> R,
        selector: &SnapshotSelector<T>,
    ) -> Vec<R> {
        self.get(selector).into_iter().map(stat).collect()
    }

    fn selected_indices(&self, selector: &SnapshotSelector<T>) -> Vec<usize> {
        match selector {
            SnapshotSelector::All => (0..self.entries.len()).collect(),
            SnapshotSelector::Indices(indices) => indices
                .iter()
                .copied()
                .filter(|&i| {
                    if i >= self.entries.len() {
                        tracing::debug!(index = i, "snapshot ordinal out of range, skipping");
                        return false;
                    }
                    true
                })
                .collect(),
            SnapshotSelector::Window(window) => self.window_indices(*window),
        }
    }

    /// Indices of snapshots overlapping the window. The lower bound found
    /// by bisection on range starts steps back one position when the
    /// window's start falls strictly inside the preceding range, since a plain
    /// bisect would skip that overlapping-but-earlier-starting range.
    fn window_indices(&self, window: Window<T>) -> Vec<usize> {
        let mut lo = match window.begin() {
            None => 0,
            Some(start) => {
                let mut lo = self
                    .entries
                    .partition_point(|(r, _)| r.start().before(&start));
                if lo > 0 && window.overlaps_interval(
                    self.entries[lo - 1].0.start(),
                    self.entries[lo - 1].0.end(),
                ) {
                    lo -= 1;
                }
                lo
            }
        };

        let mut out = Vec::new();
        while lo < self.entries.len() {
            let range = self.entries[lo].0;
            if window.end().is_some_and(|end| range.start().after(&end)) {
                break;
            }
            if window.overlaps_interval(range.start(), range.end()) {
                out.push(lo);
            }
            lo += 1;
        }
        out
    }
}

impl<T: TimeValue, G: Clone> SnapshotGraph<T, G> {
    /// Apply a mutation to every selected snapshot.
    ///
    /// When selecting by window with `split_overlaps`, a snapshot range
    /// only partially covered by the window is first split into copies of
    /// its graph: the portions outside the window keep an unmodified
    /// copy, and only the overlapping portion is mutated.
    pub fn mutate(
        &mut self,
        selector: &SnapshotSelector<T>,
        split_overlaps: bool,
        apply: impl Fn(&mut G),
    ) -> GraphResult<()> {
        if !split_overlaps || !matches!(selector, SnapshotSelector::Window(_)) {
            for i in self.selected_indices(selector) {
                apply(&mut self.entries[i].1);
            }
            return Ok(());
        }

        let SnapshotSelector::Window(window) = selector else {
            return Ok(());
        };
        let window = *window;
        // Split from the back so earlier indices stay valid.
        for i in self.window_indices(window).into_iter().rev() {
            let range = self.entries[i].0;
            let fully_covered = window.begin().map_or(true, |s| !range.start().before(&s))
                && window.end().map_or(true, |e| !range.end().after(&e));

            if range.is_point() || fully_covered {
                apply(&mut self.entries[i].1);
                continue;
            }

            let (range, graph) = self.entries.remove(i);
            let mut pieces: Vec<(SnapshotRange<T>, G)> = Vec::with_capacity(3);

            if let Some(start) = window.begin() {
                if range.start().before(&start) {
                    pieces.push((SnapshotRange::interval(range.start(), start)?, graph.clone()));
                }
            }

            let mid_start = match window.begin() {
                Some(start) if range.start().before(&start) => start,
                _ => range.start(),
            };
            let mid_end = match window.end() {
                Some(end) if range.end().after(&end) => end,
                _ => range.end(),
            };
            let mut mutated = graph.clone();
            apply(&mut mutated);
            pieces.push((SnapshotRange::interval(mid_start, mid_end)?, mutated));

            if let Some(end) = window.end() {
                if range.end().after(&end) {
                    pieces.push((SnapshotRange::interval(end, range.end())?, graph));
                }
            }

            self.entries.splice(i..i, pieces);
        }
        Ok(())
    }
}

impl<T: TimeValue, G> SnapshotGraph<T, G> {
    /// Build a snapshot from an edge list and insert it under the key.
    pub fn add_snapshot<N>(
        &mut self,
        edges: impl IntoIterator<Item = (N, N)>,
        range: SnapshotRange<T>,
    ) where
        N: NodeId,
        G: GraphPayload<N> + Default,
    {
        let mut graph = G::default();
        for (u, v) in edges {
            graph.insert_edge(u, v, Attributes::new());
        }
        self.insert(graph, range);
    }

    /// Add nodes (with attributes) to every selected snapshot, splitting
    /// partially covered ranges when `split_overlaps` is set.
    pub fn add_nodes_from<N>(
        &mut self,
        nodes: &[(N, Attributes)],
        selector: &SnapshotSelector<T>,
        split_overlaps: bool,
    ) -> GraphResult<()>
    where
        N: NodeId,
        G: GraphPayload<N>,
    {
        self.mutate(selector, split_overlaps, |graph| {
            for (n, attrs) in nodes {
                graph.insert_node(n.clone(), attrs.clone());
            }
        })
    }

    /// Add edges (with attributes) to every selected snapshot, splitting
    /// partially covered ranges when `split_overlaps` is set.
    pub fn add_edges_from<N>(
        &mut self,
        edges: &[(N, N, Attributes)],
        selector: &SnapshotSelector<T>,
        split_overlaps: bool,
    ) -> GraphResult<()>
    where
        N: NodeId,
        G: GraphPayload<N>,
    {
        self.mutate(selector, split_overlaps, |graph| {
            for (u, v, attrs) in edges {
                graph.insert_edge(u.clone(), v.clone(), attrs.clone());
            }
        })
    }

    /// Node count of every selected snapshot.
    pub fn number_of_nodes<N>(&self, selector: &SnapshotSelector<T>) -> Vec<usize>
    where
        N: NodeId,
        G: GraphPayload<N>,
    {
        self.compute_network_statistic(|g| g.node_list().len(), selector)
    }

    /// Whether every selected snapshot contains the node.
    pub fn has_node<N>(&self, n: &N, selector: &SnapshotSelector<T>) -> Vec<bool>
    where
        N: NodeId,
        G: GraphPayload<N>,
    {
        self.compute_network_statistic(
            |g| g.node_list().iter().any(|(m, _)| m == n),
            selector,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_graph::StaticUnGraph;

    fn edgy(edges: &[(i32, i32)]) -> StaticUnGraph<i32> {
        let mut g = StaticUnGraph::new();
        for (u, v) in edges {
            g.add_edge(*u, *v, Attributes::new());
        }
        g
    }

    fn ranges(sg: &SnapshotGraph<i64, StaticUnGraph<i32>>) -> Vec<(i64, i64)> {
        sg.ranges().iter().map(|r| (r.start(), r.end())).collect()
    }

    #[test]
    fn insert_keeps_order() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(3, 10).unwrap());
        sg.insert(edgy(&[(1, 3)]), SnapshotRange::interval(0, 3).unwrap());
        sg.insert(edgy(&[(1, 4)]), SnapshotRange::point(12));

        assert_eq!(ranges(&sg), vec![(0, 3), (3, 10), (12, 12)]);
        assert!(sg.contains_range(&SnapshotRange::interval(3, 10).unwrap()));
        assert!(!sg.contains_range(&SnapshotRange::interval(3, 9).unwrap()));
    }

    #[test]
    fn window_retrieval_steps_back_for_straddling_ranges() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(0, 5).unwrap());
        sg.insert(edgy(&[(2, 3)]), SnapshotRange::interval(5, 10).unwrap());
        sg.insert(edgy(&[(3, 4)]), SnapshotRange::interval(10, 15).unwrap());

        // 7 falls strictly inside [5, 10): a plain bisect on starts would
        // land past it
        let hit = sg.get(&SnapshotSelector::Window(Window::between(7, 9).unwrap()));
        assert_eq!(hit.len(), 1);
        assert!(hit[0].has_edge(&2, &3));

        let spanning = sg.get(&SnapshotSelector::Window(Window::between(4, 11).unwrap()));
        assert_eq!(spanning.len(), 3);

        let none = sg.get(&SnapshotSelector::Window(Window::between(20, 30).unwrap()));
        assert!(none.is_empty());
    }

    #[test]
    fn index_retrieval_skips_unknown_ordinals() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(0, 5).unwrap());
        sg.insert(edgy(&[(2, 3)]), SnapshotRange::interval(5, 10).unwrap());

        let picked = sg.get(&SnapshotSelector::Indices(vec![1, 7]));
        assert_eq!(picked.len(), 1);
        assert!(picked[0].has_edge(&2, &3));
    }

    #[test]
    fn split_on_partial_overlap() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(0, 3).unwrap());
        sg.insert(edgy(&[(2, 3)]), SnapshotRange::interval(3, 10).unwrap());

        sg.add_nodes_from(
            &[(77, Attributes::new())],
            &SnapshotSelector::Window(Window::between(1, 3).unwrap()),
            true,
        )
        .unwrap();

        assert_eq!(ranges(&sg), vec![(0, 1), (1, 3), (3, 10)]);
        let pieces = sg.get(&SnapshotSelector::All);
        assert!(!pieces[0].contains_node(&77)); // [0, 1): unmodified copy
        assert!(pieces[1].contains_node(&77)); // [1, 3): mutated copy
        assert!(!pieces[2].contains_node(&77)); // [3, 10): untouched
        assert!(pieces[0].has_edge(&1, &2) && pieces[1].has_edge(&1, &2));
    }

    #[test]
    fn split_containment_produces_three_pieces() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(0, 10).unwrap());

        sg.add_edges_from(
            &[(8, 9, Attributes::new())],
            &SnapshotSelector::Window(Window::between(4, 6).unwrap()),
            true,
        )
        .unwrap();

        assert_eq!(ranges(&sg), vec![(0, 4), (4, 6), (6, 10)]);
        let pieces = sg.get(&SnapshotSelector::All);
        assert!(!pieces[0].has_edge(&8, &9));
        assert!(pieces[1].has_edge(&8, &9));
        assert!(!pieces[2].has_edge(&8, &9));
    }

    #[test]
    fn unsplit_window_mutation_touches_whole_overlapping_graphs() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::interval(0, 3).unwrap());
        sg.insert(edgy(&[(2, 3)]), SnapshotRange::interval(3, 10).unwrap());

        sg.add_nodes_from(
            &[(77, Attributes::new())],
            &SnapshotSelector::Window(Window::between(1, 3).unwrap()),
            false,
        )
        .unwrap();

        assert_eq!(ranges(&sg), vec![(0, 3), (3, 10)]);
        let pieces = sg.get(&SnapshotSelector::All);
        assert!(pieces[0].contains_node(&77));
        assert!(!pieces[1].contains_node(&77));
    }

    #[test]
    fn statistics_run_in_order() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2), (1, 3)]), SnapshotRange::interval(0, 5).unwrap());
        sg.insert(edgy(&[(1, 4)]), SnapshotRange::interval(5, 10).unwrap());

        let sizes = sg.compute_network_statistic(|g| g.edge_count(), &SnapshotSelector::All);
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(sg.number_of_nodes(&SnapshotSelector::All), vec![3, 2]);
        assert_eq!(
            sg.has_node(&4, &SnapshotSelector::All),
            vec![false, true]
        );
    }

    #[test]
    fn point_snapshots_match_point_windows() {
        let mut sg = SnapshotGraph::new();
        sg.insert(edgy(&[(1, 2)]), SnapshotRange::point(10));
        sg.insert(edgy(&[(2, 3)]), SnapshotRange::point(11));

        let hit = sg.get(&SnapshotSelector::Window(Window::point(10)));
        assert_eq!(hit.len(), 1);
        assert!(hit[0].has_edge(&1, &2));
    }
}
