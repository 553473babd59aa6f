//! Directed interval graph.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use chronograph_core::{
    Attributes, EdgeId, FxHashMap, GraphError, GraphResult, IntervalTree, NodeId, TimeArith,
    TimeKey, TimeValue,
};

use crate::projection::{resolve_parts, SnapshotSpec, SubgraphOptions};
use crate::snapshot::{SnapshotDiGraph, SnapshotGraph, SnapshotRange};
use crate::static_graph::{StaticDiGraph, StaticGraph};
use crate::window::Window;

use super::graph::IntervalRecord;
use super::IntervalEdge;

type AdjMap<N> = FxHashMap<N, FxHashMap<N, SmallVec<[EdgeId; 2]>>>;

/// A directed graph whose edges are valid over half-open `[begin, end)`
/// intervals.
///
/// Successor and predecessor adjacency are both maintained so edges into
/// and out of a node are answerable without a scan; the two directions
/// reference the same edge records.
#[derive(Debug, Clone)]
pub struct IntervalDiGraph<N: NodeId, T: TimeValue> {
    tree: IntervalTree<T>,
    records: FxHashMap<EdgeId, IntervalRecord<N, T>>,
    succ: AdjMap<N>,
    pred: AdjMap<N>,
    nodes: FxHashMap<N, Attributes>,
    attrs: Attributes,
    next_edge: u64,
}

impl<N: NodeId, T: TimeValue> Default for IntervalDiGraph<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, T: TimeValue> IntervalDiGraph<N, T> {
    /// Create an empty directed interval graph.
    pub fn new() -> Self {
        IntervalDiGraph {
            tree: IntervalTree::new(),
            records: FxHashMap::default(),
            succ: AdjMap::default(),
            pred: AdjMap::default(),
            nodes: FxHashMap::default(),
            attrs: Attributes::new(),
            next_edge: 0,
        }
    }

    /// Create an empty graph carrying graph-level attributes.
    pub fn with_attrs(attrs: Attributes) -> Self {
        let mut graph = Self::new();
        graph.attrs = attrs;
        graph
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// The graph name, if one is stored under the `"name"` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(|v| v.as_str())
    }

    pub fn set_name(&mut self, name: &str) {
        self.attrs
            .insert("name".to_string(), serde_json::Value::from(name));
    }

    /// `(begin, end)` span of the entire graph; `None` when edgeless.
    pub fn interval(&self) -> Option<(T, T)> {
        Some((self.tree.begin()?, self.tree.end()?))
    }

    pub fn number_of_edges(&self) -> usize {
        self.records.len()
    }

    // ── Nodes ────────────────────────────────────────────────────────────

    pub fn add_node(&mut self, n: N) {
        self.nodes.entry(n.clone()).or_default();
        self.succ.entry(n.clone()).or_default();
        self.pred.entry(n).or_default();
    }

    pub fn add_node_with(&mut self, n: N, attrs: Attributes) {
        self.add_node(n.clone());
        if let Some(existing) = self.nodes.get_mut(&n) {
            existing.extend(attrs);
        }
    }

    pub fn add_nodes_from(&mut self, nodes: impl IntoIterator<Item = N>) {
        for n in nodes {
            self.add_node(n);
        }
    }

    pub fn contains_node(&self, n: &N) -> bool {
        self.nodes.contains_key(n)
    }

    pub fn node_attrs(&self, n: &N) -> Option<&Attributes> {
        self.nodes.get(n)
    }

    pub fn node_attrs_mut(&mut self, n: &N) -> Option<&mut Attributes> {
        self.nodes.get_mut(n)
    }

    /// Whether the node is present during the window (edge-derived when
    /// bounded).
    pub fn has_node(&self, n: &N, window: Window<T>) -> bool {
        if !self.nodes.contains_key(n) {
            return false;
        }
        if window.is_unbounded() {
            return true;
        }
        self.out_ids(n)
            .chain(self.in_ids(n))
            .any(|id| self.record_overlaps(id, window))
    }

    /// Nodes present during the window, sorted.
    pub fn nodes(&self, window: Window<T>) -> Vec<N> {
        let mut out: Vec<N> = if window.is_unbounded() {
            self.nodes.keys().cloned().collect()
        } else {
            let mut present = Vec::new();
            for id in self.tree.query(window.begin(), window.end()) {
                if let Some(record) = self.records.get(&id) {
                    present.push(record.u.clone());
                    present.push(record.v.clone());
                }
            }
            present
        };
        out.sort();
        out.dedup();
        out
    }

    pub fn number_of_nodes(&self, window: Window<T>) -> usize {
        if window.is_unbounded() {
            self.nodes.len()
        } else {
            self.nodes(window).len()
        }
    }

    /// Remove the node's overlapping incident edges (both directions),
    /// and the node itself when the window is unbounded or nothing
    /// remains.
    pub fn remove_node(&mut self, n: &N, window: Window<T>) {
        if !self.nodes.contains_key(n) {
            return;
        }
        let doomed: Vec<EdgeId> = self
            .out_ids(n)
            .chain(self.in_ids(n))
            .filter(|&id| window.is_unbounded() || self.record_overlaps(id, window))
            .collect();
        for id in doomed {
            self.remove_record(id);
        }
        let gone = self.succ.get(n).map_or(true, |m| m.is_empty())
            && self.pred.get(n).map_or(true, |m| m.is_empty());
        if window.is_unbounded() || gone {
            self.succ.remove(n);
            self.pred.remove(n);
            self.nodes.remove(n);
        }
    }

    // ── Edges ────────────────────────────────────────────────────────────

    /// Add a directed edge `u → v` valid during `[begin, end)`.
    pub fn add_edge(&mut self, u: N, v: N, begin: T, end: T) -> GraphResult<IntervalEdge<N, T>> {
        self.add_edge_with(u, v, begin, end, Attributes::new())
    }

    /// Add a directed edge carrying attributes; an existing identical key
    /// absorbs them into the one shared record.
    pub fn add_edge_with(
        &mut self,
        u: N,
        v: N,
        begin: T,
        end: T,
        attrs: Attributes,
    ) -> GraphResult<IntervalEdge<N, T>> {
        if !end.after(&begin) {
            return Err(GraphError::InvalidInterval {
                begin: format!("{begin:?}"),
                end: format!("{end:?}"),
            });
        }

        if let Some(id) = self.find_exact(&u, &v, begin, end) {
            if let Some(record) = self.records.get_mut(&id) {
                record.attrs.extend(attrs);
            }
            return Ok(IntervalEdge { u, v, begin, end, id });
        }

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;

        self.tree.insert(begin, end, id)?;
        self.add_node(u.clone());
        self.add_node(v.clone());
        Self::link(&mut self.succ, &u, &v, id);
        Self::link(&mut self.pred, &v, &u, id);
        self.records.insert(
            id,
            IntervalRecord {
                u: u.clone(),
                v: v.clone(),
                begin,
                end,
                attrs,
            },
        );
        Ok(IntervalEdge { u, v, begin, end, id })
    }

    pub fn add_edges_from(
        &mut self,
        edges: impl IntoIterator<Item = (N, N, T, T)>,
    ) -> GraphResult<()> {
        for (u, v, begin, end) in edges {
            self.add_edge(u, v, begin, end)?;
        }
        Ok(())
    }

    /// Whether any edge `u → v` overlaps the window.
    pub fn has_edge(&self, u: &N, v: &N, window: Window<T>) -> bool {
        let Some(ids) = self.succ.get(u).and_then(|nbrs| nbrs.get(v)) else {
            return false;
        };
        if window.is_unbounded() {
            return !ids.is_empty();
        }
        ids.iter().any(|&id| self.record_overlaps(id, window))
    }

    /// Whether the edge `u → v` with exactly this interval exists.
    pub fn has_edge_exact(&self, u: &N, v: &N, begin: T, end: T) -> bool {
        self.find_exact(u, v, begin, end).is_some()
    }

    /// Edges selected by optional endpoint constraints (`u` the source
    /// side, `v` the target side) and a window, ascending by
    /// `(begin, end, id)`.
    pub fn edges(&self, u: Option<&N>, v: Option<&N>, window: Window<T>) -> Vec<IntervalEdge<N, T>> {
        let mut out: Vec<IntervalEdge<N, T>> = self
            .select_ids(u, v, window)
            .into_iter()
            .filter_map(|id| self.edge(id))
            .collect();
        out.sort_by(|a, b| {
            a.begin
                .cmp_time(&b.begin)
                .then(a.end.cmp_time(&b.end))
                .then(a.id.cmp(&b.id))
        });
        out
    }

    pub fn all_edges(&self) -> Vec<IntervalEdge<N, T>> {
        self.edges(None, None, Window::all())
    }

    /// Like [`edges`](Self::edges), pairing each edge with its attribute
    /// map.
    pub fn edges_with_data(
        &self,
        u: Option<&N>,
        v: Option<&N>,
        window: Window<T>,
    ) -> Vec<(IntervalEdge<N, T>, &Attributes)> {
        self.edges(u, v, window)
            .into_iter()
            .filter_map(|edge| self.records.get(&edge.id).map(|r| (edge, &r.attrs)))
            .collect()
    }

    /// Like [`edges`](Self::edges), pairing each edge with one named
    /// attribute value, or a clone of `default` where absent.
    pub fn edges_with_attr(
        &self,
        u: Option<&N>,
        v: Option<&N>,
        window: Window<T>,
        key: &str,
        default: &serde_json::Value,
    ) -> Vec<(IntervalEdge<N, T>, serde_json::Value)> {
        self.edges_with_data(u, v, window)
            .into_iter()
            .map(|(edge, attrs)| {
                let value = attrs.get(key).unwrap_or(default).clone();
                (edge, value)
            })
            .collect()
    }

    pub fn edge_attrs(&self, id: EdgeId) -> Option<&Attributes> {
        self.records.get(&id).map(|r| &r.attrs)
    }

    pub fn edge_attrs_mut(&mut self, id: EdgeId) -> Option<&mut Attributes> {
        self.records.get_mut(&id).map(|r| &mut r.attrs)
    }

    /// Remove every edge `u → v` whose interval overlaps the window.
    /// Quiet if nothing matches.
    pub fn remove_edge(&mut self, u: &N, v: &N, window: Window<T>) {
        let Some(ids) = self.succ.get(u).and_then(|nbrs| nbrs.get(v)) else {
            return;
        };
        let doomed: Vec<EdgeId> = ids
            .iter()
            .copied()
            .filter(|&id| window.is_unbounded() || self.record_overlaps(id, window))
            .collect();
        for id in doomed {
            self.remove_record(id);
        }
    }

    /// Remove only the edge `u → v` with exactly this interval. Quiet if
    /// absent.
    pub fn remove_edge_exact(&mut self, u: &N, v: &N, begin: T, end: T) {
        if let Some(id) = self.find_exact(u, v, begin, end) {
            self.remove_record(id);
        }
    }

    // ── Degree ───────────────────────────────────────────────────────────

    /// In-degree plus out-degree (a self-loop counts on both sides).
    pub fn degree(&self, node: &N, window: Window<T>) -> usize {
        self.out_degree(node, window) + self.in_degree(node, window)
    }

    /// Number of overlapping edges into `node`.
    pub fn in_degree(&self, node: &N, window: Window<T>) -> usize {
        self.edges(None, Some(node), window).len()
    }

    /// Number of overlapping edges out of `node`.
    pub fn out_degree(&self, node: &N, window: Window<T>) -> usize {
        self.edges(Some(node), None, window).len()
    }

    /// Mean of [`degree`](Self::degree) over nodes present in the window.
    pub fn mean_degree(&self, window: Window<T>) -> Option<f64> {
        self.mean_by(window, Self::degree)
    }

    /// Mean of [`in_degree`](Self::in_degree) over nodes present in the
    /// window.
    pub fn mean_in_degree(&self, window: Window<T>) -> Option<f64> {
        self.mean_by(window, Self::in_degree)
    }

    /// Mean of [`out_degree`](Self::out_degree) over nodes present in the
    /// window.
    pub fn mean_out_degree(&self, window: Window<T>) -> Option<f64> {
        self.mean_by(window, Self::out_degree)
    }

    fn mean_by(
        &self,
        window: Window<T>,
        degree_of: impl Fn(&Self, &N, Window<T>) -> usize,
    ) -> Option<f64> {
        let nodes = self.nodes(window);
        if nodes.is_empty() {
            return None;
        }
        let total: usize = nodes.iter().map(|n| degree_of(self, n, window)).sum();
        Some(total as f64 / nodes.len() as f64)
    }

    /// Cumulative degree-over-time sweep over edges touching `node` in
    /// either direction (see the undirected form for the event
    /// semantics).
    pub fn degree_delta(&self, node: &N, window: Window<T>) -> Vec<(T, usize)> {
        let out = self.edges(Some(node), None, window);
        let inc = self.edges(None, Some(node), window);
        self.sweep(node, window, out.into_iter().chain(inc).collect())
    }

    /// Cumulative sweep over edges into `node`.
    pub fn in_degree_delta(&self, node: &N, window: Window<T>) -> Vec<(T, usize)> {
        let edges = self.edges(None, Some(node), window);
        self.sweep_with(window, edges, |g, w| g.in_degree(node, w))
    }

    /// Cumulative sweep over edges out of `node`.
    pub fn out_degree_delta(&self, node: &N, window: Window<T>) -> Vec<(T, usize)> {
        let edges = self.edges(Some(node), None, window);
        self.sweep_with(window, edges, |g, w| g.out_degree(node, w))
    }

    // ── Projection ───────────────────────────────────────────────────────

    /// Project the edges overlapping the window into a directed static
    /// graph.
    pub fn to_subgraph(&self, window: Window<T>, options: SubgraphOptions) -> StaticDiGraph<N> {
        let mut graph = if options.multigraph {
            StaticGraph::new_multigraph()
        } else {
            StaticGraph::new()
        };
        for id in self.tree.query(window.begin(), window.end()) {
            let Some(record) = self.records.get(&id) else {
                continue;
            };
            let mut attrs = if options.edge_data {
                record.attrs.clone()
            } else {
                Attributes::new()
            };
            if options.edge_time_data {
                attrs.insert("begin".to_string(), record.begin.to_attr());
                attrs.insert("end".to_string(), record.end.to_attr());
            }
            graph.add_edge(record.u.clone(), record.v.clone(), attrs);
        }
        if options.node_data {
            let present: Vec<N> = graph.nodes().map(|(n, _)| n.clone()).collect();
            for n in present {
                if let Some(attrs) = self.nodes.get(&n) {
                    graph.add_node(n, attrs.clone());
                }
            }
        }
        graph
    }

    /// Slice the graph's span into consecutive half-open windows and
    /// project each.
    pub fn to_snapshots(
        &self,
        spec: SnapshotSpec<T>,
        options: SubgraphOptions,
    ) -> GraphResult<Vec<((T, T), StaticDiGraph<N>)>>
    where
        T: TimeArith,
    {
        let (begin, end) = self.interval().ok_or(GraphError::EmptyGraph)?;
        let parts = resolve_parts(spec, begin, end)?;

        let mut snapshots = Vec::with_capacity(parts);
        for i in 0..parts {
            let lo = T::partition_boundary(begin, end, i, parts);
            let hi = T::partition_boundary(begin, end, i + 1, parts);
            let window = Window::between(lo, hi)?;
            snapshots.push(((lo, hi), self.to_subgraph(window, options)));
        }
        Ok(snapshots)
    }

    /// Partition into snapshots and package them as a snapshot graph.
    pub fn to_snapshot_graph(
        &self,
        spec: SnapshotSpec<T>,
        options: SubgraphOptions,
    ) -> GraphResult<SnapshotDiGraph<T, N>>
    where
        T: TimeArith,
    {
        let mut snapshots = SnapshotGraph::new();
        for ((lo, hi), graph) in self.to_snapshots(spec, options)? {
            snapshots.insert(graph, SnapshotRange::interval(lo, hi)?);
        }
        Ok(snapshots)
    }

    /// Build from a directed static graph whose edges carry their bounds
    /// under `begin_key`/`end_key`.
    pub fn from_static_graph(
        graph: &StaticDiGraph<N>,
        begin_key: &str,
        end_key: &str,
    ) -> GraphResult<Self> {
        let mut out = Self::new();
        for (u, v, attrs) in graph.edges() {
            let read = |key: &str| {
                attrs
                    .get(key)
                    .and_then(T::from_attr)
                    .ok_or_else(|| GraphError::MissingAttribute {
                        edge: format!("{u:?}, {v:?}"),
                        key: key.to_string(),
                    })
            };
            let begin = read(begin_key)?;
            let end = read(end_key)?;
            let mut attrs = attrs.clone();
            attrs.remove(begin_key);
            attrs.remove(end_key);
            out.add_edge_with(u.clone(), v.clone(), begin, end, attrs)?;
        }
        Ok(out)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn sweep(
        &self,
        node: &N,
        window: Window<T>,
        edges: Vec<IntervalEdge<N, T>>,
    ) -> Vec<(T, usize)> {
        self.sweep_with(window, edges, |g, w| g.degree(node, w))
    }

    fn sweep_with(
        &self,
        window: Window<T>,
        edges: Vec<IntervalEdge<N, T>>,
        degree_at: impl Fn(&Self, Window<T>) -> usize,
    ) -> Vec<(T, usize)> {
        let (Some(tree_begin), Some(tree_end)) = (self.tree.begin(), self.tree.end()) else {
            return Vec::new();
        };
        let begin = window.begin().unwrap_or(tree_begin);
        let end = window.end().unwrap_or(tree_end);
        if begin.after(&end) {
            return Vec::new();
        }

        let mut current = degree_at(self, Window::point(begin)) as i64;
        let mut events: BTreeMap<TimeKey<T>, i64> = BTreeMap::new();
        for edge in edges {
            if !edge.begin.before(&begin) {
                *events.entry(TimeKey(edge.begin)).or_default() += 1;
            }
            if edge.end.before(&end) {
                *events.entry(TimeKey(edge.end)).or_default() -= 1;
            }
        }

        let mut out = Vec::with_capacity(events.len());
        for (key, delta) in events {
            let t = key.0;
            if !t.same(&begin) {
                current += delta;
            }
            out.push((t, current.max(0) as usize));
        }
        out
    }

    fn edge(&self, id: EdgeId) -> Option<IntervalEdge<N, T>> {
        self.records.get(&id).map(|r| IntervalEdge {
            u: r.u.clone(),
            v: r.v.clone(),
            begin: r.begin,
            end: r.end,
            id,
        })
    }

    fn record_overlaps(&self, id: EdgeId, window: Window<T>) -> bool {
        self.records
            .get(&id)
            .is_some_and(|r| window.overlaps_interval(r.begin, r.end))
    }

    fn find_exact(&self, u: &N, v: &N, begin: T, end: T) -> Option<EdgeId> {
        self.succ
            .get(u)?
            .get(v)?
            .iter()
            .copied()
            .find(|id| {
                self.records
                    .get(id)
                    .is_some_and(|r| r.begin.same(&begin) && r.end.same(&end))
            })
    }

    fn out_ids<'a>(&'a self, n: &N) -> impl Iterator<Item = EdgeId> + 'a {
        self.succ
            .get(n)
            .into_iter()
            .flat_map(|nbrs| nbrs.values())
            .flat_map(|ids| ids.iter().copied())
    }

    fn in_ids<'a>(&'a self, n: &N) -> impl Iterator<Item = EdgeId> + 'a {
        self.pred
            .get(n)
            .into_iter()
            .flat_map(|nbrs| nbrs.values())
            .flat_map(|ids| ids.iter().copied())
    }

    fn select_ids(&self, u: Option<&N>, v: Option<&N>, window: Window<T>) -> Vec<EdgeId> {
        match (u, v) {
            (None, None) => self.tree.query(window.begin(), window.end()).collect(),
            (Some(u), Some(v)) => self
                .succ
                .get(u)
                .and_then(|nbrs| nbrs.get(v))
                .map(|ids| ids.iter().copied())
                .into_iter()
                .flatten()
                .filter(|&id| self.record_overlaps(id, window))
                .collect(),
            (Some(u), None) => self
                .out_ids(u)
                .filter(|&id| self.record_overlaps(id, window))
                .collect(),
            (None, Some(v)) => self
                .in_ids(v)
                .filter(|&id| self.record_overlaps(id, window))
                .collect(),
        }
    }

    fn link(adj: &mut AdjMap<N>, a: &N, b: &N, id: EdgeId) {
        adj.entry(a.clone())
            .or_default()
            .entry(b.clone())
            .or_default()
            .push(id);
    }

    fn unlink(adj: &mut AdjMap<N>, a: &N, b: &N, id: EdgeId) {
        if let Some(nbrs) = adj.get_mut(a) {
            if let Some(ids) = nbrs.get_mut(b) {
                ids.retain(|e| *e != id);
                if ids.is_empty() {
                    nbrs.remove(b);
                }
            }
        }
    }

    fn remove_record(&mut self, id: EdgeId) {
        let Some(record) = self.records.remove(&id) else {
            return;
        };
        self.tree.remove(record.begin, record.end, id);
        Self::unlink(&mut self.succ, &record.u, &record.v, id);
        Self::unlink(&mut self.pred, &record.v, &record.u, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(edges: Vec<IntervalEdge<i32, i64>>) -> Vec<(i32, i32, i64, i64)> {
        edges.into_iter().map(|e| (e.u, e.v, e.begin, e.end)).collect()
    }

    #[test]
    fn direction_matters() {
        let mut g = IntervalDiGraph::new();
        g.add_edge(1, 2, 3, 10).unwrap();

        assert!(g.has_edge(&1, &2, Window::all()));
        assert!(!g.has_edge(&2, &1, Window::all()));
        assert_eq!(
            keys(g.edges(None, Some(&2), Window::all())),
            vec![(1, 2, 3, 10)]
        );
        assert_eq!(keys(g.edges(Some(&2), None, Window::all())), vec![]);
    }

    #[test]
    fn degree_sums_both_directions() {
        let mut g = IntervalDiGraph::new();
        g.add_edge(1, 2, 3, 5).unwrap();
        g.add_edge(2, 3, 8, 11).unwrap();

        assert_eq!(g.degree(&2, Window::all()), 2);
        assert_eq!(g.in_degree(&2, Window::all()), 1);
        assert_eq!(g.out_degree(&2, Window::all()), 1);
        assert_eq!(g.degree(&2, Window::until(8)), 1);

        assert_eq!(
            g.degree_delta(&2, Window::all()),
            vec![(3, 1), (5, 0), (8, 1)]
        );
        assert_eq!(g.in_degree_delta(&2, Window::all()), vec![(3, 1), (5, 0)]);
        assert_eq!(
            g.out_degree_delta(&2, Window::all()),
            vec![(8, 1)]
        );
    }

    #[test]
    fn duplicate_directed_key_merges() {
        let mut g = IntervalDiGraph::new();
        g.add_edge(1, 2, 3, 10).unwrap();
        g.add_edge(1, 2, 3, 10).unwrap();
        // the reverse orientation is a distinct edge
        g.add_edge(2, 1, 3, 10).unwrap();
        assert_eq!(g.number_of_edges(), 2);
    }

    #[test]
    fn exact_removal_requires_the_exact_interval() {
        let mut g = IntervalDiGraph::new();
        g.add_edges_from([(1, 2, 3, 10), (2, 4, 1, 11)]).unwrap();

        g.remove_edge_exact(&2, &4, 2, 11); // wrong interval: no-op
        assert!(g.has_edge_exact(&2, &4, 1, 11));
        g.remove_edge_exact(&2, &4, 1, 11);
        assert!(!g.has_edge(&2, &4, Window::all()));
        assert_eq!(g.number_of_edges(), 1);
    }

    #[test]
    fn projection_and_round_trip() {
        let mut g = IntervalDiGraph::new();
        g.add_edges_from([(1, 2, 3, 10), (2, 4, 1, 11)]).unwrap();

        let stamped = g.to_subgraph(
            Window::all(),
            SubgraphOptions {
                edge_time_data: true,
                ..Default::default()
            },
        );
        assert!(stamped.has_edge(&1, &2));
        assert!(!stamped.has_edge(&2, &1));

        let back =
            IntervalDiGraph::<i32, i64>::from_static_graph(&stamped, "begin", "end").unwrap();
        assert_eq!(keys(back.all_edges()), keys(g.all_edges()));
    }

    #[test]
    fn invalid_duration_is_rejected_without_side_effects() {
        let mut g = IntervalDiGraph::<i32, i64>::new();
        assert!(g.add_edge(1, 2, 7, 7).is_err());
        assert!(!g.contains_node(&1));
        assert_eq!(g.number_of_edges(), 0);
    }
}
