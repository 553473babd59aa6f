//! Directed impulse graph.

use smallvec::SmallVec;

use chronograph_core::{
    Attributes, EdgeId, FxHashMap, GraphError, GraphResult, Inclusive, NodeId, TimeArith,
    TimeKey, TimestampIndex, TimeValue,
};

use crate::projection::{resolve_parts, SnapshotSpec, SubgraphOptions};
use crate::snapshot::{SnapshotDiGraph, SnapshotGraph, SnapshotRange};
use crate::static_graph::{StaticDiGraph, StaticGraph};
use crate::window::Window;

use super::graph::ImpulseRecord;
use super::ImpulseEdge;

type AdjMap<N> = FxHashMap<N, FxHashMap<N, SmallVec<[EdgeId; 2]>>>;

/// A directed graph whose edges exist at exactly one timestamp each.
///
/// Both `succ` (edges out of a node) and `pred` (edges into a node) are
/// maintained on every mutation, so in- and out-queries never scan the
/// whole edge set. The two directions reference the same edge records;
/// mutating an edge's attributes is visible from either side.
#[derive(Debug, Clone)]
pub struct ImpulseDiGraph<N: NodeId, T: TimeValue> {
    index: TimestampIndex<T>,
    records: FxHashMap<EdgeId, ImpulseRecord<N, T>>,
    succ: AdjMap<N>,
    pred: AdjMap<N>,
    nodes: FxHashMap<N, Attributes>,
    attrs: Attributes,
    next_edge: u64,
}

impl<N: NodeId, T: TimeValue> Default for ImpulseDiGraph<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, T: TimeValue> ImpulseDiGraph<N, T> {
    /// Create an empty directed impulse graph.
    pub fn new() -> Self {
        ImpulseDiGraph {
            index: TimestampIndex::new(),
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
        Some((self.index.first()?, self.index.last()?))
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
    /// bounded, as for the undirected form).
    pub fn has_node(&self, n: &N, window: Window<T>, inclusive: Inclusive) -> bool {
        if !self.nodes.contains_key(n) {
            return false;
        }
        if window.is_unbounded() {
            return true;
        }
        self.out_ids(n)
            .chain(self.in_ids(n))
            .any(|id| self.record_in_window(id, window, inclusive))
    }

    /// Nodes present during the window, sorted.
    pub fn nodes(&self, window: Window<T>, inclusive: Inclusive) -> Vec<N> {
        let mut out: Vec<N> = if window.is_unbounded() {
            self.nodes.keys().cloned().collect()
        } else {
            let mut present = Vec::new();
            for (id, _) in self.index.range(window.begin(), window.end(), inclusive) {
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

    pub fn number_of_nodes(&self, window: Window<T>, inclusive: Inclusive) -> usize {
        if window.is_unbounded() {
            self.nodes.len()
        } else {
            self.nodes(window, inclusive).len()
        }
    }

    /// Remove the node's qualifying incident edges (both directions), and
    /// the node itself when the window is unbounded or nothing remains.
    pub fn remove_node(&mut self, n: &N, window: Window<T>, inclusive: Inclusive) {
        if !self.nodes.contains_key(n) {
            return;
        }
        let doomed: Vec<EdgeId> = self
            .out_ids(n)
            .chain(self.in_ids(n))
            .filter(|&id| {
                window.is_unbounded() || self.record_in_window(id, window, inclusive)
            })
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

    /// Add a directed edge `u → v` at `t`. Endpoints are auto-created and
    /// a fresh multi-edge is appended even for an identical `(u, v, t)`.
    pub fn add_edge(&mut self, u: N, v: N, t: T) -> ImpulseEdge<N, T> {
        self.add_edge_with(u, v, t, Attributes::new())
    }

    /// Add a directed edge carrying attributes.
    pub fn add_edge_with(&mut self, u: N, v: N, t: T, attrs: Attributes) -> ImpulseEdge<N, T> {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;

        self.add_node(u.clone());
        self.add_node(v.clone());
        Self::link(&mut self.succ, &u, &v, id);
        Self::link(&mut self.pred, &v, &u, id);
        self.index.insert(t, id);
        self.records.insert(
            id,
            ImpulseRecord {
                u: u.clone(),
                v: v.clone(),
                t,
                attrs,
            },
        );
        ImpulseEdge { u, v, t, id }
    }

    pub fn add_edges_from(&mut self, edges: impl IntoIterator<Item = (N, N, T)>) {
        for (u, v, t) in edges {
            self.add_edge(u, v, t);
        }
    }

    /// Whether any edge `u → v` satisfies the window.
    pub fn has_edge(&self, u: &N, v: &N, window: Window<T>, inclusive: Inclusive) -> bool {
        let Some(ids) = self.succ.get(u).and_then(|nbrs| nbrs.get(v)) else {
            return false;
        };
        if window.is_unbounded() {
            return !ids.is_empty();
        }
        ids.iter()
            .any(|&id| self.record_in_window(id, window, inclusive))
    }

    /// Edges selected by optional endpoint constraints and a window,
    /// ascending by `(timestamp, id)`.
    ///
    /// `u` constrains the source side and `v` the target side: `u` alone
    /// yields edges out of `u`, `v` alone edges into `v`, both together
    /// the edges `u → v`.
    pub fn edges(
        &self,
        u: Option<&N>,
        v: Option<&N>,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<ImpulseEdge<N, T>> {
        let mut out: Vec<ImpulseEdge<N, T>> = self
            .select_ids(u, v, window, inclusive)
            .into_iter()
            .filter_map(|id| self.edge(id))
            .collect();
        out.sort_by(|a, b| a.t.cmp_time(&b.t).then(a.id.cmp(&b.id)));
        out
    }

    pub fn all_edges(&self) -> Vec<ImpulseEdge<N, T>> {
        self.edges(None, None, Window::all(), Inclusive::Both)
    }

    /// Like [`edges`](Self::edges), pairing each edge with its attribute
    /// map.
    pub fn edges_with_data(
        &self,
        u: Option<&N>,
        v: Option<&N>,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<(ImpulseEdge<N, T>, &Attributes)> {
        self.edges(u, v, window, inclusive)
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
        inclusive: Inclusive,
        key: &str,
        default: &serde_json::Value,
    ) -> Vec<(ImpulseEdge<N, T>, serde_json::Value)> {
        self.edges_with_data(u, v, window, inclusive)
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

    /// Remove every edge `u → v` whose timestamp satisfies the window.
    /// Quiet if nothing matches; empty adjacency branches are pruned on
    /// both the successor and predecessor side.
    pub fn remove_edge(&mut self, u: &N, v: &N, window: Window<T>, inclusive: Inclusive) {
        let Some(ids) = self.succ.get(u).and_then(|nbrs| nbrs.get(v)) else {
            return;
        };
        let doomed: Vec<EdgeId> = ids
            .iter()
            .copied()
            .filter(|&id| {
                window.is_unbounded() || self.record_in_window(id, window, inclusive)
            })
            .collect();
        for id in doomed {
            self.remove_record(id);
        }
    }

    // ── Degree ───────────────────────────────────────────────────────────

    /// In-degree plus out-degree (a self-loop counts on both sides).
    pub fn degree(&self, node: &N, window: Window<T>, inclusive: Inclusive) -> usize {
        self.out_degree(node, window, inclusive) + self.in_degree(node, window, inclusive)
    }

    /// Number of qualifying edges into `node`.
    pub fn in_degree(&self, node: &N, window: Window<T>, inclusive: Inclusive) -> usize {
        self.edges(None, Some(node), window, inclusive).len()
    }

    /// Number of qualifying edges out of `node`.
    pub fn out_degree(&self, node: &N, window: Window<T>, inclusive: Inclusive) -> usize {
        self.edges(Some(node), None, window, inclusive).len()
    }

    /// Mean of [`degree`](Self::degree) over nodes present in the window.
    pub fn mean_degree(&self, window: Window<T>, inclusive: Inclusive) -> Option<f64> {
        self.mean_by(window, inclusive, Self::degree)
    }

    /// Mean of [`in_degree`](Self::in_degree) over nodes present in the
    /// window.
    pub fn mean_in_degree(&self, window: Window<T>, inclusive: Inclusive) -> Option<f64> {
        self.mean_by(window, inclusive, Self::in_degree)
    }

    /// Mean of [`out_degree`](Self::out_degree) over nodes present in the
    /// window.
    pub fn mean_out_degree(&self, window: Window<T>, inclusive: Inclusive) -> Option<f64> {
        self.mean_by(window, inclusive, Self::out_degree)
    }

    /// Per-timestamp counts of edges touching `node` in either direction,
    /// ascending by time. Instantaneous counts, not a running total.
    pub fn degree_delta(
        &self,
        node: &N,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<(T, usize)> {
        let out = self.edges(Some(node), None, window, inclusive);
        let inc = self.edges(None, Some(node), window, inclusive);
        Self::per_time_counts(out.into_iter().chain(inc))
    }

    /// Per-timestamp counts of edges into `node`.
    pub fn in_degree_delta(
        &self,
        node: &N,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<(T, usize)> {
        Self::per_time_counts(self.edges(None, Some(node), window, inclusive).into_iter())
    }

    /// Per-timestamp counts of edges out of `node`.
    pub fn out_degree_delta(
        &self,
        node: &N,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<(T, usize)> {
        Self::per_time_counts(self.edges(Some(node), None, window, inclusive).into_iter())
    }

    // ── Projection ───────────────────────────────────────────────────────

    /// Project the edges satisfying the window into a directed static
    /// graph.
    pub fn to_subgraph(
        &self,
        window: Window<T>,
        inclusive: Inclusive,
        options: SubgraphOptions,
    ) -> StaticDiGraph<N> {
        let mut graph = if options.multigraph {
            StaticGraph::new_multigraph()
        } else {
            StaticGraph::new()
        };
        for (id, t) in self.index.range(window.begin(), window.end(), inclusive) {
            let Some(record) = self.records.get(&id) else {
                continue;
            };
            let mut attrs = if options.edge_data {
                record.attrs.clone()
            } else {
                Attributes::new()
            };
            if options.edge_time_data {
                attrs.insert("timestamp".to_string(), t.to_attr());
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

    /// Slice the graph's span into consecutive half-open windows (the last
    /// one end-inclusive) and project each.
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
            let inclusive = if i + 1 == parts {
                Inclusive::Both
            } else {
                Inclusive::Left
            };
            let window = Window::between(lo, hi)?;
            snapshots.push(((lo, hi), self.to_subgraph(window, inclusive, options)));
        }
        Ok(snapshots)
    }

    /// One point snapshot per distinct timestamp, packaged as a snapshot
    /// graph.
    pub fn to_snapshot_graph(&self, options: SubgraphOptions) -> SnapshotDiGraph<T, N> {
        let mut snapshots = SnapshotGraph::new();
        let times: Vec<T> = self.index.times().collect();
        for t in times {
            let graph = self.to_subgraph(Window::point(t), Inclusive::Both, options);
            snapshots.insert(graph, SnapshotRange::point(t));
        }
        snapshots
    }

    /// Build from a directed static graph whose edges carry their
    /// timestamp under `time_key`.
    pub fn from_static_graph(graph: &StaticDiGraph<N>, time_key: &str) -> GraphResult<Self> {
        let mut out = Self::new();
        for (u, v, attrs) in graph.edges() {
            let t = attrs
                .get(time_key)
                .and_then(T::from_attr)
                .ok_or_else(|| GraphError::MissingAttribute {
                    edge: format!("{u:?}, {v:?}"),
                    key: time_key.to_string(),
                })?;
            let mut attrs = attrs.clone();
            attrs.remove(time_key);
            out.add_edge_with(u.clone(), v.clone(), t, attrs);
        }
        Ok(out)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn edge(&self, id: EdgeId) -> Option<ImpulseEdge<N, T>> {
        self.records.get(&id).map(|r| ImpulseEdge {
            u: r.u.clone(),
            v: r.v.clone(),
            t: r.t,
            id,
        })
    }

    fn record_in_window(&self, id: EdgeId, window: Window<T>, inclusive: Inclusive) -> bool {
        self.records
            .get(&id)
            .is_some_and(|r| window.contains_time(r.t, inclusive))
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

    fn select_ids(
        &self,
        u: Option<&N>,
        v: Option<&N>,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<EdgeId> {
        match (u, v) {
            (None, None) => self
                .index
                .range(window.begin(), window.end(), inclusive)
                .map(|(id, _)| id)
                .collect(),
            (Some(u), Some(v)) => self
                .succ
                .get(u)
                .and_then(|nbrs| nbrs.get(v))
                .map(|ids| ids.iter().copied())
                .into_iter()
                .flatten()
                .filter(|&id| self.record_in_window(id, window, inclusive))
                .collect(),
            (Some(u), None) => self
                .out_ids(u)
                .filter(|&id| self.record_in_window(id, window, inclusive))
                .collect(),
            (None, Some(v)) => self
                .in_ids(v)
                .filter(|&id| self.record_in_window(id, window, inclusive))
                .collect(),
        }
    }

    fn mean_by(
        &self,
        window: Window<T>,
        inclusive: Inclusive,
        degree_of: impl Fn(&Self, &N, Window<T>, Inclusive) -> usize,
    ) -> Option<f64> {
        let nodes = self.nodes(window, inclusive);
        if nodes.is_empty() {
            return None;
        }
        let total: usize = nodes
            .iter()
            .map(|n| degree_of(self, n, window, inclusive))
            .sum();
        Some(total as f64 / nodes.len() as f64)
    }

    fn per_time_counts(edges: impl Iterator<Item = ImpulseEdge<N, T>>) -> Vec<(T, usize)> {
        let mut per_time: std::collections::BTreeMap<TimeKey<T>, usize> = Default::default();
        for edge in edges {
            *per_time.entry(TimeKey(edge.t)).or_default() += 1;
        }
        per_time.into_iter().map(|(k, count)| (k.0, count)).collect()
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
        self.index.remove(record.t, id);
        Self::unlink(&mut self.succ, &record.u, &record.v, id);
        Self::unlink(&mut self.pred, &record.v, &record.u, id);
    }
}
