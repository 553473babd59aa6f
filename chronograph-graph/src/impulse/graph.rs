//! Undirected impulse graph.

use smallvec::SmallVec;

use chronograph_core::{
    Attributes, EdgeId, FxHashMap, GraphError, GraphResult, Inclusive, NodeId, TimeArith,
    TimeKey, TimestampIndex, TimeValue,
};

use crate::projection::{resolve_parts, SnapshotSpec, SubgraphOptions};
use crate::snapshot::{SnapshotGraph, SnapshotRange, SnapshotUnGraph};
use crate::static_graph::{StaticGraph, StaticUnGraph};
use crate::window::Window;

use super::ImpulseEdge;

#[derive(Debug, Clone)]
pub(crate) struct ImpulseRecord<N, T> {
    pub(crate) u: N,
    pub(crate) v: N,
    pub(crate) t: T,
    pub(crate) attrs: Attributes,
}

type AdjMap<N> = FxHashMap<N, FxHashMap<N, SmallVec<[EdgeId; 2]>>>;

/// An undirected graph whose edges exist at exactly one timestamp each.
///
/// Nodes and edges carry attribute maps; the graph itself carries an
/// uninterpreted attribute bag. Multiple edges between the same pair,
/// even at the same timestamp, are all retained. Removal of absent nodes
/// or edges is a quiet no-op, while malformed windows are rejected when
/// the [`Window`] is built.
///
/// A node is present in a windowed query iff it is an endpoint of an edge
/// whose timestamp satisfies the window; nodes added explicitly but never
/// connected are globally present regardless of window.
#[derive(Debug, Clone)]
pub struct ImpulseGraph<N: NodeId, T: TimeValue> {
    index: TimestampIndex<T>,
    records: FxHashMap<EdgeId, ImpulseRecord<N, T>>,
    adj: AdjMap<N>,
    nodes: FxHashMap<N, Attributes>,
    attrs: Attributes,
    next_edge: u64,
}

impl<N: NodeId, T: TimeValue> Default for ImpulseGraph<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, T: TimeValue> ImpulseGraph<N, T> {
    /// Create an empty impulse graph.
    pub fn new() -> Self {
        ImpulseGraph {
            index: TimestampIndex::new(),
            records: FxHashMap::default(),
            adj: AdjMap::default(),
            nodes: FxHashMap::default(),
            attrs: Attributes::new(),
            next_edge: 0,
        }
    }

    /// Create an empty impulse graph carrying graph-level attributes.
    pub fn with_attrs(attrs: Attributes) -> Self {
        let mut graph = Self::new();
        graph.attrs = attrs;
        graph
    }

    /// Graph-level attribute bag, stored verbatim.
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

    /// `(begin, end)` span of the entire graph; `None` when there are no
    /// edges.
    pub fn interval(&self) -> Option<(T, T)> {
        Some((self.index.first()?, self.index.last()?))
    }

    /// Total number of stored edges.
    pub fn number_of_edges(&self) -> usize {
        self.records.len()
    }

    // ── Nodes ────────────────────────────────────────────────────────────

    /// Add a single node. No-op on the node set if it already exists.
    pub fn add_node(&mut self, n: N) {
        self.nodes.entry(n.clone()).or_default();
        self.adj.entry(n).or_default();
    }

    /// Add a node and merge `attrs` into its attribute map.
    pub fn add_node_with(&mut self, n: N, attrs: Attributes) {
        self.adj.entry(n.clone()).or_default();
        self.nodes.entry(n).or_default().extend(attrs);
    }

    pub fn add_nodes_from(&mut self, nodes: impl IntoIterator<Item = N>) {
        for n in nodes {
            self.add_node(n);
        }
    }

    /// Whether the node exists at all, ignoring time.
    pub fn contains_node(&self, n: &N) -> bool {
        self.nodes.contains_key(n)
    }

    /// Node attribute map.
    pub fn node_attrs(&self, n: &N) -> Option<&Attributes> {
        self.nodes.get(n)
    }

    pub fn node_attrs_mut(&mut self, n: &N) -> Option<&mut Attributes> {
        self.nodes.get_mut(n)
    }

    /// Whether the node is present during the window: without bounds, node
    /// existence; with bounds, presence of at least one qualifying
    /// incident edge.
    pub fn has_node(&self, n: &N, window: Window<T>, inclusive: Inclusive) -> bool {
        if !self.nodes.contains_key(n) {
            return false;
        }
        if window.is_unbounded() {
            return true;
        }
        self.incident_ids(n)
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

    /// Number of nodes present during the window.
    pub fn number_of_nodes(&self, window: Window<T>, inclusive: Inclusive) -> usize {
        if window.is_unbounded() {
            self.nodes.len()
        } else {
            self.nodes(window, inclusive).len()
        }
    }

    /// Remove the presence of a node within the window: its qualifying
    /// incident edges always, and the node itself when the window is
    /// unbounded or no incident edges remain. Quiet if absent.
    pub fn remove_node(&mut self, n: &N, window: Window<T>, inclusive: Inclusive) {
        if !self.nodes.contains_key(n) {
            return;
        }
        let doomed: Vec<EdgeId> = self
            .incident_ids(n)
            .filter(|&id| {
                window.is_unbounded() || self.record_in_window(id, window, inclusive)
            })
            .collect();
        for id in doomed {
            self.remove_record(id);
        }
        if window.is_unbounded() || self.adj.get(n).map_or(true, |m| m.is_empty()) {
            self.adj.remove(n);
            self.nodes.remove(n);
        }
    }

    // ── Edges ────────────────────────────────────────────────────────────

    /// Add an edge between `u` and `v` at `t`. Endpoints are auto-created.
    /// A fresh multi-edge is appended even for an identical `(u, v, t)`.
    pub fn add_edge(&mut self, u: N, v: N, t: T) -> ImpulseEdge<N, T> {
        self.add_edge_with(u, v, t, Attributes::new())
    }

    /// Add an edge carrying attributes.
    pub fn add_edge_with(&mut self, u: N, v: N, t: T, attrs: Attributes) -> ImpulseEdge<N, T> {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;

        self.add_node(u.clone());
        self.add_node(v.clone());
        self.link(&u, &v, id);
        if u != v {
            self.link(&v, &u, id);
        }
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

    /// Add every `(u, v, t)` edge in the iterator.
    pub fn add_edges_from(&mut self, edges: impl IntoIterator<Item = (N, N, T)>) {
        for (u, v, t) in edges {
            self.add_edge(u, v, t);
        }
    }

    /// Whether any edge between `u` and `v` satisfies the window.
    pub fn has_edge(&self, u: &N, v: &N, window: Window<T>, inclusive: Inclusive) -> bool {
        let Some(ids) = self.adj.get(u).and_then(|nbrs| nbrs.get(v)) else {
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
    /// The four shapes compose: no constraint scans the timestamp index;
    /// `u` alone takes every edge incident to `u`; `u` and `v` take the
    /// edges between them; each is then filtered by the window.
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

    /// Every edge in the graph, ascending by `(timestamp, id)`.
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

    /// Like [`edges`](Self::edges), pairing each edge with the value of
    /// one named attribute, or a clone of `default` where it is absent.
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

    /// Attribute map of one stored edge.
    pub fn edge_attrs(&self, id: EdgeId) -> Option<&Attributes> {
        self.records.get(&id).map(|r| &r.attrs)
    }

    /// Mutable attribute map of one stored edge.
    pub fn edge_attrs_mut(&mut self, id: EdgeId) -> Option<&mut Attributes> {
        self.records.get_mut(&id).map(|r| &mut r.attrs)
    }

    /// Remove every edge between `u` and `v` whose timestamp satisfies the
    /// window (all of them when unbounded). Quiet if nothing matches.
    pub fn remove_edge(&mut self, u: &N, v: &N, window: Window<T>, inclusive: Inclusive) {
        let Some(ids) = self.adj.get(u).and_then(|nbrs| nbrs.get(v)) else {
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

    /// Number of qualifying edges incident to `node`.
    pub fn degree(&self, node: &N, window: Window<T>, inclusive: Inclusive) -> usize {
        self.edges(Some(node), None, window, inclusive).len()
    }

    /// Arithmetic mean degree over the nodes present in the window;
    /// `None` when no node qualifies.
    pub fn mean_degree(&self, window: Window<T>, inclusive: Inclusive) -> Option<f64> {
        let nodes = self.nodes(window, inclusive);
        if nodes.is_empty() {
            return None;
        }
        let total: usize = nodes
            .iter()
            .map(|n| self.degree(n, window, inclusive))
            .sum();
        Some(total as f64 / nodes.len() as f64)
    }

    /// Per-timestamp incident edge counts, ascending by time.
    ///
    /// Impulse edges are instantaneous, so this reports the number of
    /// events at each distinct timestamp, not a running total. Interval
    /// graphs report the cumulative form instead.
    pub fn degree_delta(
        &self,
        node: &N,
        window: Window<T>,
        inclusive: Inclusive,
    ) -> Vec<(T, usize)> {
        let mut per_time: std::collections::BTreeMap<TimeKey<T>, usize> = Default::default();
        for edge in self.edges(Some(node), None, window, inclusive) {
            *per_time.entry(TimeKey(edge.t)).or_default() += 1;
        }
        per_time.into_iter().map(|(k, count)| (k.0, count)).collect()
    }

    // ── Projection ───────────────────────────────────────────────────────

    /// Project the edges satisfying the window into a static graph.
    pub fn to_subgraph(
        &self,
        window: Window<T>,
        inclusive: Inclusive,
        options: SubgraphOptions,
    ) -> StaticUnGraph<N> {
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
    /// one end-inclusive) and project each. Returns the windows with their
    /// static graphs.
    pub fn to_snapshots(
        &self,
        spec: SnapshotSpec<T>,
        options: SubgraphOptions,
    ) -> GraphResult<Vec<((T, T), StaticUnGraph<N>)>>
    where
        T: TimeArith,
    {
        let (begin, end) = self.interval().ok_or(GraphError::EmptyGraph)?;
        let parts = resolve_parts(spec, begin, end)?;
        tracing::debug!(parts, "partitioning impulse graph into snapshots");

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
    pub fn to_snapshot_graph(&self, options: SubgraphOptions) -> SnapshotUnGraph<T, N> {
        let mut snapshots = SnapshotGraph::new();
        let times: Vec<T> = self.index.times().collect();
        for t in times {
            let graph = self.to_subgraph(Window::point(t), Inclusive::Both, options);
            snapshots.insert(graph, SnapshotRange::point(t));
        }
        snapshots
    }

    /// Build an impulse graph from a static graph whose edges carry their
    /// timestamp under `time_key`. The attribute is consumed, not copied.
    pub fn from_static_graph(graph: &StaticUnGraph<N>, time_key: &str) -> GraphResult<Self> {
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

    fn incident_ids<'a>(&'a self, n: &N) -> impl Iterator<Item = EdgeId> + 'a {
        self.adj
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
                .adj
                .get(u)
                .and_then(|nbrs| nbrs.get(v))
                .map(|ids| ids.iter().copied())
                .into_iter()
                .flatten()
                .filter(|&id| self.record_in_window(id, window, inclusive))
                .collect(),
            (Some(n), None) | (None, Some(n)) => self
                .incident_ids(n)
                .filter(|&id| self.record_in_window(id, window, inclusive))
                .collect(),
        }
    }

    fn link(&mut self, a: &N, b: &N, id: EdgeId) {
        self.adj
            .entry(a.clone())
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
        Self::unlink(&mut self.adj, &record.u, &record.v, id);
        if record.u != record.v {
            Self::unlink(&mut self.adj, &record.v, &record.u, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(edges: Vec<ImpulseEdge<i32, i64>>) -> Vec<(i32, i32, i64)> {
        edges.into_iter().map(|e| (e.u, e.v, e.t)).collect()
    }

    #[test]
    fn edges_are_multi_edges() {
        let mut g = ImpulseGraph::new();
        let first = g.add_edge(1, 2, 10);
        let second = g.add_edge(1, 2, 10);
        assert_ne!(first.id, second.id);
        assert_eq!(g.number_of_edges(), 2);
    }

    #[test]
    fn interval_is_edge_derived() {
        let mut g = ImpulseGraph::new();
        assert_eq!(g.interval(), None);
        g.add_edges_from([(1, 2, 10), (3, 7, 16)]);
        assert_eq!(g.interval(), Some((10, 16)));
    }

    #[test]
    fn windowed_node_presence() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 5), (3, 4, 11)]);
        g.add_node(99);

        assert_eq!(g.number_of_nodes(Window::all(), Inclusive::Left), 5);
        assert_eq!(
            g.nodes(Window::since(6), Inclusive::Left),
            vec![3, 4]
        );
        assert!(g.has_node(&3, Window::since(2), Inclusive::Left));
        assert!(!g.has_node(&3, Window::until(2), Inclusive::Left));
        // an isolated node is present without a window but never inside one
        assert!(g.has_node(&99, Window::all(), Inclusive::Left));
        assert!(!g.has_node(&99, Window::since(0), Inclusive::Left));
    }

    #[test]
    fn edge_query_shapes() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 10), (2, 4, 11), (6, 4, 19), (2, 4, 15)]);

        assert_eq!(
            pairs(g.all_edges()),
            vec![(1, 2, 10), (2, 4, 11), (2, 4, 15), (6, 4, 19)]
        );
        assert_eq!(
            pairs(g.edges(None, None, Window::between(11, 15).unwrap(), Inclusive::Both)),
            vec![(2, 4, 11), (2, 4, 15)]
        );
        assert_eq!(
            pairs(g.edges(Some(&2), None, Window::all(), Inclusive::Both)),
            vec![(1, 2, 10), (2, 4, 11), (2, 4, 15)]
        );
        assert_eq!(
            pairs(g.edges(Some(&2), Some(&4), Window::until(11), Inclusive::Both)),
            vec![(2, 4, 11)]
        );
        assert_eq!(
            pairs(g.edges(Some(&1), Some(&6), Window::all(), Inclusive::Both)),
            vec![]
        );
    }

    #[test]
    fn edge_data_modes() {
        let mut g = ImpulseGraph::new();
        g.add_edge_with(1, 3, 4, Attributes::from([("weight".to_string(), json!(8))]));
        g.add_edge_with(1, 2, 10, Attributes::from([("weight".to_string(), json!(10))]));
        g.add_edge(2, 6, 10);

        let with_attr = g.edges_with_attr(
            None,
            None,
            Window::all(),
            Inclusive::Both,
            "weight",
            &json!(5),
        );
        let values: Vec<_> = with_attr.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![json!(8), json!(10), json!(5)]);

        let with_data = g.edges_with_data(None, None, Window::all(), Inclusive::Both);
        assert_eq!(with_data[0].1.get("weight"), Some(&json!(8)));
        assert!(with_data[2].1.is_empty());
    }

    #[test]
    fn remove_edge_is_windowed_and_idempotent() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 10), (2, 4, 11), (6, 4, 9), (1, 2, 15)]);

        g.remove_edge(&1, &2, Window::between(2, 11).unwrap(), Inclusive::Left);
        assert!(!g.has_edge(&1, &2, Window::between(2, 11).unwrap(), Inclusive::Left));
        assert!(g.has_edge(&1, &2, Window::all(), Inclusive::Both));

        g.remove_edge(&1, &2, Window::all(), Inclusive::Both);
        assert!(!g.has_edge(&1, &2, Window::all(), Inclusive::Both));
        // second removal is a quiet no-op
        g.remove_edge(&1, &2, Window::all(), Inclusive::Both);
        g.remove_edge(&7, &8, Window::all(), Inclusive::Both);
        assert_eq!(g.number_of_edges(), 2);
    }

    #[test]
    fn remove_node_prunes_incident_edges() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 10), (2, 4, 11), (6, 4, 19), (2, 4, 15)]);

        g.remove_node(&6, Window::between(10, 20).unwrap(), Inclusive::Left);
        assert_eq!(g.nodes(Window::all(), Inclusive::Both), vec![1, 2, 4]);

        g.remove_node(&2, Window::all(), Inclusive::Both);
        assert!(!g.contains_node(&2));
        assert_eq!(pairs(g.all_edges()), vec![]);
    }

    #[test]
    fn degree_scenarios() {
        let mut g = ImpulseGraph::new();
        g.add_edge(1, 2, 3);
        g.add_edge(2, 3, 8);

        assert_eq!(g.degree(&2, Window::all(), Inclusive::Both), 2);
        assert_eq!(g.degree(&2, Window::since(2), Inclusive::Both), 2);
        assert_eq!(g.degree(&2, Window::until(8), Inclusive::Left), 1);
        let mean = g.mean_degree(Window::all(), Inclusive::Both).unwrap();
        assert!((mean - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            g.degree_delta(&2, Window::all(), Inclusive::Both),
            vec![(3, 1), (8, 1)]
        );
    }

    #[test]
    fn self_loop_counts_once() {
        let mut g = ImpulseGraph::new();
        g.add_edge(1, 1, 5);
        assert_eq!(g.degree(&1, Window::all(), Inclusive::Both), 1);
        g.remove_edge(&1, &1, Window::all(), Inclusive::Both);
        assert_eq!(g.number_of_edges(), 0);
    }

    #[test]
    fn subgraph_projection() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 10), (2, 4, 11), (6, 4, 19), (2, 4, 15)]);

        let h = g.to_subgraph(
            Window::between(4, 12).unwrap(),
            Inclusive::Left,
            SubgraphOptions::default(),
        );
        assert_eq!(h.edge_count(), 2);
        assert!(h.has_edge(&1, &2) && h.has_edge(&2, &4));

        let stamped = g.to_subgraph(
            Window::between(10, 12).unwrap(),
            Inclusive::Left,
            SubgraphOptions {
                edge_time_data: true,
                ..Default::default()
            },
        );
        assert_eq!(
            stamped.edge_attrs(&1, &2).unwrap().get("timestamp"),
            Some(&json!(10))
        );
    }

    #[test]
    fn snapshots_cover_the_span() {
        let mut g = ImpulseGraph::new();
        g.add_edges_from([(1, 2, 10), (2, 4, 11), (6, 4, 19), (2, 4, 15)]);

        let snaps = g
            .to_snapshots(SnapshotSpec::Count(2), SubgraphOptions::default())
            .unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].0, (10, 14));
        assert_eq!(snaps[1].0, (14, 19));
        // edge at the terminal boundary lands in the (end-inclusive) last window
        assert!(snaps[1].1.has_edge(&6, &4));
        assert_eq!(snaps[0].1.edge_count(), 2);

        assert!(matches!(
            g.to_snapshots(SnapshotSpec::Count(1), SubgraphOptions::default()),
            Err(GraphError::InvalidSnapshotCount { .. })
        ));
        assert!(matches!(
            ImpulseGraph::<i32, i64>::new()
                .to_snapshots(SnapshotSpec::Count(2), SubgraphOptions::default()),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn static_graph_round_trip() {
        let mut g = ImpulseGraph::new();
        g.add_edge_with(1, 2, 10, Attributes::from([("w".to_string(), json!(1.5))]));
        g.add_edge(2, 3, 11);

        let stamped = g.to_subgraph(
            Window::all(),
            Inclusive::Both,
            SubgraphOptions {
                edge_data: true,
                edge_time_data: true,
                ..Default::default()
            },
        );
        let back = ImpulseGraph::<i32, i64>::from_static_graph(&stamped, "timestamp").unwrap();
        assert_eq!(pairs(back.all_edges()).len(), 2);
        assert!(back.has_edge(&1, &2, Window::point(10), Inclusive::Both));

        let bare = g.to_subgraph(Window::all(), Inclusive::Both, SubgraphOptions::default());
        assert!(matches!(
            ImpulseGraph::<i32, i64>::from_static_graph(&bare, "timestamp"),
            Err(GraphError::MissingAttribute { .. })
        ));
    }
}
