//! Undirected interval graph.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use chronograph_core::{
    Attributes, EdgeId, FxHashMap, FxHashSet, GraphError, GraphResult, IntervalTree, NodeId,
    TimeArith, TimeKey, TimeValue,
};

use crate::projection::{resolve_parts, SnapshotSpec, SubgraphOptions};
use crate::snapshot::{SnapshotGraph, SnapshotRange, SnapshotUnGraph};
use crate::static_graph::{GraphPayload, StaticGraph, StaticUnGraph};
use crate::window::Window;

use super::IntervalEdge;

#[derive(Debug, Clone)]
pub(crate) struct IntervalRecord<N, T> {
    pub(crate) u: N,
    pub(crate) v: N,
    pub(crate) begin: T,
    pub(crate) end: T,
    pub(crate) attrs: Attributes,
}

type AdjMap<N> = FxHashMap<N, FxHashMap<N, SmallVec<[EdgeId; 2]>>>;

/// An undirected graph whose edges are valid over half-open `[begin, end)`
/// intervals, indexed by an augmented interval tree.
///
/// Adding an edge whose `(u, v, begin, end)` key already exists merges the
/// attributes into the existing record. Removal of absent edges is a
/// quiet no-op; intervals with `end <= begin` are rejected before any
/// state changes.
#[derive(Debug, Clone)]
pub struct IntervalGraph<N: NodeId, T: TimeValue> {
    tree: IntervalTree<T>,
    records: FxHashMap<EdgeId, IntervalRecord<N, T>>,
    adj: AdjMap<N>,
    nodes: FxHashMap<N, Attributes>,
    attrs: Attributes,
    next_edge: u64,
}

impl<N: NodeId, T: TimeValue> Default for IntervalGraph<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, T: TimeValue> IntervalGraph<N, T> {
    /// Create an empty interval graph.
    pub fn new() -> Self {
        IntervalGraph {
            tree: IntervalTree::new(),
            records: FxHashMap::default(),
            adj: AdjMap::default(),
            nodes: FxHashMap::default(),
            attrs: Attributes::new(),
            next_edge: 0,
        }
    }

    /// Create an empty interval graph carrying graph-level attributes.
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
        self.adj.entry(n).or_default();
    }

    pub fn add_node_with(&mut self, n: N, attrs: Attributes) {
        self.adj.entry(n.clone()).or_default();
        self.nodes.entry(n).or_default().extend(attrs);
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

    /// Whether the node is present during the window: without bounds, node
    /// existence; with bounds, at least one overlapping incident edge.
    pub fn has_node(&self, n: &N, window: Window<T>) -> bool {
        if !self.nodes.contains_key(n) {
            return false;
        }
        if window.is_unbounded() {
            return true;
        }
        self.incident_ids(n)
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

    /// Remove the node's overlapping incident edges, and the node itself
    /// when the window is unbounded or no incident edges remain.
    pub fn remove_node(&mut self, n: &N, window: Window<T>) {
        if !self.nodes.contains_key(n) {
            return;
        }
        let doomed: Vec<EdgeId> = self
            .incident_ids(n)
            .filter(|&id| window.is_unbounded() || self.record_overlaps(id, window))
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

    /// Add an edge valid during `[begin, end)`. Endpoints are
    /// auto-created. Re-adding an identical key is a no-op on the edge
    /// set.
    pub fn add_edge(&mut self, u: N, v: N, begin: T, end: T) -> GraphResult<IntervalEdge<N, T>> {
        self.add_edge_with(u, v, begin, end, Attributes::new())
    }

    /// Add an edge carrying attributes; on an existing identical key the
    /// attributes merge into the one shared record.
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
        self.link(&u, &v, id);
        if u != v {
            self.link(&v, &u, id);
        }
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

    /// Add every `(u, v, begin, end)` edge in the iterator.
    pub fn add_edges_from(
        &mut self,
        edges: impl IntoIterator<Item = (N, N, T, T)>,
    ) -> GraphResult<()> {
        for (u, v, begin, end) in edges {
            self.add_edge(u, v, begin, end)?;
        }
        Ok(())
    }

    /// Whether any edge between `u` and `v` overlaps the window.
    pub fn has_edge(&self, u: &N, v: &N, window: Window<T>) -> bool {
        let Some(ids) = self.adj.get(u).and_then(|nbrs| nbrs.get(v)) else {
            return false;
        };
        if window.is_unbounded() {
            return !ids.is_empty();
        }
        ids.iter().any(|&id| self.record_overlaps(id, window))
    }

    /// Whether the edge with exactly this interval exists.
    pub fn has_edge_exact(&self, u: &N, v: &N, begin: T, end: T) -> bool {
        self.find_exact(u, v, begin, end).is_some()
    }

    /// Edges selected by optional endpoint constraints and a window,
    /// ascending by `(begin, end, id)`.
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

    /// Every edge in the graph, ascending by `(begin, end, id)`.
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

    /// Remove every edge between `u` and `v` whose interval overlaps the
    /// window (all of them when unbounded). Quiet if nothing matches.
    pub fn remove_edge(&mut self, u: &N, v: &N, window: Window<T>) {
        let Some(ids) = self.adj.get(u).and_then(|nbrs| nbrs.get(v)) else {
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

    /// Remove only the edge with exactly this interval. Quiet if absent.
    pub fn remove_edge_exact(&mut self, u: &N, v: &N, begin: T, end: T) {
        if let Some(id) = self.find_exact(u, v, begin, end) {
            self.remove_record(id);
        }
    }

    // ── Degree ───────────────────────────────────────────────────────────

    /// Number of incident edges overlapping the window.
    pub fn degree(&self, node: &N, window: Window<T>) -> usize {
        self.edges(Some(node), None, window).len()
    }

    /// Arithmetic mean degree over the nodes present in the window;
    /// `None` when no node qualifies.
    pub fn mean_degree(&self, window: Window<T>) -> Option<f64> {
        let nodes = self.nodes(window);
        if nodes.is_empty() {
            return None;
        }
        let total: usize = nodes.iter().map(|n| self.degree(n, window)).sum();
        Some(total as f64 / nodes.len() as f64)
    }

    /// Degree over time: a sweep that applies +1 at each incident edge's
    /// begin and -1 at its end, seeded with the degree at the window
    /// start so the first event is not double-counted. One output point
    /// per distinct event time, carrying the running total after that
    /// time's net change.
    ///
    /// This is the cumulative form, since interval edges persist. Impulse
    /// graphs report per-timestamp event counts instead.
    pub fn degree_delta(&self, node: &N, window: Window<T>) -> Vec<(T, usize)> {
        let (Some(tree_begin), Some(tree_end)) = (self.tree.begin(), self.tree.end()) else {
            return Vec::new();
        };
        let begin = window.begin().unwrap_or(tree_begin);
        let end = window.end().unwrap_or(tree_end);
        if begin.after(&end) {
            return Vec::new();
        }
        let Ok(window) = Window::between(begin, end) else {
            return Vec::new();
        };

        let mut current = self.degree(node, Window::point(begin)) as i64;
        let mut events: BTreeMap<TimeKey<T>, i64> = BTreeMap::new();
        for edge in self.edges(Some(node), None, window) {
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

    // ── Projection ───────────────────────────────────────────────────────

    /// Project the edges overlapping the window into a static graph.
    pub fn to_subgraph(&self, window: Window<T>, options: SubgraphOptions) -> StaticUnGraph<N> {
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
    /// project each; the terminal boundary edge is never dropped because
    /// overlap (not containment) selects edges.
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
        tracing::debug!(parts, "partitioning interval graph into snapshots");

        let mut snapshots = Vec::with_capacity(parts);
        for i in 0..parts {
            let lo = T::partition_boundary(begin, end, i, parts);
            let hi = T::partition_boundary(begin, end, i + 1, parts);
            let window = Window::between(lo, hi)?;
            snapshots.push(((lo, hi), self.to_subgraph(window, options)));
        }
        Ok(snapshots)
    }

    /// Partition into snapshots and package them as a snapshot graph keyed
    /// by the partition windows.
    pub fn to_snapshot_graph(
        &self,
        spec: SnapshotSpec<T>,
        options: SubgraphOptions,
    ) -> GraphResult<SnapshotUnGraph<T, N>>
    where
        T: TimeArith,
    {
        let mut snapshots = SnapshotGraph::new();
        for ((lo, hi), graph) in self.to_snapshots(spec, options)? {
            snapshots.insert(graph, SnapshotRange::interval(lo, hi)?);
        }
        Ok(snapshots)
    }

    /// Build an interval graph from a static graph whose edges carry
    /// their bounds under `begin_key`/`end_key`.
    pub fn from_static_graph(
        graph: &StaticUnGraph<N>,
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

    /// Rebuild an interval graph from a snapshot sequence: the first
    /// snapshot starts at `begin`, each lasts `period`, and an edge
    /// present in consecutive snapshots becomes one interval edge
    /// spanning the run (keeping the attributes of its first occurrence).
    /// Endpoint pairs are normalized, so payload direction is ignored.
    pub fn from_snapshot_graph<G>(
        snapshots: &SnapshotGraph<T, G>,
        begin: T,
        period: T,
    ) -> GraphResult<Self>
    where
        T: TimeArith,
        G: GraphPayload<N>,
    {
        let mut out = Self::new();
        let mut active: FxHashMap<(N, N), (T, Attributes)> = FxHashMap::default();
        let mut t = begin;

        for (_, graph) in snapshots.iter() {
            let edges = graph.edge_list();
            let mut seen: FxHashSet<(N, N)> = FxHashSet::default();
            for (u, v, _) in &edges {
                seen.insert(Self::normalize_pair(u.clone(), v.clone()));
            }

            // runs that did not continue into this snapshot end at its start
            let ended: Vec<(N, N)> = active
                .keys()
                .filter(|key| !seen.contains(*key))
                .cloned()
                .collect();
            for key in ended {
                if let Some((start, attrs)) = active.remove(&key) {
                    out.add_edge_with(key.0, key.1, start, t, attrs)?;
                }
            }

            for (u, v, attrs) in edges {
                let key = Self::normalize_pair(u, v);
                active.entry(key).or_insert((t, attrs));
            }
            t = t + period;
        }

        let mut rest: Vec<((N, N), (T, Attributes))> = active.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        for ((u, v), (start, attrs)) in rest {
            out.add_edge_with(u, v, start, t, attrs)?;
        }
        Ok(out)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn normalize_pair(u: N, v: N) -> (N, N) {
        if v < u {
            (v, u)
        } else {
            (u, v)
        }
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
        self.adj
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

    fn incident_ids<'a>(&'a self, n: &N) -> impl Iterator<Item = EdgeId> + 'a {
        self.adj
            .get(n)
            .into_iter()
            .flat_map(|nbrs| nbrs.values())
            .flat_map(|ids| ids.iter().copied())
    }

    fn select_ids(&self, u: Option<&N>, v: Option<&N>, window: Window<T>) -> Vec<EdgeId> {
        match (u, v) {
            (None, None) => self.tree.query(window.begin(), window.end()).collect(),
            (Some(u), Some(v)) => self
                .adj
                .get(u)
                .and_then(|nbrs| nbrs.get(v))
                .map(|ids| ids.iter().copied())
                .into_iter()
                .flatten()
                .filter(|&id| self.record_overlaps(id, window))
                .collect(),
            (Some(n), None) | (None, Some(n)) => self
                .incident_ids(n)
                .filter(|&id| self.record_overlaps(id, window))
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
        self.tree.remove(record.begin, record.end, id);
        Self::unlink(&mut self.adj, &record.u, &record.v, id);
        if record.u != record.v {
            Self::unlink(&mut self.adj, &record.v, &record.u, id);
        }
    }
}
