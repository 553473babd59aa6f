//! The static-graph collaborator.
//!
//! Temporal graphs project windows into plain static graphs and are
//! convertible back from them. The core never implements graph algorithms
//! itself; external algorithms run against these payloads, reached
//! through [`GraphPayload`].

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, EdgeType, Undirected};

use chronograph_core::{Attributes, FxHashMap, NodeId};

/// Node payload: the caller's identifier plus its attribute map.
#[derive(Debug, Clone)]
pub struct StaticNode<N> {
    pub id: N,
    pub attrs: Attributes,
}

/// A static graph with attribute-carrying nodes and edges, indexed by the
/// caller's node identifiers.
///
/// Plain mode merges attribute maps when an edge between the same pair is
/// added twice; multigraph mode keeps parallel edges.
#[derive(Debug, Clone)]
pub struct StaticGraph<N: NodeId, Ty: EdgeType = Undirected> {
    graph: StableGraph<StaticNode<N>, Attributes, Ty>,
    index: FxHashMap<N, NodeIndex>,
    multi: bool,
}

/// Undirected static graph.
pub type StaticUnGraph<N> = StaticGraph<N, Undirected>;
/// Directed static graph.
pub type StaticDiGraph<N> = StaticGraph<N, Directed>;

impl<N: NodeId, Ty: EdgeType> Default for StaticGraph<N, Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId, Ty: EdgeType> StaticGraph<N, Ty> {
    /// Create an empty plain graph.
    pub fn new() -> Self {
        StaticGraph {
            graph: StableGraph::default(),
            index: FxHashMap::default(),
            multi: false,
        }
    }

    /// Create an empty multigraph (parallel edges kept).
    pub fn new_multigraph() -> Self {
        StaticGraph {
            graph: StableGraph::default(),
            index: FxHashMap::default(),
            multi: true,
        }
    }

    pub fn is_multigraph(&self) -> bool {
        self.multi
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, n: &N) -> bool {
        self.index.contains_key(n)
    }

    /// Get-or-create the node for an identifier.
    pub fn ensure_node(&mut self, n: N) -> NodeIndex {
        if let Some(&idx) = self.index.get(&n) {
            return idx;
        }
        let idx = self.graph.add_node(StaticNode {
            id: n.clone(),
            attrs: Attributes::new(),
        });
        self.index.insert(n, idx);
        idx
    }

    /// Add a node, merging `attrs` into any existing attribute map.
    pub fn add_node(&mut self, n: N, attrs: Attributes) {
        let idx = self.ensure_node(n);
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.attrs.extend(attrs);
        }
    }

    /// Add an edge. In plain mode an existing edge between the endpoints
    /// absorbs the attributes; in multigraph mode a parallel edge is kept.
    pub fn add_edge(&mut self, u: N, v: N, attrs: Attributes) {
        let ui = self.ensure_node(u);
        let vi = self.ensure_node(v);
        if !self.multi {
            if let Some(edge) = self.graph.find_edge(ui, vi) {
                if let Some(existing) = self.graph.edge_weight_mut(edge) {
                    existing.extend(attrs);
                }
                return;
            }
        }
        self.graph.add_edge(ui, vi, attrs);
    }

    pub fn has_edge(&self, u: &N, v: &N) -> bool {
        match (self.index.get(u), self.index.get(v)) {
            (Some(&ui), Some(&vi)) => self.graph.find_edge(ui, vi).is_some(),
            _ => false,
        }
    }

    pub fn node_attrs(&self, n: &N) -> Option<&Attributes> {
        let idx = self.index.get(n)?;
        self.graph.node_weight(*idx).map(|node| &node.attrs)
    }

    /// Attribute map of one edge between `u` and `v` (any of the parallel
    /// edges in multigraph mode).
    pub fn edge_attrs(&self, u: &N, v: &N) -> Option<&Attributes> {
        let ui = self.index.get(u)?;
        let vi = self.index.get(v)?;
        let edge = self.graph.find_edge(*ui, *vi)?;
        self.graph.edge_weight(edge)
    }

    /// Iterate nodes with their attribute maps.
    pub fn nodes(&self) -> impl Iterator<Item = (&N, &Attributes)> {
        self.graph
            .node_weights()
            .map(|node| (&node.id, &node.attrs))
    }

    /// Iterate edges as `(u, v, attrs)`.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &Attributes)> {
        self.graph.edge_references().map(|edge| {
            let u = &self.graph[edge.source()];
            let v = &self.graph[edge.target()];
            (&u.id, &v.id, edge.weight())
        })
    }

    /// Neighbors of a node (outgoing neighbors for directed graphs).
    pub fn neighbors<'a>(&'a self, n: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.index
            .get(n)
            .into_iter()
            .flat_map(|&idx| self.graph.neighbors(idx))
            .map(|idx| &self.graph[idx].id)
    }

    /// Number of incident edges, ignoring direction.
    pub fn degree(&self, n: &N) -> usize {
        self.index
            .get(n)
            .map_or(0, |&idx| self.graph.neighbors_undirected(idx).count())
    }
}

/// The seam by which snapshot sequences and conversions reach an
/// externally-typed static graph: enough surface to populate a payload and
/// read it back, nothing more.
pub trait GraphPayload<N: NodeId>: Clone {
    fn insert_node(&mut self, n: N, attrs: Attributes);
    fn insert_edge(&mut self, u: N, v: N, attrs: Attributes);
    fn node_list(&self) -> Vec<(N, Attributes)>;
    fn edge_list(&self) -> Vec<(N, N, Attributes)>;
}

impl<N: NodeId, Ty: EdgeType + Clone> GraphPayload<N> for StaticGraph<N, Ty> {
    fn insert_node(&mut self, n: N, attrs: Attributes) {
        self.add_node(n, attrs);
    }

    fn insert_edge(&mut self, u: N, v: N, attrs: Attributes) {
        self.add_edge(u, v, attrs);
    }

    fn node_list(&self) -> Vec<(N, Attributes)> {
        self.nodes().map(|(n, a)| (n.clone(), a.clone())).collect()
    }

    fn edge_list(&self) -> Vec<(N, N, Attributes)> {
        self.edges()
            .map(|(u, v, a)| (u.clone(), v.clone(), a.clone()))
            .collect()
    }
}
