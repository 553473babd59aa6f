//! The temporal motif counting algorithm.
//!
//! For every connected node subset of the motif's size, the counter
//! gathers the subset's impulse edges (true multiplicity and timestamps,
//! both directions, self-loops included), slides a `delta`-wide window
//! over them with two pointers, and maintains counts of every edge
//! sequence formed inside the window, keyed by the sequence's flattened
//! node tuple. Sequences of the motif's length are then matched under a
//! consistent one-to-one position-to-node relabeling.
//!
//! Edges sharing a timestamp are processed as an unordered batch. Their
//! relative order is treated as unconstrained, by policy: a batch never
//! chains within itself.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use chronograph_core::{FxHashMap, FxHashSet, NodeId, TimeArith};
use chronograph_graph::{ImpulseDiGraph, Inclusive, Window};

use crate::motif::Motif;

/// A flattened node sequence: the count-table key. Bounded by twice the
/// motif length.
type SeqKey<N> = SmallVec<[N; 8]>;

/// The result of one counting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifCounts<P: NodeId, N: NodeId> {
    total: u64,
    sequences: BTreeMap<Vec<N>, u64>,
    participation: BTreeMap<P, BTreeMap<N, u64>>,
}

impl<P: NodeId, N: NodeId> MotifCounts<P, N> {
    /// Sum of all matched sequence counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count per matched node tuple (the sequence's flattened actual
    /// nodes).
    pub fn sequences(&self) -> &BTreeMap<Vec<N>, u64> {
        &self.sequences
    }

    /// How many matches each actual node participates in at each motif
    /// position. Duplicate occurrences of a position within one sequence
    /// are collapsed before tallying.
    pub fn participation(&self) -> &BTreeMap<P, BTreeMap<N, u64>> {
        &self.participation
    }
}

/// Count occurrences of `motif` in the graph's edge stream where all
/// edges of a match fall within a window of width `delta`.
pub fn count_temporal_motifs<N, T, P>(
    graph: &ImpulseDiGraph<N, T>,
    motif: &Motif<P>,
    delta: T,
) -> MotifCounts<P, N>
where
    N: NodeId,
    T: TimeArith,
    P: NodeId,
{
    let seq_len = motif.len();
    let flat = motif.flattened();
    let k = motif.node_count();

    // Loop-collapsed undirected support graph over the edge endpoints.
    let mut support: FxHashMap<N, BTreeSet<N>> = FxHashMap::default();
    let mut nodes: BTreeSet<N> = BTreeSet::new();
    for edge in graph.all_edges() {
        nodes.insert(edge.u.clone());
        nodes.insert(edge.v.clone());
        if edge.u != edge.v {
            support
                .entry(edge.u.clone())
                .or_default()
                .insert(edge.v.clone());
            support
                .entry(edge.v.clone())
                .or_default()
                .insert(edge.u.clone());
        }
    }
    tracing::debug!(
        nodes = nodes.len(),
        edges = graph.number_of_edges(),
        k,
        "counting temporal motifs"
    );

    let mut sequences: BTreeMap<Vec<N>, u64> = BTreeMap::new();
    enumerate_subgraphs(&nodes, &support, k, &mut |subset: &[N]| {
        let mut counts: FxHashMap<SeqKey<N>, i64> = FxHashMap::default();
        let events = gather_events(graph, subset);

        let (mut start, mut end) = (0usize, 0usize);
        while end < events.len() {
            while (events[start].2 + delta).before(&events[end].2) {
                let batch = drain_batch(&events, &mut start);
                decrement_counts(&batch, seq_len, &mut counts);
            }
            let batch = drain_batch(&events, &mut end);
            increment_counts(&batch, seq_len, &mut counts);
        }

        // Extract sequences of the motif's length that match under a
        // consistent one-to-one relabeling.
        for (key, &count) in &counts {
            if key.len() == 2 * seq_len && count > 0 && is_isomorphic(&flat, key) {
                sequences.insert(key.to_vec(), count as u64);
            }
        }
    });

    let total = sequences.values().sum();
    let participation = tally_participation(&flat, &sequences);
    MotifCounts {
        total,
        sequences,
        participation,
    }
}

/// Enumerate every connected `k`-node subset of the support graph exactly
/// once: seed from each node and extend only through neighbors ordered
/// after the seed, so each subset is discovered from its smallest member.
fn enumerate_subgraphs<N: NodeId>(
    nodes: &BTreeSet<N>,
    support: &FxHashMap<N, BTreeSet<N>>,
    k: usize,
    visit: &mut impl FnMut(&[N]),
) {
    if k == 0 {
        return;
    }
    for seed in nodes {
        let extension: BTreeSet<N> = support
            .get(seed)
            .into_iter()
            .flatten()
            .filter(|n| *n > seed)
            .cloned()
            .collect();
        let mut subset = vec![seed.clone()];
        extend_subgraph(&mut subset, extension, seed, support, k, visit);
    }
}

fn extend_subgraph<N: NodeId>(
    subset: &mut Vec<N>,
    mut extension: BTreeSet<N>,
    seed: &N,
    support: &FxHashMap<N, BTreeSet<N>>,
    k: usize,
    visit: &mut impl FnMut(&[N]),
) {
    if subset.len() == k {
        visit(subset);
        return;
    }
    while let Some(next) = extension.pop_first() {
        let mut grown = extension.clone();
        for n in support.get(&next).into_iter().flatten() {
            if n > seed && !subset.contains(n) {
                grown.insert(n.clone());
            }
        }
        subset.push(next);
        extend_subgraph(subset, grown, seed, support, k, visit);
        subset.pop();
    }
}

/// All impulse edges among the subset's nodes, sorted by timestamp:
/// every ordered pair in both directions plus self-loops, which are
/// visited once per node and so never double-counted.
fn gather_events<N: NodeId, T: TimeArith>(
    graph: &ImpulseDiGraph<N, T>,
    subset: &[N],
) -> Vec<(N, N, T)> {
    let mut events: Vec<(N, N, T)> = Vec::new();
    let mut push_all = |u: &N, v: &N| {
        for edge in graph.edges(Some(u), Some(v), Window::all(), Inclusive::Both) {
            events.push((edge.u, edge.v, edge.t));
        }
    };
    for i in 0..subset.len() {
        for j in (i + 1)..subset.len() {
            push_all(&subset[i], &subset[j]);
            push_all(&subset[j], &subset[i]);
        }
    }
    for n in subset {
        push_all(n, n);
    }
    events.sort_by(|a, b| a.2.cmp_time(&b.2));
    events
}

/// Pop the run of events sharing `events[*cursor]`'s timestamp.
fn drain_batch<N: NodeId, T: TimeArith>(
    events: &[(N, N, T)],
    cursor: &mut usize,
) -> Vec<(N, N)> {
    let t = events[*cursor].2;
    let mut batch = Vec::new();
    while *cursor < events.len() && events[*cursor].2.same(&t) {
        batch.push((events[*cursor].0.clone(), events[*cursor].1.clone()));
        *cursor += 1;
    }
    batch
}

/// Extend every sequence existing before the batch with each batch edge,
/// then open a fresh length-1 sequence per batch edge. The pre-batch
/// snapshot is what keeps a batch from chaining within itself.
fn increment_counts<N: NodeId>(
    batch: &[(N, N)],
    seq_len: usize,
    counts: &mut FxHashMap<SeqKey<N>, i64>,
) {
    let snapshot: Vec<(SeqKey<N>, i64)> = counts
        .iter()
        .filter(|(key, _)| key.len() / 2 < seq_len)
        .map(|(key, &count)| (key.clone(), count))
        .collect();
    for (prefix, count) in snapshot {
        for (u, v) in batch {
            let mut key = prefix.clone();
            key.push(u.clone());
            key.push(v.clone());
            *counts.entry(key).or_insert(0) += count;
        }
    }
    for (u, v) in batch {
        let mut key = SeqKey::new();
        key.push(u.clone());
        key.push(v.clone());
        *counts.entry(key).or_insert(0) += 1;
    }
}

/// Remove the oldest batch's contributions: close its length-1
/// sequences, then shrink every longer sequence that starts with a batch
/// edge, shortest suffixes first so their corrected counts feed the
/// longer ones.
fn decrement_counts<N: NodeId>(
    batch: &[(N, N)],
    seq_len: usize,
    counts: &mut FxHashMap<SeqKey<N>, i64>,
) {
    for (u, v) in batch {
        let mut key = SeqKey::new();
        key.push(u.clone());
        key.push(v.clone());
        *counts.entry(key).or_insert(0) -= 1;
    }

    let mut suffixes: Vec<SeqKey<N>> = counts
        .keys()
        .filter(|key| key.len() / 2 + 1 < seq_len)
        .cloned()
        .collect();
    suffixes.sort_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)));

    for suffix in suffixes {
        let Some(&suffix_count) = counts.get(&suffix) else {
            continue;
        };
        for (u, v) in batch {
            let mut key = SeqKey::new();
            key.push(u.clone());
            key.push(v.clone());
            key.extend(suffix.iter().cloned());
            if let Some(count) = counts.get_mut(&key) {
                if *count != 0 {
                    *count -= suffix_count;
                }
            }
        }
    }
}

/// Whether a matched node sequence realizes the motif's positions under a
/// single consistent bijection: no position maps to two nodes, no node is
/// claimed by two positions.
fn is_isomorphic<P: NodeId, N: NodeId>(flat: &[&P], key: &[N]) -> bool {
    let mut bound: FxHashMap<&P, &N> = FxHashMap::default();
    let mut used: FxHashSet<&N> = FxHashSet::default();
    for (position, node) in flat.iter().zip(key.iter()) {
        match bound.get(position) {
            Some(&existing) => {
                if existing != node {
                    return false;
                }
            }
            None => {
                if !used.insert(node) {
                    return false;
                }
                bound.insert(position, node);
            }
        }
    }
    true
}

fn tally_participation<P: NodeId, N: NodeId>(
    flat: &[&P],
    sequences: &BTreeMap<Vec<N>, u64>,
) -> BTreeMap<P, BTreeMap<N, u64>> {
    let mut tally: BTreeMap<P, BTreeMap<N, u64>> = BTreeMap::new();
    for (key, &count) in sequences {
        let bindings: BTreeSet<(&P, &N)> = flat.iter().copied().zip(key.iter()).collect();
        for (position, node) in bindings {
            *tally
                .entry(position.clone())
                .or_default()
                .entry(node.clone())
                .or_default() += count;
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan_graph() -> ImpulseDiGraph<i32, i64> {
        let mut g = ImpulseDiGraph::new();
        g.add_edge(1, 2, 30);
        g.add_edge(3, 2, 30);
        g.add_edge(4, 2, 30);
        g.add_edge(2, 5, 32);
        g.add_edge(2, 5, 33);
        g
    }

    #[test]
    fn fan_in_fan_out_scenario() {
        let g = fan_graph();
        let motif = Motif::new(vec![(1, 2), (2, 3), (2, 3)]).unwrap();
        let counts = count_temporal_motifs(&g, &motif, 3);

        assert_eq!(counts.total(), 3);
        let expected: BTreeMap<Vec<i32>, u64> = [
            (vec![1, 2, 2, 5, 2, 5], 1),
            (vec![3, 2, 2, 5, 2, 5], 1),
            (vec![4, 2, 2, 5, 2, 5], 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.sequences(), &expected);
    }

    #[test]
    fn participation_tally_collapses_duplicate_positions() {
        let g = fan_graph();
        let motif = Motif::new(vec![(1, 2), (2, 3), (2, 3)]).unwrap();
        let counts = count_temporal_motifs(&g, &motif, 3);

        let tally = counts.participation();
        assert_eq!(tally[&2].get(&2), Some(&3));
        assert_eq!(tally[&3].get(&5), Some(&3));
        assert_eq!(tally[&1].len(), 3);
        assert_eq!(tally[&1].get(&1), Some(&1));
    }

    #[test]
    fn window_excludes_stale_prefixes() {
        let g = fan_graph();
        let motif = Motif::new(vec![(1, 2), (2, 3), (2, 3)]).unwrap();
        // delta 2 drops the t=30 edges before the t=33 edge arrives
        let counts = count_temporal_motifs(&g, &motif, 2);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn same_timestamp_edges_do_not_chain() {
        let mut g = ImpulseDiGraph::new();
        g.add_edge(1, 2, 10);
        g.add_edge(2, 3, 10);
        let motif = Motif::new(vec![(1, 2), (2, 3)]).unwrap();
        assert_eq!(count_temporal_motifs(&g, &motif, 5).total(), 0);

        // ordered timestamps do chain
        let mut h = ImpulseDiGraph::new();
        h.add_edge(1, 2, 10);
        h.add_edge(2, 3, 11);
        assert_eq!(count_temporal_motifs(&h, &motif, 5).total(), 1);
    }

    #[test]
    fn relabeling_must_be_one_to_one() {
        let mut g = ImpulseDiGraph::new();
        g.add_edge(1, 2, 10);
        g.add_edge(2, 1, 11);
        g.add_edge(2, 3, 12);

        // (1,2,2,1) reuses node 1 for position 3 and is rejected; only
        // (1,2,2,3) binds three distinct nodes
        let chain = Motif::new(vec![(1, 2), (2, 3)]).unwrap();
        let counts = count_temporal_motifs(&g, &chain, 5);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.sequences().get(&vec![1, 2, 2, 3]), Some(&1));

        let cycle = Motif::new(vec![(1, 2), (2, 1)]).unwrap();
        assert_eq!(count_temporal_motifs(&g, &cycle, 5).total(), 1);
    }

    #[test]
    fn self_loops_are_gathered_once() {
        let mut g = ImpulseDiGraph::new();
        g.add_edge(1, 1, 10);
        g.add_edge(1, 1, 12);
        let motif = Motif::new(vec![(1, 1), (1, 1)]).unwrap();
        assert_eq!(count_temporal_motifs(&g, &motif, 5).total(), 1);
    }

    #[test]
    fn multiplicity_is_respected() {
        let mut g = ImpulseDiGraph::new();
        g.add_edge(1, 2, 10);
        g.add_edge(1, 2, 10); // a distinct simultaneous event
        g.add_edge(2, 3, 11);
        let motif = Motif::new(vec![(1, 2), (2, 3)]).unwrap();
        assert_eq!(count_temporal_motifs(&g, &motif, 5).total(), 2);
    }
}
