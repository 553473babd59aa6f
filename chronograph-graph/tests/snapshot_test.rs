//! Integration tests for snapshot graphs.

use serde_json::json;

use chronograph_core::Attributes;
use chronograph_graph::{
    SnapshotGraph, SnapshotRange, SnapshotSelector, StaticUnGraph, Window,
};

fn graph_of(edges: &[(i32, i32)]) -> StaticUnGraph<i32> {
    let mut g = StaticUnGraph::new();
    for (u, v) in edges {
        g.add_edge(*u, *v, Attributes::new());
    }
    g
}

#[test]
fn split_on_mutation_spec_scenario() {
    // ranges [(0,3) → g1, (3,10) → g2]
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    sg.insert(graph_of(&[(1, 2)]), SnapshotRange::interval(0, 3).unwrap());
    sg.insert(graph_of(&[(2, 3)]), SnapshotRange::interval(3, 10).unwrap());

    sg.add_nodes_from(
        &[(50, Attributes::new()), (51, Attributes::new())],
        &SnapshotSelector::Window(Window::between(1, 3).unwrap()),
        true,
    )
    .unwrap();

    let ranges: Vec<(i64, i64)> = sg.ranges().iter().map(|r| (r.start(), r.end())).collect();
    assert_eq!(ranges, vec![(0, 1), (1, 3), (3, 10)]);

    let graphs = sg.get(&SnapshotSelector::All);
    // (0,1): unmodified copy of g1
    assert!(graphs[0].has_edge(&1, &2) && !graphs[0].contains_node(&50));
    // (1,3): mutated copy
    assert!(graphs[1].has_edge(&1, &2) && graphs[1].contains_node(&50) && graphs[1].contains_node(&51));
    // (3,10): untouched
    assert!(graphs[2].has_edge(&2, &3) && !graphs[2].contains_node(&50));
}

#[test]
fn overlapping_inserts_are_permitted() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    sg.insert(graph_of(&[(1, 2)]), SnapshotRange::interval(0, 10).unwrap());
    sg.insert(graph_of(&[(2, 3)]), SnapshotRange::interval(5, 15).unwrap());

    assert_eq!(sg.len(), 2);
    let hits = sg.get(&SnapshotSelector::Window(Window::between(7, 8).unwrap()));
    assert_eq!(hits.len(), 2);
}

#[test]
fn interval_retrieval_includes_straddling_range() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    for (i, bounds) in [(0i64, 4i64), (4, 8), (8, 12), (12, 16)].iter().enumerate() {
        sg.insert(
            graph_of(&[(i as i32, i as i32 + 1)]),
            SnapshotRange::interval(bounds.0, bounds.1).unwrap(),
        );
    }

    // the query start (5) falls strictly inside [4, 8)
    let hits = sg.get(&SnapshotSelector::Window(Window::between(5, 9).unwrap()));
    assert_eq!(hits.len(), 2);
    assert!(hits[0].has_edge(&1, &2));
    assert!(hits[1].has_edge(&2, &3));
}

#[test]
fn statistics_as_the_algorithm_seam() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    sg.insert(
        graph_of(&[(1, 2), (2, 3), (3, 1)]),
        SnapshotRange::interval(0, 5).unwrap(),
    );
    sg.insert(graph_of(&[(1, 2)]), SnapshotRange::interval(5, 10).unwrap());

    // an externally supplied statistic: max degree per snapshot
    let max_degree = sg.compute_network_statistic(
        |g| {
            g.nodes()
                .map(|(n, _)| g.degree(n))
                .max()
                .unwrap_or(0)
        },
        &SnapshotSelector::All,
    );
    assert_eq!(max_degree, vec![2, 1]);

    let by_index = sg.compute_network_statistic(
        |g| g.edge_count(),
        &SnapshotSelector::Indices(vec![1]),
    );
    assert_eq!(by_index, vec![1]);
}

#[test]
fn add_snapshot_builds_from_edge_list() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    sg.add_snapshot([(1, 2), (1, 3)], SnapshotRange::interval(0, 5).unwrap());
    sg.add_snapshot([(1, 4), (1, 3)], SnapshotRange::interval(5, 10).unwrap());

    assert_eq!(sg.len(), 2);
    assert_eq!(sg.number_of_nodes(&SnapshotSelector::All), vec![3, 3]);
    assert_eq!(sg.has_node(&4, &SnapshotSelector::All), vec![false, true]);
}

#[test]
fn graph_attributes_travel_with_the_sequence() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> =
        SnapshotGraph::with_attrs(Attributes::from([("name".to_string(), json!("seq"))]));
    assert_eq!(sg.attrs().get("name"), Some(&json!("seq")));
    sg.attrs_mut().insert("rev".to_string(), json!(2));
    assert_eq!(sg.attrs().len(), 2);
}

#[test]
fn edges_added_by_index_do_not_split() {
    let mut sg: SnapshotGraph<i64, StaticUnGraph<i32>> = SnapshotGraph::new();
    sg.insert(graph_of(&[(1, 2)]), SnapshotRange::interval(0, 3).unwrap());
    sg.insert(graph_of(&[(2, 3)]), SnapshotRange::interval(3, 10).unwrap());

    sg.add_edges_from(
        &[(8, 9, Attributes::new())],
        &SnapshotSelector::Indices(vec![0]),
        true, // split flag is irrelevant for ordinal selection
    )
    .unwrap();

    assert_eq!(sg.len(), 2);
    let graphs = sg.get(&SnapshotSelector::All);
    assert!(graphs[0].has_edge(&8, &9));
    assert!(!graphs[1].has_edge(&8, &9));
}
