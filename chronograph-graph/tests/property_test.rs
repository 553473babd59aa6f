//! Property tests for the temporal graph variants.

use proptest::prelude::*;

use chronograph_graph::{ImpulseGraph, Inclusive, IntervalGraph, Window};

proptest! {
    // Every added interval edge key comes back from an unfiltered query,
    // exactly once.
    #[test]
    fn prop_interval_round_trip(
        edges in prop::collection::vec((0u8..8, 0u8..8, 0i64..40, 1i64..10), 1..60)
    ) {
        let mut g: IntervalGraph<u8, i64> = IntervalGraph::new();
        let mut expected: Vec<(u8, u8, i64, i64)> = Vec::new();
        for (u, v, begin, dur) in edges {
            let end = begin + dur;
            g.add_edge(u, v, begin, end).unwrap();
            // the 4-tuple key dedupes; endpoint order is preserved
            if !expected.contains(&(u, v, begin, end)) && !expected.contains(&(v, u, begin, end)) {
                expected.push((u, v, begin, end));
            }
        }

        let mut got: Vec<(u8, u8, i64, i64)> = g
            .all_edges()
            .into_iter()
            .map(|e| (e.u, e.v, e.begin, e.end))
            .collect();
        got.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(g.number_of_edges(), g.all_edges().len());
    }

    // Windowed interval queries agree with a brute-force scan under the
    // overlaps-or-equals-begin predicate.
    #[test]
    fn prop_overlap_matches_brute_force(
        edges in prop::collection::vec((0u8..6, 0u8..6, 0i64..30, 1i64..8), 1..40),
        begin in 0i64..35,
        dur in 0i64..12,
    ) {
        let mut g: IntervalGraph<u8, i64> = IntervalGraph::new();
        for (u, v, b, d) in &edges {
            g.add_edge(*u, *v, *b, b + d).unwrap();
        }
        let end = begin + dur;

        let mut got: Vec<(i64, i64)> = g
            .edges(None, None, Window::between(begin, end).unwrap())
            .into_iter()
            .map(|e| (e.begin, e.end))
            .collect();
        got.sort_unstable();

        let mut expected: Vec<(i64, i64)> = g
            .all_edges()
            .into_iter()
            .filter(|e| (e.begin < end && e.end > begin) || e.begin == begin)
            .map(|e| (e.begin, e.end))
            .collect();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }

    // Without self-loops, degrees sum to twice the edge count in any
    // window.
    #[test]
    fn prop_degree_sum_is_twice_edge_count(
        edges in prop::collection::vec((0u8..9, 0u8..9, 0i64..25), 1..60),
        begin in 0i64..30,
        dur in 1i64..30,
    ) {
        let mut g: ImpulseGraph<u8, i64> = ImpulseGraph::new();
        for (u, v, t) in edges {
            if u != v {
                g.add_edge(u, v, t);
            }
        }
        let window = Window::between(begin, begin + dur).unwrap();

        for (window, inclusive) in [
            (Window::all(), Inclusive::Both),
            (window, Inclusive::Left),
        ] {
            let degree_sum: usize = g
                .nodes(window, inclusive)
                .iter()
                .map(|n| g.degree(n, window, inclusive))
                .sum();
            let edge_count = g.edges(None, None, window, inclusive).len();
            prop_assert_eq!(degree_sum, 2 * edge_count);
        }
    }

    // Removing twice is the same as removing once, and removals never
    // touch other edges.
    #[test]
    fn prop_remove_is_idempotent(
        edges in prop::collection::vec((0u8..5, 0u8..5, 0i64..20), 1..30),
        victim in (0u8..5, 0u8..5),
    ) {
        let mut g: ImpulseGraph<u8, i64> = ImpulseGraph::new();
        for (u, v, t) in &edges {
            g.add_edge(*u, *v, *t);
        }

        g.remove_edge(&victim.0, &victim.1, Window::all(), Inclusive::Both);
        let after_once = g.number_of_edges();
        let survivors: Vec<_> = g.all_edges();

        g.remove_edge(&victim.0, &victim.1, Window::all(), Inclusive::Both);
        prop_assert_eq!(g.number_of_edges(), after_once);
        prop_assert_eq!(g.all_edges(), survivors);
        prop_assert!(!g.has_edge(&victim.0, &victim.1, Window::all(), Inclusive::Both));
    }

    // A rejected interval insert leaves node count, edge count, and span
    // untouched.
    #[test]
    fn prop_rejected_insert_has_no_side_effects(
        good in prop::collection::vec((0u8..6, 0u8..6, 0i64..20, 1i64..6), 0..20),
        bad in (0u8..6, 0u8..6, 0i64..20, 0i64..6),
    ) {
        let mut g: IntervalGraph<u8, i64> = IntervalGraph::new();
        for (u, v, b, d) in good {
            g.add_edge(u, v, b, b + d).unwrap();
        }

        let nodes_before = g.nodes(Window::all());
        let edges_before = g.number_of_edges();
        let span_before = g.interval();

        // end <= begin: always invalid
        let result = g.add_edge(bad.0, bad.1, bad.2, bad.2 - bad.3);
        prop_assert!(result.is_err());
        prop_assert_eq!(g.nodes(Window::all()), nodes_before);
        prop_assert_eq!(g.number_of_edges(), edges_before);
        prop_assert_eq!(g.interval(), span_before);
    }
}
