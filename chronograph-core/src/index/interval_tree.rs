//! Augmented AVL interval tree.
//!
//! Nodes are keyed lexicographically by `(low, high)` and each node owns a
//! bucket of edge ids sharing that exact interval (interval graphs permit
//! many edges over the same interval, distinguished by their endpoints).
//! Every node caches `max`, the largest `high` in its subtree, which prunes
//! overlap queries to the subtrees that can still match.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::errors::{GraphError, GraphResult};
use crate::ids::EdgeId;
use crate::time::{Inclusive, TimeKey, TimeValue};

#[derive(Debug, Clone)]
struct TreeNode<T> {
    low: T,
    high: T,
    /// Largest `high` in this subtree.
    max: T,
    height: i32,
    bucket: SmallVec<[EdgeId; 2]>,
    left: Option<Box<TreeNode<T>>>,
    right: Option<Box<TreeNode<T>>>,
}

impl<T: TimeValue> TreeNode<T> {
    fn new(low: T, high: T, id: EdgeId) -> Self {
        let mut bucket = SmallVec::new();
        bucket.push(id);
        TreeNode {
            low,
            high,
            max: high,
            height: 1,
            bucket,
            left: None,
            right: None,
        }
    }

    /// Recompute height and the `max` augmentation from the children.
    fn update(&mut self) {
        let hl = self.left.as_ref().map_or(0, |n| n.height);
        let hr = self.right.as_ref().map_or(0, |n| n.height);
        self.height = 1 + hl.max(hr);

        let mut max = self.high;
        if let Some(left) = &self.left {
            if left.max.after(&max) {
                max = left.max;
            }
        }
        if let Some(right) = &self.right {
            if right.max.after(&max) {
                max = right.max;
            }
        }
        self.max = max;
    }

    /// Whether this node's interval overlaps `[begin, end)`, counting a
    /// degenerate match at the window's exact start.
    fn in_interval(&self, begin: T, end: T) -> bool {
        (self.low.before(&end) && self.high.after(&begin)) || self.low.same(&begin)
    }
}

/// Balanced interval index over `(low, high)` keys with per-key edge
/// buckets.
///
/// Mutation is `&mut self` and queries are `&self`; a query iterator is a
/// fresh traversal that reflects the tree's state at call time.
#[derive(Debug, Clone, Default)]
pub struct IntervalTree<T: TimeValue> {
    root: Option<Box<TreeNode<T>>>,
    len: usize,
    begin: Option<T>,
    end: Option<T>,
}

fn key_cmp<T: TimeValue>(low: T, high: T, other_low: T, other_high: T) -> Ordering {
    low.cmp_time(&other_low).then(high.cmp_time(&other_high))
}

impl<T: TimeValue> IntervalTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        IntervalTree {
            root: None,
            len: 0,
            begin: None,
            end: None,
        }
    }

    /// Number of stored edges (bucket entries, not tree nodes).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest interval begin in the tree.
    pub fn begin(&self) -> Option<T> {
        self.begin
    }

    /// Largest interval end in the tree.
    pub fn end(&self) -> Option<T> {
        self.end
    }

    /// Insert an edge under the `[low, high)` key.
    ///
    /// Fails with [`GraphError::InvalidInterval`] before touching any
    /// state if the interval has zero or negative duration.
    pub fn insert(&mut self, low: T, high: T, id: EdgeId) -> GraphResult<()> {
        if high.cmp_time(&low) != Ordering::Greater {
            return Err(GraphError::InvalidInterval {
                begin: format!("{low:?}"),
                end: format!("{high:?}"),
            });
        }

        if let Some(node) = Self::find_mut(self.root.as_deref_mut(), low, high) {
            node.bucket.push(id);
            self.len += 1;
            return Ok(());
        }

        let new = Box::new(TreeNode::new(low, high, id));
        self.root = Some(Self::insert_node(self.root.take(), new));
        self.len += 1;

        if self.begin.map_or(true, |b| low.before(&b)) {
            self.begin = Some(low);
        }
        if self.end.map_or(true, |e| high.after(&e)) {
            self.end = Some(high);
        }
        Ok(())
    }

    /// Remove one edge from the `[low, high)` bucket; when the bucket
    /// empties, the tree node is deleted and ancestors rebalance.
    ///
    /// Removing an edge that is not present is a quiet no-op.
    pub fn remove(&mut self, low: T, high: T, id: EdgeId) {
        let Some(node) = Self::find_mut(self.root.as_deref_mut(), low, high) else {
            return;
        };
        let Some(pos) = node.bucket.iter().position(|&e| e == id) else {
            return;
        };
        node.bucket.remove(pos);
        self.len -= 1;

        if node.bucket.is_empty() {
            self.root = Self::remove_node(self.root.take(), low, high);
        }
        self.refresh_extrema(low, high);
    }

    /// All edges whose interval overlaps `[begin, end)`, in `(low, high)`
    /// key order. An unbounded side falls back to the tree's own extremum,
    /// so a fully unbounded query walks every edge.
    pub fn query(&self, begin: Option<T>, end: Option<T>) -> OverlapIter<'_, T> {
        let bounds = match (self.begin, self.end) {
            (Some(tree_begin), Some(tree_end)) => {
                Some((begin.unwrap_or(tree_begin), end.unwrap_or(tree_end)))
            }
            _ => None,
        };
        let mut stack = Vec::new();
        if bounds.is_some() {
            if let Some(root) = &self.root {
                stack.push(Visit::Descend(root));
            }
        }
        OverlapIter {
            stack,
            bounds,
            bucket: [].iter(),
        }
    }

    /// All stored edges in key order.
    pub fn iter(&self) -> OverlapIter<'_, T> {
        self.query(None, None)
    }

    /// Sorted distinct interval boundary times (begins and ends) of edges
    /// overlapping the window, filtered by endpoint inclusivity.
    pub fn event_times(&self, begin: Option<T>, end: Option<T>, inclusive: Inclusive) -> Vec<T> {
        self.collect_times(begin, end, inclusive, true, true)
    }

    /// Sorted distinct interval begin times inside the window.
    pub fn begin_times(&self, begin: Option<T>, end: Option<T>, inclusive: Inclusive) -> Vec<T> {
        self.collect_times(begin, end, inclusive, true, false)
    }

    /// Sorted distinct interval end times inside the window.
    pub fn end_times(&self, begin: Option<T>, end: Option<T>, inclusive: Inclusive) -> Vec<T> {
        self.collect_times(begin, end, inclusive, false, true)
    }

    fn collect_times(
        &self,
        begin: Option<T>,
        end: Option<T>,
        inclusive: Inclusive,
        lows: bool,
        highs: bool,
    ) -> Vec<T> {
        let (Some(tree_begin), Some(tree_end)) = (self.begin, self.end) else {
            return Vec::new();
        };
        let begin = begin.unwrap_or(tree_begin);
        let end = end.unwrap_or(tree_end);

        let in_window = |t: T| {
            let left_ok = if inclusive.left() { !t.before(&begin) } else { t.after(&begin) };
            let right_ok = if inclusive.right() { !t.after(&end) } else { t.before(&end) };
            left_ok && right_ok
        };

        let mut times: Vec<TimeKey<T>> = Vec::new();
        let mut keys = Vec::new();
        Self::collect_keys(self.root.as_deref(), begin, end, &mut keys);
        for (low, high) in keys {
            if lows && in_window(low) {
                times.push(TimeKey(low));
            }
            if highs && in_window(high) {
                times.push(TimeKey(high));
            }
        }
        times.sort();
        times.dedup();
        times.into_iter().map(|k| k.0).collect()
    }

    fn collect_keys(node: Option<&TreeNode<T>>, begin: T, end: T, out: &mut Vec<(T, T)>) {
        let Some(node) = node else { return };
        if node.left.as_ref().map_or(false, |l| !l.max.before(&begin)) {
            Self::collect_keys(node.left.as_deref(), begin, end, out);
        }
        if node.in_interval(begin, end) {
            out.push((node.low, node.high));
        }
        if !node.low.after(&end)
            && node.right.as_ref().map_or(false, |r| !r.max.before(&begin))
        {
            Self::collect_keys(node.right.as_deref(), begin, end, out);
        }
    }

    fn find_mut(mut cur: Option<&mut TreeNode<T>>, low: T, high: T) -> Option<&mut TreeNode<T>> {
        while let Some(node) = cur {
            match key_cmp(low, high, node.low, node.high) {
                Ordering::Equal => return Some(node),
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
            }
        }
        None
    }

    fn insert_node(slot: Option<Box<TreeNode<T>>>, new: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
        let mut node = match slot {
            None => return new,
            Some(node) => node,
        };
        // Exact key matches are handled by the bucket fast path, so the new
        // key is strictly smaller or larger here.
        if key_cmp(new.low, new.high, node.low, node.high) == Ordering::Less {
            node.left = Some(Self::insert_node(node.left.take(), new));
        } else {
            node.right = Some(Self::insert_node(node.right.take(), new));
        }
        Self::rebalance(node)
    }

    fn remove_node(slot: Option<Box<TreeNode<T>>>, low: T, high: T) -> Option<Box<TreeNode<T>>> {
        let mut node = slot?;
        match key_cmp(low, high, node.low, node.high) {
            Ordering::Less => node.left = Self::remove_node(node.left.take(), low, high),
            Ordering::Greater => node.right = Self::remove_node(node.right.take(), low, high),
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(left), None) => return Some(left),
                (None, Some(right)) => return Some(right),
                (Some(left), Some(right)) => {
                    // Replace with the in-order successor of the right subtree.
                    let (mut successor, rest) = Self::take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    node = successor;
                }
            },
        }
        Some(Self::rebalance(node))
    }

    fn take_min(mut node: Box<TreeNode<T>>) -> (Box<TreeNode<T>>, Option<Box<TreeNode<T>>>) {
        match node.left.take() {
            None => {
                let right = node.right.take();
                (node, right)
            }
            Some(left) => {
                let (min, rest) = Self::take_min(left);
                node.left = rest;
                (min, Some(Self::rebalance(node)))
            }
        }
    }

    fn balance(node: &TreeNode<T>) -> i32 {
        let hl = node.left.as_ref().map_or(0, |n| n.height);
        let hr = node.right.as_ref().map_or(0, |n| n.height);
        hl - hr
    }

    fn rebalance(mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
        node.update();
        let balance = Self::balance(&node);

        if balance > 1 {
            if let Some(left) = node.left.take() {
                let left = if Self::balance(&left) < 0 {
                    Self::rotate_left(left)
                } else {
                    left
                };
                node.left = Some(left);
            }
            return Self::rotate_right(node);
        }
        if balance < -1 {
            if let Some(right) = node.right.take() {
                let right = if Self::balance(&right) > 0 {
                    Self::rotate_right(right)
                } else {
                    right
                };
                node.right = Some(right);
            }
            return Self::rotate_left(node);
        }
        node
    }

    fn rotate_left(mut x: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
        match x.right.take() {
            None => {
                x.update();
                x
            }
            Some(mut y) => {
                x.right = y.left.take();
                x.update();
                y.left = Some(x);
                y.update();
                y
            }
        }
    }

    fn rotate_right(mut x: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
        match x.left.take() {
            None => {
                x.update();
                x
            }
            Some(mut y) => {
                x.left = y.right.take();
                x.update();
                y.right = Some(x);
                y.update();
                y
            }
        }
    }

    fn refresh_extrema(&mut self, removed_low: T, removed_high: T) {
        match &self.root {
            None => {
                self.begin = None;
                self.end = None;
            }
            Some(root) => {
                if self.begin.map_or(false, |b| b.same(&removed_low)) {
                    let mut node = root;
                    while let Some(left) = &node.left {
                        node = left;
                    }
                    self.begin = Some(node.low);
                }
                if self.end.map_or(false, |e| e.same(&removed_high)) {
                    self.end = Some(root.max);
                }
            }
        }
    }
}

enum Visit<'a, T> {
    Descend(&'a TreeNode<T>),
    Emit(&'a TreeNode<T>),
}

/// Pruned in-order traversal yielding the ids of all edges overlapping the
/// query window.
pub struct OverlapIter<'a, T: TimeValue> {
    stack: Vec<Visit<'a, T>>,
    bounds: Option<(T, T)>,
    bucket: std::slice::Iter<'a, EdgeId>,
}

impl<'a, T: TimeValue> Iterator for OverlapIter<'a, T> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        loop {
            if let Some(id) = self.bucket.next() {
                return Some(*id);
            }
            let (begin, end) = self.bounds?;
            match self.stack.pop()? {
                Visit::Descend(node) => {
                    // Reverse push order gives an in-order walk.
                    if !node.low.after(&end) {
                        if let Some(right) = &node.right {
                            if !right.max.before(&begin) {
                                self.stack.push(Visit::Descend(right));
                            }
                        }
                    }
                    self.stack.push(Visit::Emit(node));
                    if let Some(left) = &node.left {
                        if !left.max.before(&begin) {
                            self.stack.push(Visit::Descend(left));
                        }
                    }
                }
                Visit::Emit(node) => {
                    if node.in_interval(begin, end) {
                        self.bucket = node.bucket.iter();
                    }
                }
            }
        }
    }
}
