//! Ordered timestamp index for impulse edges.
//!
//! An ordered map from timestamp to the set of edge ids occurring at that
//! timestamp, with range scans whose endpoints are independently inclusive
//! or exclusive. A missing bound is unbounded on that side, deliberately
//! not clamped to the dataset's observed extent, so "unbounded" stays
//! distinguishable from "bounded by the data" in composed queries.

use std::collections::btree_map;
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::ids::EdgeId;
use crate::time::{Inclusive, TimeKey, TimeValue};

/// Timestamp → edge-id bucket map.
#[derive(Debug, Clone, Default)]
pub struct TimestampIndex<T: TimeValue> {
    map: BTreeMap<TimeKey<T>, BTreeSet<EdgeId>>,
    len: usize,
}

impl<T: TimeValue> TimestampIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        TimestampIndex {
            map: BTreeMap::new(),
            len: 0,
        }
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Earliest timestamp in the index.
    pub fn first(&self) -> Option<T> {
        self.map.keys().next().map(|k| k.0)
    }

    /// Latest timestamp in the index.
    pub fn last(&self) -> Option<T> {
        self.map.keys().next_back().map(|k| k.0)
    }

    /// Get-or-create the bucket at `t` and add the edge.
    pub fn insert(&mut self, t: T, id: EdgeId) {
        if self.map.entry(TimeKey(t)).or_default().insert(id) {
            self.len += 1;
        }
    }

    /// Discard an edge from the bucket at `t`, dropping the key when the
    /// bucket empties. Quiet if the edge is not present.
    pub fn remove(&mut self, t: T, id: EdgeId) {
        let Some(bucket) = self.map.get_mut(&TimeKey(t)) else {
            return;
        };
        if bucket.remove(&id) {
            self.len -= 1;
        }
        if bucket.is_empty() {
            self.map.remove(&TimeKey(t));
        }
    }

    /// Distinct timestamps in ascending order.
    pub fn times(&self) -> impl Iterator<Item = T> + '_ {
        self.map.keys().map(|k| k.0)
    }

    /// Edges at exactly `t`, in ascending id order.
    pub fn point(&self, t: T) -> TimestampRange<'_, T> {
        TimestampRange {
            outer: None,
            current: self.map.get(&TimeKey(t)).map(|bucket| (t, bucket.iter())),
        }
    }

    /// Edges in the timestamp range, ascending by `(timestamp, id)`.
    ///
    /// The inclusivity table: `Both` → `begin <= t <= end`, `Left` →
    /// `begin <= t < end`, `Right` → `begin < t <= end`, `Neither` →
    /// `begin < t < end`. `begin == end` with `Both` degenerates to an
    /// exact point lookup; with any exclusive side it matches nothing.
    pub fn range(
        &self,
        begin: Option<T>,
        end: Option<T>,
        inclusive: Inclusive,
    ) -> TimestampRange<'_, T> {
        if let (Some(b), Some(e)) = (begin, end) {
            if b.after(&e) {
                return TimestampRange {
                    outer: None,
                    current: None,
                };
            }
            if b.same(&e) {
                return if inclusive == Inclusive::Both {
                    self.point(b)
                } else {
                    TimestampRange {
                        outer: None,
                        current: None,
                    }
                };
            }
        }

        let lower = match begin {
            None => Bound::Unbounded,
            Some(b) if inclusive.left() => Bound::Included(TimeKey(b)),
            Some(b) => Bound::Excluded(TimeKey(b)),
        };
        let upper = match end {
            None => Bound::Unbounded,
            Some(e) if inclusive.right() => Bound::Included(TimeKey(e)),
            Some(e) => Bound::Excluded(TimeKey(e)),
        };

        TimestampRange {
            outer: Some(self.map.range((lower, upper))),
            current: None,
        }
    }
}

/// Ascending `(timestamp, edge id)` scan over an index range.
///
/// Each call to [`TimestampIndex::range`] starts a fresh traversal of the
/// index's current state; there is no shared cursor.
pub struct TimestampRange<'a, T: TimeValue> {
    outer: Option<btree_map::Range<'a, TimeKey<T>, BTreeSet<EdgeId>>>,
    current: Option<(T, btree_set::Iter<'a, EdgeId>)>,
}

impl<'a, T: TimeValue> Iterator for TimestampRange<'a, T> {
    type Item = (EdgeId, T);

    fn next(&mut self) -> Option<(EdgeId, T)> {
        loop {
            if let Some((t, bucket)) = &mut self.current {
                if let Some(id) = bucket.next() {
                    return Some((*id, *t));
                }
            }
            let (key, bucket) = self.outer.as_mut()?.next()?;
            self.current = Some((key.0, bucket.iter()));
        }
    }
}
