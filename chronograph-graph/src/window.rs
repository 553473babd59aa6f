//! Validated temporal query windows.

use serde::{Deserialize, Serialize};

use chronograph_core::{GraphError, GraphResult, Inclusive, TimeValue};

/// A query window with independently optional bounds.
///
/// A missing bound is unbounded on that side, not clamped to the graph's
/// observed extent. Bounded windows are validated at construction
/// (`begin <= end`), so query methods taking a `Window` never fail on
/// malformed intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window<T> {
    begin: Option<T>,
    end: Option<T>,
}

impl<T: TimeValue> Window<T> {
    /// The fully unbounded window.
    pub fn all() -> Self {
        Window { begin: None, end: None }
    }

    /// Everything at or after `begin`.
    pub fn since(begin: T) -> Self {
        Window { begin: Some(begin), end: None }
    }

    /// Everything before (or at, depending on inclusivity) `end`.
    pub fn until(end: T) -> Self {
        Window { begin: None, end: Some(end) }
    }

    /// A bounded window. Fails with [`GraphError::InvalidInterval`] when
    /// `begin > end`.
    pub fn between(begin: T, end: T) -> GraphResult<Self> {
        if begin.after(&end) {
            return Err(GraphError::InvalidInterval {
                begin: format!("{begin:?}"),
                end: format!("{end:?}"),
            });
        }
        Ok(Window {
            begin: Some(begin),
            end: Some(end),
        })
    }

    /// The degenerate window `[t, t]`.
    pub fn point(t: T) -> Self {
        Window {
            begin: Some(t),
            end: Some(t),
        }
    }

    pub fn begin(&self) -> Option<T> {
        self.begin
    }

    pub fn end(&self) -> Option<T> {
        self.end
    }

    /// Whether both sides are unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.begin.is_none() && self.end.is_none()
    }

    /// Impulse containment: whether a timestamp falls inside the window
    /// under the given endpoint inclusivity. Unbounded sides always pass.
    pub(crate) fn contains_time(&self, t: T, inclusive: Inclusive) -> bool {
        let left_ok = match self.begin {
            None => true,
            Some(begin) if inclusive.left() => !t.before(&begin),
            Some(begin) => t.after(&begin),
        };
        let right_ok = match self.end {
            None => true,
            Some(end) if inclusive.right() => !t.after(&end),
            Some(end) => t.before(&end),
        };
        left_ok && right_ok
    }

    /// Interval overlap: whether `[low, high)` overlaps the window,
    /// counting a degenerate match at the window's exact start.
    pub(crate) fn overlaps_interval(&self, low: T, high: T) -> bool {
        match (self.begin, self.end) {
            (None, None) => true,
            (None, Some(end)) => low.before(&end),
            (Some(begin), None) => high.after(&begin),
            (Some(begin), Some(end)) => {
                (low.before(&end) && high.after(&begin)) || low.same(&begin)
            }
        }
    }
}
