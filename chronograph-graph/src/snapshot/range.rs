//! Snapshot keys: half-open ranges and degenerate points.

use serde::{Deserialize, Serialize};

use chronograph_core::{GraphError, GraphResult, TimeValue};

/// The time key of one snapshot: a half-open `[start, end)` range, or the
/// degenerate point `(t, t)` for impulse-style snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRange<T> {
    start: T,
    end: T,
}

impl<T: TimeValue> SnapshotRange<T> {
    /// A half-open `[start, end)` range key.
    pub fn interval(start: T, end: T) -> GraphResult<Self> {
        if start.after(&end) {
            return Err(GraphError::InvalidInterval {
                begin: format!("{start:?}"),
                end: format!("{end:?}"),
            });
        }
        Ok(SnapshotRange { start, end })
    }

    /// A degenerate point key `(t, t)`.
    pub fn point(t: T) -> Self {
        SnapshotRange { start: t, end: t }
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    pub fn is_point(&self) -> bool {
        self.start.same(&self.end)
    }
}
