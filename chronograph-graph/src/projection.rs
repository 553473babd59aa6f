//! Options for projecting temporal graphs into static snapshots.

use serde::{Deserialize, Serialize};

use chronograph_core::{GraphError, GraphResult, TimeArith};

/// What a projected static graph carries.
///
/// `edge_time_data` stamps each projected edge with its time data
/// (`"timestamp"` for impulse edges, `"begin"`/`"end"` for interval
/// edges), overwriting same-named attributes when `edge_data` is also set.
/// `node_data` copies node attribute maps for exactly the nodes that ended
/// up in the projected edge set; isolated nodes never appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphOptions {
    pub multigraph: bool,
    pub edge_data: bool,
    pub edge_time_data: bool,
    pub node_data: bool,
}

/// How to partition a graph's span into snapshots: by window count or by
/// window length. Exactly one applies; the alternative is the enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SnapshotSpec<T> {
    Count(usize),
    Length(T),
}

/// Resolve a spec to a window count over `[begin, end]`, rejecting counts
/// below 2 and nonpositive lengths.
pub(crate) fn resolve_parts<T: TimeArith>(
    spec: SnapshotSpec<T>,
    begin: T,
    end: T,
) -> GraphResult<usize> {
    let parts = match spec {
        SnapshotSpec::Count(count) => count,
        SnapshotSpec::Length(length) => T::parts_for_length(begin, end, length)
            .ok_or_else(|| GraphError::InvalidSnapshotLength {
                length: format!("{length:?}"),
            })?,
    };
    if parts < 2 {
        return Err(GraphError::InvalidSnapshotCount { count: parts });
    }
    Ok(parts)
}
