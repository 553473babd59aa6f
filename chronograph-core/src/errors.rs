//! Error taxonomy shared across the chronograph workspace.

/// Top-level error type for the chronograph workspace.
///
/// Creation is permissive (unknown endpoints are auto-created) and removal
/// of absent entities is a quiet no-op, so neither appears here; only
/// malformed inputs are rejected, synchronously at the offending call and
/// before any structure is mutated.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A window or edge interval whose end is not after its begin.
    /// Edge intervals must satisfy `end > begin` strictly; query windows
    /// must satisfy `end >= begin`.
    #[error("invalid interval: end must be bigger than begin: begin: {begin}, end: {end}")]
    InvalidInterval { begin: String, end: String },

    /// Mutually exclusive or incomplete selector combinations.
    #[error("ambiguous query: {0}")]
    AmbiguousQuery(String),

    /// An operation that needs the graph's time span was called on a graph
    /// with no edges.
    #[error("graph has no edges, so it spans no interval")]
    EmptyGraph,

    /// A snapshot partition that resolves to fewer than two windows.
    #[error("number of snapshots must be 2 or bigger: {count} was passed")]
    InvalidSnapshotCount { count: usize },

    /// A snapshot length that is zero or negative.
    #[error("length of snapshots must be bigger than 0: {length} was passed")]
    InvalidSnapshotLength { length: String },

    /// A motif pattern whose edges do not form a connected graph.
    #[error("motif pattern must be connected")]
    DisconnectedMotif,

    /// An edge in a static graph is missing the attribute a conversion
    /// needs, or the attribute does not decode as a time value.
    #[error("edge ({edge}) has no usable `{key}` attribute")]
    MissingAttribute { edge: String, key: String },
}

/// Convenience type alias.
pub type GraphResult<T> = Result<T, GraphError>;
