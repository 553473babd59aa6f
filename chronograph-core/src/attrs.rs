//! Attribute bags for graphs, nodes, and edges.

use std::collections::BTreeMap;

/// A string-keyed attribute map.
///
/// Attribute values are arbitrary JSON values, stored verbatim and never
/// interpreted by the core. Re-adding an interval edge with the same key
/// merges into the existing map instead of replacing it.
pub type Attributes = BTreeMap<String, serde_json::Value>;
