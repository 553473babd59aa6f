//! The two temporal edge indexes: an augmented AVL interval tree for
//! half-open interval edges and an ordered timestamp map for impulse edges.

pub mod interval_tree;
pub mod timestamp_index;
