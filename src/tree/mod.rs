//! Realized tree structure and traversal.
//!
//! This module models the nodes the host has materialized for its
//! hierarchical data, and walks them in display order.

mod node;
mod realized;
mod traversal;

pub use node::{Node, NodeId};
pub use realized::RealizedTree;
pub use traversal::{Traversal, TraversalFilter};
