//! Outline reading and representation.
//!
//! This module reads indented text outlines and represents them as a tree
//! of nodes the host realizes on demand.

mod document;
mod node;
mod reader;

pub use document::Outline;
pub use node::{join_path, OutlineNode, PATH_SEPARATOR};
pub use reader::OutlineReader;
