//! A parsed outline.

use super::node::{OutlineNode, PATH_SEPARATOR};
use std::path::PathBuf;

/// A loaded outline: its top-level entries and where it came from.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    /// Path to the source file, if it was read from one.
    pub source: Option<PathBuf>,
    /// Top-level entries.
    pub roots: Vec<OutlineNode>,
}

impl Outline {
    /// Create an outline.
    pub fn new(source: Option<PathBuf>, roots: Vec<OutlineNode>) -> Self {
        Self { source, roots }
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.roots.iter().map(OutlineNode::subtree_len).sum()
    }

    /// Look up an entry by its path.
    pub fn find(&self, path: &str) -> Option<&OutlineNode> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut node = self.roots.iter().find(|node| node.name == first)?;
        for segment in segments {
            node = node.children.iter().find(|child| child.name == segment)?;
        }
        Some(node)
    }

    /// The file name of the source, for titles.
    pub fn title(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}
