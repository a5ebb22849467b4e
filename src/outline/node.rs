//! Outline node types.

/// Separator between the names that make up an item path.
pub const PATH_SEPARATOR: char = '/';

/// One entry of an outline, with its nested entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Display name.
    pub name: String,
    /// Slash-joined names from the top level down to this node. Unique
    /// within an outline, so it doubles as the item identity.
    pub path: String,
    /// Nested entries.
    pub children: Vec<OutlineNode>,
    /// Whether the entry can be selected.
    pub enabled: bool,
    /// Whether the entry is shown.
    pub visible: bool,
}

impl OutlineNode {
    /// Create an enabled, visible node without children.
    pub fn new(name: String, path: String) -> Self {
        Self {
            name,
            path,
            children: Vec::new(),
            enabled: true,
            visible: true,
        }
    }

    /// Check if this node has nested entries.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }

    /// Get display name, with the child count for parents.
    pub fn display_name(&self) -> String {
        if self.has_children() {
            format!("{} ({})", self.name, self.children.len())
        } else {
            self.name.clone()
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::subtree_len)
            .sum::<usize>()
    }
}

/// Join a parent path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, name)
    }
}
