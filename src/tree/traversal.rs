//! Depth-first traversal of realized nodes.

use super::node::NodeId;
use super::realized::RealizedTree;
use std::slice;

/// Which nodes a traversal yields and where it descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalFilter {
    /// Yield invisible nodes and descend into collapsed subtrees.
    pub include_invisible: bool,
    /// Yield disabled nodes.
    pub include_disabled: bool,
}

impl TraversalFilter {
    /// Every realized node.
    pub const ALL: Self = Self {
        include_invisible: true,
        include_disabled: true,
    };

    /// Visible nodes in expanded subtrees, enabled or not.
    pub const VISIBLE: Self = Self {
        include_invisible: false,
        include_disabled: true,
    };

    /// Visible, enabled nodes in expanded subtrees. This is the selectable order.
    pub const SELECTABLE: Self = Self {
        include_invisible: false,
        include_disabled: false,
    };
}

/// Lazy pre-order walk over a [`RealizedTree`].
///
/// Nodes that fail a filter are skipped, but their subtree is still walked
/// when it is expanded (or when invisible nodes are included), so a hidden or
/// disabled branch can still expose matching descendants. Nothing is cached:
/// create a new traversal after the realized set changes.
#[derive(Debug)]
pub struct Traversal<'a, I> {
    tree: &'a RealizedTree<I>,
    filter: TraversalFilter,
    stack: Vec<slice::Iter<'a, NodeId>>,
}

impl<'a, I> Traversal<'a, I> {
    pub(crate) fn new(tree: &'a RealizedTree<I>, filter: TraversalFilter) -> Self {
        Self {
            tree,
            filter,
            stack: vec![tree.children_of(None).iter()],
        }
    }
}

impl<'a, I> Iterator for Traversal<'a, I> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let tree = self.tree;
        loop {
            let level = self.stack.last_mut()?;
            let Some(&id) = level.next() else {
                self.stack.pop();
                continue;
            };
            let Some(node) = tree.get(id) else {
                continue;
            };

            if self.filter.include_invisible || node.is_expanded() {
                self.stack.push(node.children().iter());
            }

            let shown = self.filter.include_invisible || node.is_visible();
            let usable = self.filter.include_disabled || node.is_enabled();
            if shown && usable {
                return Some(id);
            }
        }
    }
}
