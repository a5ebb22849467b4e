//! Realized node types.

use std::fmt;

/// Handle to a realized node.
///
/// Handles are generational: once a node is unrealized its handle goes stale
/// and is never reused for a different node, even when the slot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A realized tree element holding the transient UI flags for one data item.
///
/// `is_selected` is a cache of list membership and `has_tab_stop` is owned by
/// the interaction tracker, so neither can be written from outside the crate.
#[derive(Debug, Clone)]
pub struct Node<I> {
    item: I,
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    visible: bool,
    enabled: bool,
    expanded: bool,
    selected: bool,
    tab_stop: bool,
}

impl<I> Node<I> {
    pub(crate) fn new(item: I, parent: Option<NodeId>) -> Self {
        Self {
            item,
            parent,
            children: Vec::new(),
            visible: true,
            enabled: true,
            expanded: false,
            selected: false,
            tab_stop: false,
        }
    }

    /// The data item this node represents.
    pub fn item(&self) -> &I {
        &self.item
    }

    /// The realized parent, or `None` for a top-level node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Realized children in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if the node is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Check if the node is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if the node is expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Check if the node is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Check if the node currently holds the tree's single tab stop.
    pub fn has_tab_stop(&self) -> bool {
        self.tab_stop
    }

    /// Set the visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Set the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the expanded flag. Realizing the children is up to the host.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_tab_stop(&mut self, tab_stop: bool) {
        self.tab_stop = tab_stop;
    }
}
