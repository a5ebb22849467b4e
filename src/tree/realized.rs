//! Arena of realized nodes.
//!
//! The host realizes a node when a data item becomes materialized (its parent
//! was expanded, or it is a top-level item) and unrealizes it when the item is
//! collapsed away or virtualized. Nothing here survives an unrealize.

use super::node::{Node, NodeId};
use super::traversal::{Traversal, TraversalFilter};
use crate::error::{ArboristError, Result};

#[derive(Debug, Clone)]
struct Slot<I> {
    generation: u32,
    node: Option<Node<I>>,
}

/// All currently realized nodes, with their parent/child structure.
#[derive(Debug, Clone)]
pub struct RealizedTree<I> {
    slots: Vec<Slot<I>>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    len: usize,
}

impl<I> RealizedTree<I> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            len: 0,
        }
    }

    /// Number of realized nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no node is realized.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if a handle still refers to a realized node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a realized node.
    pub fn get(&self, id: NodeId) -> Option<&Node<I>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Get a realized node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<I>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Get a realized node, failing with `StaleNode` if it is gone.
    pub fn node(&self, id: NodeId) -> Result<&Node<I>> {
        self.get(id).ok_or_else(|| ArboristError::stale(id))
    }

    /// Get a realized node mutably, failing with `StaleNode` if it is gone.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<I>> {
        self.get_mut(id).ok_or_else(|| ArboristError::stale(id))
    }

    /// Realized children of `parent`, or the top-level nodes for `None`.
    pub fn children_of(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(id) => self.get(id).map(|node| node.children()).unwrap_or(&[]),
        }
    }

    /// Nesting level of a node (top-level nodes are at depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(|node| node.parent());
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).and_then(|node| node.parent());
        }
        depth
    }

    /// Iterate realized nodes depth-first under the given filter.
    pub fn traverse(&self, filter: TraversalFilter) -> Traversal<'_, I> {
        Traversal::new(self, filter)
    }

    /// Realize `item` as the child of `parent` at `index` in display order.
    pub fn realize(&mut self, parent: Option<NodeId>, index: usize, item: I) -> Result<NodeId> {
        let siblings = match parent {
            None => self.roots.len(),
            Some(id) => self.node(id)?.children.len(),
        };
        if index > siblings {
            return Err(ArboristError::InvalidPosition {
                index,
                len: siblings,
            });
        }

        let id = self.allocate(Node::new(item, parent));
        match parent {
            None => self.roots.insert(index, id),
            Some(parent) => self.node_mut(parent)?.children.insert(index, id),
        }
        Ok(id)
    }

    /// Realize `item` after the last realized child of `parent`.
    pub fn realize_last(&mut self, parent: Option<NodeId>, item: I) -> Result<NodeId> {
        let index = match parent {
            None => self.roots.len(),
            Some(id) => self.node(id)?.children.len(),
        };
        self.realize(parent, index, item)
    }

    /// Unrealize a node and its whole subtree. Returns the removed handles,
    /// parent first.
    pub fn unrealize(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let parent = self.node(id)?.parent();
        match parent {
            None => self.roots.retain(|root| *root != id),
            Some(parent) => {
                if let Some(node) = self.get_mut(parent) {
                    node.children.retain(|child| *child != id);
                }
            },
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.release(next) {
                pending.extend(node.children.iter().rev().copied());
                removed.push(next);
            }
        }
        Ok(removed)
    }

    /// Unrealize every child subtree of `parent`, keeping `parent` itself.
    pub fn unrealize_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let children = self.node(parent)?.children.clone();
        let mut removed = Vec::new();
        for child in children {
            removed.extend(self.unrealize(child)?);
        }
        Ok(removed)
    }

    fn allocate(&mut self, node: Node<I>) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node<I>> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }
}

impl<I: PartialEq> RealizedTree<I> {
    /// The realized node for `item` directly under `parent`, if any.
    pub fn container_for(&self, parent: Option<NodeId>, item: &I) -> Option<NodeId> {
        self.children_of(parent)
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|node| node.item() == item))
    }

    /// The first realized node anywhere in the tree that represents `item`,
    /// searching invisible and collapsed subtrees too.
    pub fn find(&self, item: &I) -> Option<NodeId> {
        self.traverse(TraversalFilter::ALL)
            .find(|id| self.get(*id).is_some_and(|node| node.item() == item))
    }
}

impl<I> Default for RealizedTree<I> {
    fn default() -> Self {
        Self::new()
    }
}
