//! Keeps node selection flags in step with the selected-items list.
//!
//! The list is the source of truth. Node flags are a cache over it: they are
//! written when a change notification is applied and re-derived whenever a
//! node is realized. The owner installs a waker on the list subscription so
//! changes are applied as soon as the host makes them. A change raised while
//! the owner is busy stays queued until [`Synchronizer::settle`] runs, which
//! the owner does before it lets go.

use super::item::DataItem;
use super::items::{ChangeFeed, CollectionChange, SelectedItems, Waker};
use super::preview::SelectionEvents;
use crate::tree::{NodeId, RealizedTree, TraversalFilter};
use std::fmt;
use std::rc::Rc;

/// Reconciles a [`SelectedItems`] list with the realized nodes of a tree.
pub struct Synchronizer<I> {
    items: SelectedItems<I>,
    feed: Option<ChangeFeed<I>>,
    waker: Option<Waker>,
    /// Our own edits to a list that does not report changes.
    unobserved: Vec<CollectionChange<I>>,
    last_selected: Option<I>,
}

impl<I: DataItem> Synchronizer<I> {
    /// Bind to a list, subscribing to it if it reports changes.
    pub fn new(items: SelectedItems<I>) -> Self {
        let feed = items.subscribe();
        let last_selected = items.last();
        Self {
            items,
            feed,
            waker: None,
            unobserved: Vec::new(),
            last_selected,
        }
    }

    /// The bound list.
    pub fn items(&self) -> &SelectedItems<I> {
        &self.items
    }

    /// The most recently added item, or the tail after a removal.
    pub fn last_selected(&self) -> Option<&I> {
        self.last_selected.as_ref()
    }

    /// Check if external changes to the bound list are observed.
    pub fn is_observing(&self) -> bool {
        self.feed.is_some()
    }

    /// Run `waker` whenever the bound list reports a change. It carries over
    /// to lists bound later.
    pub fn set_waker(&mut self, waker: Waker) {
        if let Some(feed) = &self.feed {
            feed.set_waker(Rc::clone(&waker));
        }
        self.waker = Some(waker);
    }

    /// Bind to another list and return the previous one.
    ///
    /// The old subscription is dropped before the new one is taken, and every
    /// realized node is re-derived from the new list.
    pub fn replace_items(
        &mut self,
        tree: &mut RealizedTree<I>,
        items: SelectedItems<I>,
    ) -> SelectedItems<I> {
        self.feed = None;
        self.unobserved.clear();
        let previous = std::mem::replace(&mut self.items, items);
        self.feed = self.items.subscribe();
        match (&self.feed, &self.waker) {
            (Some(feed), Some(waker)) => feed.set_waker(Rc::clone(waker)),
            (None, _) => tracing::debug!("Bound selected items list does not report changes"),
            _ => {},
        }
        self.rederive_all(tree);
        self.last_selected = self.items.last();
        previous
    }

    /// Apply every pending notification. Returns `true` if anything changed.
    pub fn pump(&mut self, tree: &mut RealizedTree<I>) -> bool {
        let mut changes = std::mem::take(&mut self.unobserved);
        if let Some(feed) = &self.feed {
            changes.extend(feed.take());
        }
        if changes.is_empty() {
            return false;
        }
        for change in &changes {
            self.apply(tree, change);
        }
        true
    }

    /// Apply pending notifications as one batch and raise selection-changed
    /// once for it. Returns `true` if anything changed.
    ///
    /// Edits the changed handlers make to the list are applied and reported
    /// as one more batch. Edits made while that batch is reported are applied
    /// without a further report, so handlers cannot keep the loop going.
    pub fn settle(
        &mut self,
        tree: &mut RealizedTree<I>,
        events: &mut SelectionEvents<I>,
    ) -> bool {
        if !self.pump(tree) {
            return false;
        }
        events.raise_changed();
        if self.pump(tree) {
            events.raise_changed();
            if self.pump(tree) {
                tracing::debug!("Selection edited while reporting a follow-up batch");
            }
        }
        true
    }

    /// Set a node's flag from list membership.
    pub fn rederive(&self, tree: &mut RealizedTree<I>, id: NodeId) {
        if let Some(node) = tree.get_mut(id) {
            let selected = self.items.contains(node.item());
            node.set_selected(selected);
        }
    }

    /// Set every realized node's flag from list membership.
    pub fn rederive_all(&self, tree: &mut RealizedTree<I>) {
        let all: Vec<NodeId> = tree.traverse(TraversalFilter::ALL).collect();
        for id in all {
            self.rederive(tree, id);
        }
    }

    /// Add items that are not selected yet. Returns `true` if the list
    /// changed. The change is applied by the next pump.
    pub(crate) fn add(&mut self, items: Vec<I>) -> bool {
        let change = self.items.add_items(items);
        self.record(change)
    }

    /// Remove items. Returns `true` if the list changed.
    pub(crate) fn remove(&mut self, items: &[I]) -> bool {
        let change = self.items.remove_items(items);
        self.record(change)
    }

    /// Empty the list. Returns `true` if the list changed.
    pub(crate) fn clear(&mut self) -> bool {
        let change = self.items.reset();
        self.record(change)
    }

    /// An observed list queues our own edit on the feed like any other.
    fn record(&mut self, change: Option<CollectionChange<I>>) -> bool {
        let Some(change) = change else {
            return false;
        };
        if self.feed.is_none() {
            self.unobserved.push(change);
        }
        true
    }

    fn apply(&mut self, tree: &mut RealizedTree<I>, change: &CollectionChange<I>) {
        match change {
            CollectionChange::Added(items) => {
                for item in items {
                    // A later queued removal may already have taken it out again.
                    if !self.items.contains(item) {
                        continue;
                    }
                    if let Some(node) = tree.find(item).and_then(|id| tree.get_mut(id)) {
                        node.set_selected(true);
                    }
                }
                if let Some(last) = items.last() {
                    self.last_selected = Some(last.clone());
                }
                tracing::debug!("Selected {} item(s)", items.len());
            },
            CollectionChange::Removed(items) => {
                for item in items {
                    if self.items.contains(item) {
                        continue;
                    }
                    if let Some(node) = tree.find(item).and_then(|id| tree.get_mut(id)) {
                        node.set_selected(false);
                    }
                    if self.last_selected.as_ref() == Some(item) {
                        self.last_selected = self.items.last();
                    }
                }
                tracing::debug!("Deselected {} item(s)", items.len());
            },
            CollectionChange::Reset => {
                let all: Vec<NodeId> = tree.traverse(TraversalFilter::ALL).collect();
                for id in all {
                    if let Some(node) = tree.get_mut(id) {
                        node.set_selected(false);
                    }
                }
                self.last_selected = None;
                tracing::debug!("Selection reset");
            },
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for Synchronizer<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("items", &self.items)
            .field("feed", &self.feed)
            .field("last_selected", &self.last_selected)
            .finish()
    }
}
