//! The tree view control.
//!
//! [`TreeView`] owns the realized nodes, the binding to the selected-items
//! list, the selection strategy and the focus state, and exposes the input
//! hooks a host forwards to it.
//!
//! The nodes, the synchronizer and the event handlers sit behind one shared
//! cell that the list subscription can reach, so edits the host makes to the
//! selected-items list show up on the nodes immediately. While the view is
//! borrowed, by one of its own operations or by a guard returned from
//! [`TreeView::nodes`] or [`TreeView::node`], list edits stay queued and are
//! applied before the next operation returns.

use crate::config::TreeConfig;
use crate::error::{ArboristError, Result};
use crate::interaction::{
    FocusTarget, InputMode, InteractionTracker, Key, Modifiers, PointerButton,
};
use crate::selection::{
    first_visible, last_visible, next_visible, previous_visible, resolve_range, DataItem,
    HandlerId, PreviewSelectionChange, SelectedItems, SelectionContext, SelectionEvents,
    SelectionMode, SelectionStrategy, Synchronizer, Waker,
};
use crate::tree::{Node, NodeId, RealizedTree, TraversalFilter};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// State reachable from the list subscription.
#[derive(Debug)]
struct Shared<I> {
    tree: RealizedTree<I>,
    synchronizer: Synchronizer<I>,
    events: SelectionEvents<I>,
}

impl<I: DataItem> Shared<I> {
    fn settle(&mut self) -> bool {
        let Shared {
            tree,
            synchronizer,
            events,
        } = self;
        synchronizer.settle(tree, events)
    }
}

/// A hierarchical list control with single or multiple selection.
#[derive(Debug)]
pub struct TreeView<I: DataItem> {
    config: TreeConfig,
    shared: Rc<RefCell<Shared<I>>>,
    strategy: Box<dyn SelectionStrategy<I>>,
    interaction: InteractionTracker,
    focus: Option<FocusTarget>,
}

impl<I: DataItem> TreeView<I> {
    /// Create an empty tree bound to a fresh selected-items list.
    pub fn new(config: TreeConfig) -> Self {
        Self::with_selected_items(config, SelectedItems::new())
    }

    /// Create an empty tree bound to the host's selected-items list.
    pub fn with_selected_items(config: TreeConfig, items: SelectedItems<I>) -> Self {
        let strategy = config.selection_mode.strategy();
        let shared = Rc::new(RefCell::new(Shared {
            tree: RealizedTree::new(),
            synchronizer: Synchronizer::new(items),
            events: SelectionEvents::new(),
        }));

        let weak = Rc::downgrade(&shared);
        let waker: Waker = Rc::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            // A busy view settles the queue itself before it lets go.
            let Ok(mut state) = shared.try_borrow_mut() else {
                return;
            };
            state.settle();
        });
        shared.borrow_mut().synchronizer.set_waker(waker);

        Self {
            config,
            shared,
            strategy,
            interaction: InteractionTracker::new(),
            focus: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Run `f` on the shared state, then apply whatever list edits queued up
    /// meanwhile.
    fn update<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Shared<I>) -> T,
    {
        let mut shared = self.shared.borrow_mut();
        let out = f(&mut *shared);
        shared.settle();
        out
    }

    // ---- realized nodes ----

    /// The realized nodes.
    pub fn nodes(&self) -> Ref<'_, RealizedTree<I>> {
        Ref::map(self.shared.borrow(), |shared| &shared.tree)
    }

    /// Get a realized node.
    pub fn node(&self, id: NodeId) -> Result<Ref<'_, Node<I>>> {
        Ref::filter_map(self.shared.borrow(), |shared| shared.tree.get(id))
            .map_err(|_| ArboristError::stale(id))
    }

    /// Get a realized node to change its visibility, enabled or expanded flag.
    pub fn node_mut(&mut self, id: NodeId) -> Result<RefMut<'_, Node<I>>> {
        RefMut::filter_map(self.shared.borrow_mut(), |shared| shared.tree.get_mut(id))
            .map_err(|_| ArboristError::stale(id))
    }

    /// Realize `item` under `parent` at `index`. Its selected flag is derived
    /// from the selected-items list.
    pub fn realize(&mut self, parent: Option<NodeId>, index: usize, item: I) -> Result<NodeId> {
        self.update(|shared| -> Result<NodeId> {
            let id = shared.tree.realize(parent, index, item)?;
            shared.synchronizer.rederive(&mut shared.tree, id);
            Ok(id)
        })
    }

    /// Realize `item` after the last realized child of `parent`.
    pub fn realize_last(&mut self, parent: Option<NodeId>, item: I) -> Result<NodeId> {
        self.update(|shared| -> Result<NodeId> {
            let id = shared.tree.realize_last(parent, item)?;
            shared.synchronizer.rederive(&mut shared.tree, id);
            Ok(id)
        })
    }

    /// Unrealize a node and its subtree. The items stay selected in the list.
    pub fn unrealize(&mut self, id: NodeId) -> Result<()> {
        let removed = self.update(|shared| shared.tree.unrealize(id))?;
        self.forget(&removed);
        Ok(())
    }

    /// Unrealize the children of `parent`, typically on collapse.
    pub fn unrealize_children(&mut self, parent: NodeId) -> Result<()> {
        let removed = self.update(|shared| shared.tree.unrealize_children(parent))?;
        self.forget(&removed);
        Ok(())
    }

    fn forget(&mut self, removed: &[NodeId]) {
        self.interaction.forget(removed);
        if let Some(FocusTarget::Node(id)) = self.focus {
            if removed.contains(&id) {
                self.focus = Some(FocusTarget::Control);
            }
        }
    }

    /// The realized nodes accepted by `filter`, in display order.
    pub fn traverse(&self, filter: TraversalFilter) -> Vec<NodeId> {
        self.nodes().traverse(filter).collect()
    }

    /// Nodes between two nodes of the selectable order, inclusive.
    pub fn resolve_range(&self, first: NodeId, last: NodeId) -> Result<Vec<NodeId>> {
        resolve_range(&*self.nodes(), first, last)
    }

    // ---- selected items ----

    /// The bound selected-items list.
    pub fn selected_items(&self) -> SelectedItems<I> {
        self.shared.borrow().synchronizer.items().clone()
    }

    /// Bind another selected-items list and return the previous one.
    pub fn set_selected_items(&mut self, items: SelectedItems<I>) -> SelectedItems<I> {
        self.update(|shared| {
            let previous = shared.synchronizer.replace_items(&mut shared.tree, items);
            shared.events.raise_changed();
            previous
        })
    }

    /// The most recently selected item.
    pub fn last_selected_item(&self) -> Option<I> {
        self.shared.borrow().synchronizer.last_selected().cloned()
    }

    /// Apply list edits that queued up while the view was borrowed.
    ///
    /// Edits normally apply as the host makes them; this only catches up on
    /// the ones made while a guard from [`TreeView::nodes`] or
    /// [`TreeView::node`] was alive. Raises selection-changed once if
    /// anything was applied.
    pub fn sync(&mut self) -> bool {
        self.shared.borrow_mut().settle()
    }

    // ---- events ----

    /// Register a handler that may veto selection changes.
    pub fn on_preview_selection_change<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&mut PreviewSelectionChange<'_, I>) + 'static,
    {
        self.shared.borrow_mut().events.on_preview(handler)
    }

    /// Register a handler that runs once per applied batch of changes.
    pub fn on_selection_changed<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut() + 'static,
    {
        self.shared.borrow_mut().events.on_changed(handler)
    }

    /// Unregister an event handler.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.shared.borrow_mut().events.remove(id)
    }

    // ---- selection gestures ----

    /// The active selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.strategy.mode()
    }

    /// Switch the selection algorithm, disposing the previous one.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.strategy.dispose();
        self.strategy = mode.strategy();
        self.config.selection_mode = mode;
        tracing::debug!("Selection mode set to {}", mode);
    }

    /// Release the selection strategy. Later gestures fail with
    /// `SelectionDisposed`.
    pub fn unload(&mut self) {
        if !self.strategy.is_disposed() {
            self.strategy.dispose();
        }
    }

    fn with_strategy<T, F>(&mut self, gesture: F) -> Result<T>
    where
        F: FnOnce(&mut dyn SelectionStrategy<I>, &mut SelectionContext<'_, I>) -> Result<T>,
    {
        let strategy = self.strategy.as_mut();
        let mut shared = self.shared.borrow_mut();
        shared.settle();
        let result = {
            let Shared {
                tree,
                synchronizer,
                events,
            } = &mut *shared;
            let mut cx = SelectionContext::new(tree, synchronizer, events);
            gesture(strategy, &mut cx)
        };
        shared.settle();
        result
    }

    /// Select exactly `node`.
    pub fn select(&mut self, node: NodeId) -> Result<bool> {
        self.with_strategy(|strategy, cx| strategy.select(cx, node))
    }

    /// Flip the selection of `node`.
    pub fn toggle(&mut self, node: NodeId) -> Result<bool> {
        self.with_strategy(|strategy, cx| strategy.toggle(cx, node))
    }

    /// Extend the selection from the last selected node to `node`.
    pub fn select_range(&mut self, node: NodeId) -> Result<bool> {
        self.with_strategy(|strategy, cx| strategy.select_range(cx, node))
    }

    /// Replace the selection with the visible nodes accepted by `covers`.
    pub fn select_by_rectangle<F>(&mut self, mut covers: F) -> Result<bool>
    where
        F: FnMut(NodeId, &Node<I>) -> bool,
    {
        self.with_strategy(|strategy, cx| strategy.select_by_rectangle(cx, &mut covers))
    }

    /// Set a node's selection as if the host flipped its selected flag. The
    /// change goes through the strategy and the preview protocol.
    pub fn set_node_selected(&mut self, node: NodeId, selected: bool) -> Result<bool> {
        let item = self.node(node)?.item().clone();
        self.sync();
        if self.selected_items().contains(&item) == selected {
            return Ok(true);
        }
        if selected && self.selection_mode() != SelectionMode::Multiple {
            self.select(node)
        } else {
            self.toggle(node)
        }
    }

    /// Deselect everything. Returns `false` and changes nothing if any
    /// handler vetoes the deselection of any item.
    pub fn clear_selection(&mut self) -> bool {
        self.update(|shared| {
            shared.settle();
            let Shared {
                tree,
                synchronizer,
                events,
            } = shared;
            SelectionContext::new(tree, synchronizer, events).clear()
        })
    }

    /// A primary click on `node`: Control toggles, Shift extends the range,
    /// otherwise the node alone is selected. The node takes focus either way.
    pub fn click(&mut self, node: NodeId, modifiers: Modifiers) -> Result<bool> {
        self.on_preview_pointer_down(PointerButton::Primary);
        self.focus_node(node)?;
        if modifiers.control {
            self.toggle(node)
        } else if modifiers.shift {
            self.select_range(node)
        } else {
            self.select(node)
        }
    }

    // ---- input and focus ----

    /// The current input mode.
    pub fn input_mode(&self) -> InputMode {
        self.interaction.mode()
    }

    /// Check if the user is driving the tree with the keyboard.
    pub fn is_keyboard_mode(&self) -> bool {
        self.interaction.is_keyboard_mode()
    }

    /// The node holding the tab stop.
    pub fn last_focused(&self) -> Option<NodeId> {
        self.interaction.last_focused()
    }

    /// Check if the control itself holds the tab stop.
    pub fn control_has_tab_stop(&self) -> bool {
        self.interaction.control_has_tab_stop()
    }

    /// What currently has input focus, if the tree has it at all.
    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus
    }

    /// A key is about to go down.
    pub fn on_preview_key_down(&mut self) {
        self.interaction.on_preview_key();
    }

    /// A key is about to go up.
    pub fn on_preview_key_up(&mut self) {
        self.interaction.on_preview_key();
    }

    /// A pointer button is about to go down anywhere in the tree.
    pub fn on_preview_pointer_down(&mut self, button: PointerButton) {
        self.interaction.on_preview_pointer_down(button);
    }

    /// Move input focus to `node`. It takes over the tab stop.
    pub fn focus_node(&mut self, node: NodeId) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.tree.node(node)?;
        self.interaction.set_last_focused(&mut shared.tree, Some(node));
        self.focus = Some(FocusTarget::Node(node));
        Ok(())
    }

    /// The control itself received focus. Focus is handed to the last
    /// focused node, else the first visible node; an empty tree keeps it.
    pub fn on_got_focus(&mut self) -> FocusTarget {
        let mut shared = self.shared.borrow_mut();
        let target = self.interaction.delegate_focus(&shared.tree);
        if let FocusTarget::Node(id) = target {
            self.interaction.set_last_focused(&mut shared.tree, Some(id));
        }
        self.focus = Some(target);
        target
    }

    /// Focus left the tree.
    pub fn on_lost_focus(&mut self) {
        self.focus = None;
    }

    /// A pointer button went down on empty space. The control takes focus,
    /// which hands it on to a node.
    pub fn on_pointer_down_empty(&mut self, button: PointerButton) -> FocusTarget {
        self.on_preview_pointer_down(button);
        self.on_got_focus()
    }

    /// Control-level key handling, used while no node has focus: Down selects
    /// the first visible node and Up the last. Returns whether the key was
    /// handled.
    pub fn on_key_down(&mut self, key: Key) -> Result<bool> {
        if matches!(self.focus, Some(FocusTarget::Node(_))) {
            return Ok(false);
        }
        let order = self.traverse(TraversalFilter::VISIBLE);
        let target = match key {
            Key::Down => order.first(),
            Key::Up => order.last(),
            _ => return Ok(false),
        };
        let Some(&target) = target else {
            return Ok(false);
        };
        self.focus_node(target)?;
        self.select(target)?;
        Ok(true)
    }

    /// Node-level keyboard navigation from the focused node. Shift extends
    /// the selection, Control moves focus only. Returns whether the key was
    /// handled.
    pub fn navigate(&mut self, key: Key, modifiers: Modifiers) -> Result<bool> {
        let current = match self.focus {
            Some(FocusTarget::Node(id)) => Some(id),
            _ => None,
        };
        let Some(current) = current else {
            return self.on_key_down(key);
        };

        let target = {
            let nodes = self.nodes();
            let tree: &RealizedTree<I> = &nodes;
            let order: Vec<NodeId> = tree.traverse(TraversalFilter::VISIBLE).collect();
            match key {
                Key::Up => previous_visible(tree, Some(current), &order),
                Key::Down => next_visible(tree, Some(current), &order),
                Key::Home => first_visible(tree, &order),
                Key::End => last_visible(tree, &order),
                Key::Other => return Ok(false),
            }
        };
        let Some(target) = target else {
            return Ok(false);
        };

        self.focus_node(target)?;
        if modifiers.control {
            return Ok(true);
        }
        if modifiers.shift {
            self.select_range(target)?;
        } else {
            self.select(target)?;
        }
        Ok(true)
    }
}

impl<I: DataItem> Default for TreeView<I> {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArboristError;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        view: TreeView<&'static str>,
        list: SelectedItems<&'static str>,
        changed: Rc<RefCell<usize>>,
    }

    impl Fixture {
        fn new(names: &[&'static str]) -> (Self, Vec<NodeId>) {
            let list = SelectedItems::new();
            let mut view = TreeView::with_selected_items(TreeConfig::default(), list.clone());
            let changed = Rc::new(RefCell::new(0));
            let counter = Rc::clone(&changed);
            view.on_selection_changed(move || *counter.borrow_mut() += 1);
            let ids = names
                .iter()
                .map(|name| view.realize_last(None, *name).unwrap())
                .collect();
            (
                Self {
                    view,
                    list,
                    changed,
                },
                ids,
            )
        }

        fn selected(&self) -> Vec<&'static str> {
            let nodes = self.view.nodes();
            nodes
                .traverse(TraversalFilter::ALL)
                .filter_map(|id| nodes.get(id))
                .filter(|node| node.is_selected())
                .map(|node| *node.item())
                .collect()
        }

        fn changes(&self) -> usize {
            *self.changed.borrow()
        }

        /// Selected realized nodes match list entries that have a realized node.
        fn assert_consistent(&self) {
            let realized_entries = self
                .list
                .to_vec()
                .iter()
                .filter(|item| self.view.nodes().find(item).is_some())
                .count();
            assert_eq!(self.selected().len(), realized_entries);
            let tab_stops = self
                .view
                .traverse(TraversalFilter::ALL)
                .into_iter()
                .filter(|id| self.view.node(*id).unwrap().has_tab_stop())
                .count();
            assert!(tab_stops <= 1);
        }
    }

    #[test]
    fn clearing_an_empty_selection_succeeds_silently() {
        let (mut fx, _) = Fixture::new(&[]);
        let previews = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&previews);
        fx.view
            .on_preview_selection_change(move |_| *counter.borrow_mut() += 1);

        assert!(fx.view.clear_selection());
        assert_eq!(*previews.borrow(), 0);
        assert_eq!(fx.changes(), 0);
    }

    #[test]
    fn external_removal_deselects_and_moves_last_to_tail() {
        let (fx, _) = Fixture::new(&["A", "B", "C"]);
        fx.list.extend(vec!["A", "C", "B"]);
        assert_eq!(fx.view.last_selected_item(), Some("B"));
        assert_eq!(fx.changes(), 1);

        fx.list.remove(&"B");
        assert_eq!(fx.selected(), vec!["A", "C"]);
        assert_eq!(fx.view.last_selected_item(), Some("C"));
        assert_eq!(fx.changes(), 2);
        fx.assert_consistent();
    }

    #[test]
    fn external_reset_deselects_everything_once() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        fx.view.select(ids[0]).unwrap();
        fx.view.toggle(ids[1]).unwrap();
        assert_eq!(fx.selected(), vec!["A", "B"]);
        let before = fx.changes();

        fx.list.clear();
        assert!(fx.selected().is_empty());
        assert_eq!(fx.view.last_selected_item(), None);
        assert_eq!(fx.changes(), before + 1);
        assert!(!fx.view.sync());
    }

    #[test]
    fn range_leaves_out_invisible_nodes() {
        let (mut fx, ids) = Fixture::new(&["p0", "p1", "p2", "p3", "p4", "p5"]);
        fx.view.node_mut(ids[4]).unwrap().set_visible(false);
        fx.view.select(ids[2]).unwrap();
        fx.view.select_range(ids[5]).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["p2", "p3", "p5"]);
        fx.assert_consistent();
    }

    #[test]
    fn vetoed_clear_keeps_the_whole_list() {
        let (mut fx, ids) = Fixture::new(&["X", "Y"]);
        fx.view.select(ids[0]).unwrap();
        fx.view.toggle(ids[1]).unwrap();
        fx.view.on_preview_selection_change(|e| {
            if *e.item() == "X" && !e.is_selecting() {
                e.cancel();
            }
        });

        assert!(!fx.view.clear_selection());
        assert_eq!(fx.list.to_vec(), vec!["X", "Y"]);
        assert_eq!(fx.selected(), vec!["X", "Y"]);
    }

    #[test]
    fn reselecting_does_not_raise_again() {
        let (mut fx, ids) = Fixture::new(&["A"]);
        assert!(fx.view.select(ids[0]).unwrap());
        assert!(fx.view.select(ids[0]).unwrap());
        assert_eq!(fx.changes(), 1);
        assert_eq!(fx.selected(), vec!["A"]);
    }

    #[test]
    fn realized_nodes_pick_up_their_selection() {
        let (mut fx, ids) = Fixture::new(&["root"]);
        fx.view.node_mut(ids[0]).unwrap().set_expanded(true);
        let child = fx.view.realize_last(Some(ids[0]), "child").unwrap();
        fx.view.select(child).unwrap();

        // Collapse: the node goes away, the item stays selected.
        fx.view.unrealize_children(ids[0]).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["child"]);
        assert!(fx.selected().is_empty());
        fx.assert_consistent();

        // Expand again: a new node, re-derived from the list.
        let again = fx.view.realize_last(Some(ids[0]), "child").unwrap();
        assert_ne!(again, child);
        assert!(fx.view.node(again).unwrap().is_selected());
        fx.assert_consistent();
    }

    #[test]
    fn host_edits_apply_immediately() {
        let (fx, ids) = Fixture::new(&["A", "B"]);
        fx.list.push("A");
        assert!(fx.view.node(ids[0]).unwrap().is_selected());
        assert_eq!(fx.view.last_selected_item(), Some("A"));
        assert_eq!(fx.changes(), 1);
        fx.assert_consistent();

        fx.list.extend(vec!["B", "unrealized"]);
        assert_eq!(fx.selected(), vec!["A", "B"]);
        assert_eq!(fx.view.last_selected_item(), Some("unrealized"));
        assert_eq!(fx.changes(), 2);
        fx.assert_consistent();

        fx.list.remove(&"unrealized");
        assert_eq!(fx.view.last_selected_item(), Some("B"));
        assert_eq!(fx.changes(), 3);
    }

    #[test]
    fn edits_made_under_a_guard_apply_on_the_next_gesture() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        {
            let nodes = fx.view.nodes();
            fx.list.push("A");
            assert!(!nodes.get(ids[0]).unwrap().is_selected());
        }
        assert_eq!(fx.changes(), 0);

        fx.view.select_range(ids[1]).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["A", "B"]);
        assert_eq!(fx.changes(), 2);
        fx.assert_consistent();
    }

    #[test]
    fn sync_catches_up_on_guarded_edits() {
        let (mut fx, ids) = Fixture::new(&["A"]);
        {
            let _node = fx.view.node(ids[0]).unwrap();
            fx.list.push("A");
        }
        assert!(fx.selected().is_empty());
        assert!(fx.view.sync());
        assert_eq!(fx.selected(), vec!["A"]);
        assert_eq!(fx.changes(), 1);
        assert!(!fx.view.sync());
    }

    #[test]
    fn changed_handler_edits_apply_before_the_gesture_returns() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        let handle = fx.list.clone();
        fx.view.on_selection_changed(move || {
            if !handle.contains(&"B") {
                handle.push("B");
            }
        });

        assert!(fx.view.select(ids[0]).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["A", "B"]);
        assert!(fx.view.node(ids[1]).unwrap().is_selected());
        assert_eq!(fx.view.last_selected_item(), Some("B"));
        assert_eq!(fx.changes(), 2);
        fx.assert_consistent();
    }

    #[test]
    fn changed_handler_removals_apply() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        fx.list.push("A");
        let handle = fx.list.clone();
        fx.view.on_selection_changed(move || {
            handle.remove(&"A");
        });

        fx.view.toggle(ids[1]).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["B"]);
        assert_eq!(fx.selected(), vec!["B"]);
        assert_eq!(fx.view.last_selected_item(), Some("B"));
        assert_eq!(fx.changes(), 3);
        fx.assert_consistent();
    }

    #[test]
    fn handlers_that_always_edit_do_not_loop() {
        let (mut fx, _) = Fixture::new(&["A", "B"]);
        let handle = fx.list.clone();
        let mut next = vec!["n4", "n3", "n2", "n1"];
        fx.view.on_selection_changed(move || {
            if let Some(item) = next.pop() {
                handle.push(item);
            }
        });

        fx.list.push("A");
        assert_eq!(fx.changes(), 2);
        assert_eq!(fx.list.to_vec(), vec!["A", "n1", "n2"]);
        assert_eq!(fx.view.last_selected_item(), Some("n2"));
        assert_eq!(fx.selected(), vec!["A"]);
        fx.assert_consistent();
    }

    #[test]
    fn preview_handler_edits_join_the_gesture_batch() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        let handle = fx.list.clone();
        fx.view.on_preview_selection_change(move |e| {
            if *e.item() == "A" && !handle.contains(&"B") {
                handle.push("B");
            }
        });

        assert!(fx.view.select(ids[0]).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["B", "A"]);
        assert_eq!(fx.selected(), vec!["A", "B"]);
        assert_eq!(fx.view.last_selected_item(), Some("A"));
        assert_eq!(fx.changes(), 1);
        fx.assert_consistent();
    }

    #[test]
    fn vetoing_handler_edits_still_apply() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        let handle = fx.list.clone();
        fx.view.on_preview_selection_change(move |e| {
            if !handle.contains(&"B") {
                handle.push("B");
            }
            e.cancel();
        });

        assert!(!fx.view.select(ids[0]).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["B"]);
        assert_eq!(fx.selected(), vec!["B"]);
        assert_eq!(fx.changes(), 1);
        fx.assert_consistent();
    }

    #[test]
    fn swapping_the_list_rederives_flags() {
        let (mut fx, _) = Fixture::new(&["A", "B"]);
        fx.list.push("A");

        let replacement = SelectedItems::from_items(vec!["B"]);
        let previous = fx.view.set_selected_items(replacement.clone());
        assert!(previous.same_list(&fx.list));
        assert_eq!(fx.selected(), vec!["B"]);
        assert_eq!(fx.view.last_selected_item(), Some("B"));
        assert_eq!(fx.changes(), 2);

        // The old list is no longer observed.
        fx.list.clear();
        assert!(!fx.view.sync());
        assert_eq!(fx.selected(), vec!["B"]);

        replacement.push("A");
        assert_eq!(fx.selected(), vec!["A", "B"]);
        assert_eq!(fx.view.last_selected_item(), Some("A"));
        assert_eq!(fx.changes(), 3);
    }

    #[test]
    fn node_selected_flag_goes_through_the_list() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        assert!(fx.view.set_node_selected(ids[0], true).unwrap());
        assert!(fx.view.set_node_selected(ids[1], true).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["A", "B"]);
        assert!(fx.view.set_node_selected(ids[0], false).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["B"]);

        fx.view.set_selection_mode(SelectionMode::Single);
        assert!(fx.view.set_node_selected(ids[0], true).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["A"]);
    }

    #[test]
    fn tab_stop_follows_focus() {
        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        assert!(fx.view.control_has_tab_stop());
        fx.view.focus_node(ids[0]).unwrap();
        fx.view.focus_node(ids[1]).unwrap();
        assert!(!fx.view.node(ids[0]).unwrap().has_tab_stop());
        assert!(fx.view.node(ids[1]).unwrap().has_tab_stop());
        assert!(!fx.view.control_has_tab_stop());
        fx.assert_consistent();

        fx.view.unrealize(ids[1]).unwrap();
        assert!(fx.view.control_has_tab_stop());
        assert_eq!(fx.view.focused(), Some(FocusTarget::Control));
    }

    #[test]
    fn control_focus_is_delegated() {
        let (mut empty, _) = Fixture::new(&[]);
        assert_eq!(empty.view.on_got_focus(), FocusTarget::Control);

        let (mut fx, ids) = Fixture::new(&["A", "B"]);
        assert_eq!(fx.view.on_got_focus(), FocusTarget::Node(ids[0]));
        assert!(fx.view.node(ids[0]).unwrap().has_tab_stop());

        fx.view.focus_node(ids[1]).unwrap();
        fx.view.on_lost_focus();
        let target = fx.view.on_pointer_down_empty(PointerButton::Primary);
        assert_eq!(target, FocusTarget::Node(ids[1]));
        assert_eq!(fx.view.focused(), Some(FocusTarget::Node(ids[1])));
    }

    #[test]
    fn control_keys_bootstrap_selection() {
        let (mut fx, ids) = Fixture::new(&["A", "B", "C"]);
        assert!(fx.view.on_key_down(Key::Up).unwrap());
        assert_eq!(fx.list.to_vec(), vec!["C"]);
        assert_eq!(fx.view.last_focused(), Some(ids[2]));

        // A node has focus now, so the control no longer handles keys.
        assert!(!fx.view.on_key_down(Key::Down).unwrap());

        let (mut other, ids) = Fixture::new(&["A", "B"]);
        assert!(other.view.on_key_down(Key::Down).unwrap());
        assert_eq!(other.list.to_vec(), vec!["A"]);
        assert_eq!(other.view.focused(), Some(FocusTarget::Node(ids[0])));
        assert!(!other.view.on_key_down(Key::Other).unwrap());

        let (mut empty, _) = Fixture::new(&[]);
        assert!(!empty.view.on_key_down(Key::Down).unwrap());
    }

    #[test]
    fn keys_and_pointer_switch_input_mode() {
        let (mut fx, ids) = Fixture::new(&["A"]);
        fx.view.on_preview_key_down();
        assert!(fx.view.is_keyboard_mode());
        fx.view.click(ids[0], Modifiers::NONE).unwrap();
        assert_eq!(fx.view.input_mode(), InputMode::Pointer);
        fx.view.on_preview_key_up();
        assert!(fx.view.is_keyboard_mode());
    }

    #[test]
    fn navigation_moves_and_extends() {
        let (mut fx, ids) = Fixture::new(&["A", "B", "C", "D"]);
        fx.view.click(ids[0], Modifiers::NONE).unwrap();
        fx.view.navigate(Key::Down, Modifiers::NONE).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["B"]);

        fx.view.navigate(Key::Down, Modifiers::SHIFT).unwrap();
        fx.view.navigate(Key::Down, Modifiers::SHIFT).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["B", "C", "D"]);

        fx.view.navigate(Key::Home, Modifiers::CONTROL).unwrap();
        assert_eq!(fx.view.last_focused(), Some(ids[0]));
        assert_eq!(fx.list.to_vec(), vec!["B", "C", "D"]);

        assert!(!fx.view.navigate(Key::Up, Modifiers::NONE).unwrap());
        fx.assert_consistent();
    }

    #[test]
    fn clicks_dispatch_on_modifiers() {
        let (mut fx, ids) = Fixture::new(&["A", "B", "C"]);
        fx.view.click(ids[0], Modifiers::NONE).unwrap();
        fx.view.click(ids[2], Modifiers::CONTROL).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["A", "C"]);
        fx.view.click(ids[0], Modifiers::CONTROL).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["C"]);
        fx.view.click(ids[0], Modifiers::SHIFT).unwrap();
        assert_eq!(fx.list.to_vec(), vec!["C", "B", "A"]);
        fx.assert_consistent();
    }

    #[test]
    fn rectangle_selection_through_the_view() {
        let (mut fx, ids) = Fixture::new(&["A", "B", "C"]);
        let rows = [ids[1], ids[2]];
        assert!(fx
            .view
            .select_by_rectangle(|id, _| rows.contains(&id))
            .unwrap());
        assert_eq!(fx.list.to_vec(), vec!["B", "C"]);
    }

    #[test]
    fn unloaded_view_refuses_gestures() {
        let (mut fx, ids) = Fixture::new(&["A"]);
        fx.view.unload();
        fx.view.unload();
        let err = fx.view.select(ids[0]).unwrap_err();
        assert!(matches!(err, ArboristError::SelectionDisposed));

        fx.view.set_selection_mode(SelectionMode::Multiple);
        assert!(fx.view.select(ids[0]).unwrap());
    }

    #[test]
    fn stale_handles_are_reported() {
        let (mut fx, ids) = Fixture::new(&["A"]);
        fx.view.unrealize(ids[0]).unwrap();
        assert!(matches!(
            fx.view.select(ids[0]),
            Err(ArboristError::StaleNode { .. })
        ));
        assert!(fx.view.focus_node(ids[0]).is_err());
    }
}
