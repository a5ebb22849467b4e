//! Selection strategies.
//!
//! A strategy decides which items a gesture selects. It never writes node
//! flags itself: it hands the target set to [`SelectionContext::commit`],
//! which previews every change first and applies all of them or none.

use super::item::DataItem;
use super::preview::SelectionEvents;
use super::range::resolve_range;
use super::sync::Synchronizer;
use crate::error::{ArboristError, Result};
use crate::tree::{Node, NodeId, RealizedTree, TraversalFilter};
use std::fmt;
use std::str::FromStr;

/// Which selection algorithm a tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item is selected.
    Single,
    /// Any number of items, with toggle and range gestures.
    #[default]
    Multiple,
    /// Nothing can be selected.
    None,
}

impl SelectionMode {
    /// Get the next mode in the cycle.
    pub fn next(self) -> Self {
        match self {
            SelectionMode::Single => SelectionMode::Multiple,
            SelectionMode::Multiple => SelectionMode::None,
            SelectionMode::None => SelectionMode::Single,
        }
    }

    /// Get the mode name.
    pub fn name(self) -> &'static str {
        match self {
            SelectionMode::Single => "single",
            SelectionMode::Multiple => "multiple",
            SelectionMode::None => "none",
        }
    }

    /// Create the strategy implementing this mode.
    pub fn strategy<I: DataItem>(self) -> Box<dyn SelectionStrategy<I>> {
        match self {
            SelectionMode::Single => Box::new(SingleSelection::new()),
            SelectionMode::Multiple => Box::new(MultipleSelection::new()),
            SelectionMode::None => Box::new(NoSelection::new()),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionMode {
    type Err = ArboristError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(SelectionMode::Single),
            "multiple" | "multi" => Ok(SelectionMode::Multiple),
            "none" => Ok(SelectionMode::None),
            _ => Err(ArboristError::UnknownSelectionMode { name: s.to_string() }),
        }
    }
}

/// Everything a strategy may touch while handling one gesture.
pub struct SelectionContext<'a, I> {
    tree: &'a mut RealizedTree<I>,
    sync: &'a mut Synchronizer<I>,
    events: &'a mut SelectionEvents<I>,
}

impl<'a, I: DataItem> SelectionContext<'a, I> {
    pub(crate) fn new(
        tree: &'a mut RealizedTree<I>,
        sync: &'a mut Synchronizer<I>,
        events: &'a mut SelectionEvents<I>,
    ) -> Self {
        Self { tree, sync, events }
    }

    /// The realized nodes.
    pub fn tree(&self) -> &RealizedTree<I> {
        &*self.tree
    }

    /// The item behind `node` if it may be selected, `None` if it is disabled.
    pub fn selectable_item(&self, node: NodeId) -> Result<Option<I>> {
        let node = self.tree.node(node)?;
        if !node.is_enabled() {
            tracing::debug!("Ignoring selection of disabled item {:?}", node.item());
            return Ok(None);
        }
        Ok(Some(node.item().clone()))
    }

    /// Check if `item` is in the selected-items list.
    pub fn is_selected(&self, item: &I) -> bool {
        self.sync.items().contains(item)
    }

    /// The realized node of the last selected item, if any.
    pub fn last_selected_node(&self) -> Option<NodeId> {
        self.sync
            .last_selected()
            .and_then(|item| self.tree.find(item))
    }

    /// Items of the visible, enabled nodes accepted by `covers`, in walk order.
    pub fn covered_items(&self, covers: &mut dyn FnMut(NodeId, &Node<I>) -> bool) -> Vec<I> {
        self.tree
            .traverse(TraversalFilter::SELECTABLE)
            .filter_map(|id| self.tree.get(id).map(|node| (id, node)))
            .filter(|(id, node)| covers(*id, *node))
            .map(|(_, node)| node.item().clone())
            .collect()
    }

    /// Deselect `deselect` and select `select` as one all-or-nothing change.
    ///
    /// Every effective change is previewed first: deselections in walk order,
    /// then selections in the order given. If any preview is cancelled nothing
    /// is touched and `false` is returned. Otherwise the list is updated and
    /// the selection-changed handlers run once, if anything changed.
    pub fn commit(&mut self, deselect: Vec<I>, select: Vec<I>) -> bool {
        let mut removing: Vec<I> = Vec::new();
        for item in deselect {
            if self.is_selected(&item) && !removing.contains(&item) {
                removing.push(item);
            }
        }
        self.sort_by_walk_order(&mut removing);
        let mut adding: Vec<I> = Vec::new();
        for item in select {
            if !self.is_selected(&item) && !adding.contains(&item) {
                adding.push(item);
            }
        }

        let previews = removing
            .iter()
            .map(|item| (false, item))
            .chain(adding.iter().map(|item| (true, item)));
        if !self.events.preview_all(previews) {
            tracing::debug!("Selection change vetoed");
            return false;
        }

        self.sync.remove(&removing);
        self.sync.add(adding);
        self.sync.settle(self.tree, self.events);
        true
    }

    /// Empty the selection. Every selected item is previewed for deselection
    /// first; if any preview is cancelled the list is left as it was.
    pub fn clear(&mut self) -> bool {
        let mut current = self.sync.items().to_vec();
        self.sort_by_walk_order(&mut current);
        if !self.events.preview_all(current.iter().map(|item| (false, item))) {
            tracing::debug!("Clearing the selection was vetoed");
            return false;
        }
        self.sync.clear();
        self.sync.settle(self.tree, self.events);
        true
    }

    /// Realized items in walk order, then unrealized ones as they were.
    fn sort_by_walk_order(&self, items: &mut [I]) {
        let order: Vec<NodeId> = self.tree.traverse(TraversalFilter::ALL).collect();
        items.sort_by_cached_key(|item| {
            order
                .iter()
                .position(|id| self.tree.get(*id).is_some_and(|node| node.item() == item))
                .unwrap_or(usize::MAX)
        });
    }

    /// Make `target` the whole selection.
    pub fn replace_with(&mut self, target: Vec<I>) -> bool {
        let deselect = self
            .sync
            .items()
            .to_vec()
            .into_iter()
            .filter(|item| !target.contains(item))
            .collect();
        self.commit(deselect, target)
    }
}

impl<I> fmt::Debug for SelectionContext<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionContext")
            .field("realized", &self.tree.len())
            .finish()
    }
}

/// A selection algorithm.
///
/// Each operation returns `Ok(true)` when the gesture was applied (including
/// when it changed nothing) and `Ok(false)` when it was vetoed or is not
/// supported by the mode. Errors leave the selection untouched.
pub trait SelectionStrategy<I: DataItem>: fmt::Debug {
    /// The mode this strategy implements.
    fn mode(&self) -> SelectionMode;

    /// Select exactly `node`, deselecting everything else.
    fn select(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool>;

    /// Flip the selection of `node`.
    fn toggle(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool>;

    /// Extend the selection from the last selected node to `node`.
    fn select_range(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool>;

    /// Select the visible nodes accepted by `covers`, replacing the selection.
    fn select_by_rectangle(
        &mut self,
        cx: &mut SelectionContext<'_, I>,
        covers: &mut dyn FnMut(NodeId, &Node<I>) -> bool,
    ) -> Result<bool>;

    /// Release the strategy. Further operations fail with `SelectionDisposed`.
    fn dispose(&mut self);

    /// Check if the strategy was disposed.
    fn is_disposed(&self) -> bool;
}

fn ensure_live(disposed: bool) -> Result<()> {
    if disposed {
        return Err(ArboristError::SelectionDisposed);
    }
    Ok(())
}

/// At most one selected item.
#[derive(Debug, Default)]
pub struct SingleSelection {
    disposed: bool,
}

impl SingleSelection {
    /// Create the strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: DataItem> SelectionStrategy<I> for SingleSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::Single
    }

    fn select(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        match cx.selectable_item(node)? {
            Some(item) => Ok(cx.replace_with(vec![item])),
            None => Ok(false),
        }
    }

    fn toggle(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        let Some(item) = cx.selectable_item(node)? else {
            return Ok(false);
        };
        if cx.is_selected(&item) {
            Ok(cx.replace_with(Vec::new()))
        } else {
            Ok(cx.replace_with(vec![item]))
        }
    }

    fn select_range(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        self.select(cx, node)
    }

    fn select_by_rectangle(
        &mut self,
        cx: &mut SelectionContext<'_, I>,
        covers: &mut dyn FnMut(NodeId, &Node<I>) -> bool,
    ) -> Result<bool> {
        ensure_live(self.disposed)?;
        let first = cx.covered_items(covers).into_iter().next();
        Ok(cx.replace_with(first.into_iter().collect()))
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Any number of selected items.
#[derive(Debug, Default)]
pub struct MultipleSelection {
    disposed: bool,
}

impl MultipleSelection {
    /// Create the strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: DataItem> SelectionStrategy<I> for MultipleSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::Multiple
    }

    fn select(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        match cx.selectable_item(node)? {
            Some(item) => Ok(cx.replace_with(vec![item])),
            None => Ok(false),
        }
    }

    fn toggle(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        let Some(item) = cx.selectable_item(node)? else {
            return Ok(false);
        };
        if cx.is_selected(&item) {
            Ok(cx.commit(vec![item], Vec::new()))
        } else {
            Ok(cx.commit(Vec::new(), vec![item]))
        }
    }

    fn select_range(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        if cx.selectable_item(node)?.is_none() {
            return Ok(false);
        }
        let Some(anchor) = cx.last_selected_node() else {
            return self.select(cx, node);
        };

        let range = resolve_range(cx.tree(), anchor, node)?;
        let items = range
            .iter()
            .filter_map(|id| cx.tree().get(*id))
            .map(|realized| realized.item().clone())
            .collect();
        Ok(cx.commit(Vec::new(), items))
    }

    fn select_by_rectangle(
        &mut self,
        cx: &mut SelectionContext<'_, I>,
        covers: &mut dyn FnMut(NodeId, &Node<I>) -> bool,
    ) -> Result<bool> {
        ensure_live(self.disposed)?;
        let covered = cx.covered_items(covers);
        Ok(cx.replace_with(covered))
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Selection switched off. Every gesture reports `false` and changes nothing.
#[derive(Debug, Default)]
pub struct NoSelection {
    disposed: bool,
}

impl NoSelection {
    /// Create the strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: DataItem> SelectionStrategy<I> for NoSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::None
    }

    fn select(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        ensure_live(self.disposed)?;
        cx.tree().node(node)?;
        Ok(false)
    }

    fn toggle(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        self.select(cx, node)
    }

    fn select_range(&mut self, cx: &mut SelectionContext<'_, I>, node: NodeId) -> Result<bool> {
        self.select(cx, node)
    }

    fn select_by_rectangle(
        &mut self,
        _cx: &mut SelectionContext<'_, I>,
        _covers: &mut dyn FnMut(NodeId, &Node<I>) -> bool,
    ) -> Result<bool> {
        ensure_live(self.disposed)?;
        Ok(false)
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
